//! Supervised system service.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::entity::ServiceConfig;
use crate::entity::response::{ApiEndpoint, ApiResponse};
use crate::entity::state::RunState;
use crate::entity::Monitored;

/// A supervised service. Services have no PID of their own; status comes
/// from the init system.
#[derive(Debug)]
pub struct Service {
    id: String,
    config: ServiceConfig,
    state: RwLock<RunState>,
}

impl Service {
    pub fn new(
        id: impl Into<String>,
        config: ServiceConfig,
        history_limit: usize,
        format: Arc<str>,
    ) -> Self {
        let state = RunState::new(config.disabled, history_limit, format);
        Self {
            id: id.into(),
            config,
            state: RwLock::new(state),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// True if a status exit code still means "running".
    pub fn ignores_exit_code(&self, code: u8) -> bool {
        self.config.ignore_exit_codes.contains(&code)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, RunState> {
        self.state.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, RunState> {
        self.state.write()
    }
}

impl Monitored for Service {
    fn id(&self) -> &str {
        &self.id
    }

    fn api_response(&self, endpoint: ApiEndpoint) -> ApiResponse {
        let state = self.state.read();
        let mut response = ApiResponse::from_state(&self.id, &self.config.name, &state, endpoint);
        response.management = Some(self.config.management);
        response
    }
}
