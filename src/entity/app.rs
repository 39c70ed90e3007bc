//! Supervised app.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::entity::AppConfig;
use crate::entity::response::{ApiEndpoint, ApiResponse};
use crate::entity::state::RunState;
use crate::entity::Monitored;

/// A supervised app: immutable config plus lock-guarded run state.
#[derive(Debug)]
pub struct App {
    id: String,
    config: AppConfig,
    state: RwLock<RunState>,
}

impl App {
    pub fn new(
        id: impl Into<String>,
        config: AppConfig,
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

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared access to the run state.
    pub fn read(&self) -> RwLockReadGuard<'_, RunState> {
        self.state.read()
    }

    /// Exclusive access to the run state, for the scheduler.
    pub fn write(&self) -> RwLockWriteGuard<'_, RunState> {
        self.state.write()
    }
}

impl Monitored for App {
    fn id(&self) -> &str {
        &self.id
    }

    fn api_response(&self, endpoint: ApiEndpoint) -> ApiResponse {
        let state = self.state.read();
        let mut response = ApiResponse::from_state(&self.id, &self.config.name, &state, endpoint);
        response.keep_alive = Some(self.config.keep_alive);
        response
    }
}
