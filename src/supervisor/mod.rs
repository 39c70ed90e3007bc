//! Supervisor: owns the canonical configuration and the entity set.
//!
//! # Locking
//! ```text
//! tier 1: Supervisor.state   (started, shutdown)
//! tier 2: App.state / Service.state, one per entity
//! ```
//! Tier 1 is always released before any tier 2 lock is taken, and at most one
//! tier 2 lock is held at a time. Hooks run with no lock held.
//!
//! Scheduling (deciding when to start, stop or restart entities) is done by
//! an external driver through [`Supervisor::tick`] and the entity write guards.

pub mod hooks;
pub mod status;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{Config, ValidationError};
use crate::entity::{App, Service};
use crate::observability::metrics;

pub use hooks::{HookError, Hooks};
pub use status::Status;

/// Errors from supervisor construction and lifecycle calls.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupervisorError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error("supervisor is shut down")]
    Shutdown,

    #[error("supervisor is already running")]
    AlreadyRunning,

    #[error("supervisor is not running")]
    NotRunning,
}

impl SupervisorError {
    /// Short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SupervisorError::Config(e) => e.as_label(),
            SupervisorError::Hook(_) => "hook_rejected",
            SupervisorError::Shutdown => "supervisor_shutdown",
            SupervisorError::AlreadyRunning => "supervisor_already_running",
            SupervisorError::NotRunning => "supervisor_not_running",
        }
    }
}

#[derive(Debug, Default)]
struct SupervisorState {
    /// Set while the periodic loop runs; `None` if stopped or never started.
    started: Option<DateTime<Utc>>,
    shutdown: bool,
}

/// Tracks a fixed set of apps and services.
#[derive(Debug)]
pub struct Supervisor {
    instance_id: String,
    config: Arc<Config>,
    format: Arc<str>,
    hooks: Hooks,
    state: RwLock<SupervisorState>,
    apps: HashMap<String, Arc<App>>,
    services: HashMap<String, Arc<Service>>,
}

impl Supervisor {
    /// Build a supervisor from a declaration.
    ///
    /// The declaration is validated on a copy; `config` is never modified.
    /// The `on_start` hook runs last and may veto construction.
    pub fn new(config: &Config, hooks: Hooks) -> Result<Self, SupervisorError> {
        let config = Arc::new(config.normalized()?);
        let format: Arc<str> = Arc::from(config.timestamp.as_str());
        let history = config.history_limit();

        let apps: HashMap<_, _> = config
            .apps()
            .map(|(id, app)| {
                let app = App::new(id, app.clone(), history, format.clone());
                (id.to_string(), Arc::new(app))
            })
            .collect();
        let services: HashMap<_, _> = config
            .services()
            .map(|(id, service)| {
                let service = Service::new(id, service.clone(), history, format.clone());
                (id.to_string(), Arc::new(service))
            })
            .collect();

        let supervisor = Self {
            instance_id: Uuid::new_v4().to_string(),
            config,
            format,
            hooks,
            state: RwLock::new(SupervisorState::default()),
            apps,
            services,
        };

        supervisor.hooks.start(&supervisor)?;

        metrics::record_entities(supervisor.apps.len(), supervisor.services.len());
        tracing::info!(
            instance_id = %supervisor.instance_id,
            apps = supervisor.apps.len(),
            services = supervisor.services.len(),
            tick_every = supervisor.config.tick_every,
            "Supervisor created"
        );
        Ok(supervisor)
    }

    /// Stable identifier of this supervisor instance (UUID v4).
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// The canonical configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn app(&self, id: &str) -> Option<&Arc<App>> {
        self.apps.get(id)
    }

    pub fn service(&self, id: &str) -> Option<&Arc<Service>> {
        self.services.get(id)
    }

    pub fn apps(&self) -> impl Iterator<Item = &Arc<App>> {
        self.apps.values()
    }

    pub fn services(&self) -> impl Iterator<Item = &Arc<Service>> {
        self.services.values()
    }

    pub fn is_running(&self) -> bool {
        self.state.read().started.is_some()
    }

    pub fn is_shutdown(&self) -> bool {
        self.state.read().shutdown
    }

    /// Start the periodic loop.
    pub fn start(&self) -> Result<(), SupervisorError> {
        {
            let mut state = self.state.write();
            if state.shutdown {
                return Err(SupervisorError::Shutdown);
            }
            if state.started.is_some() {
                return Err(SupervisorError::AlreadyRunning);
            }
            state.started = Some(Utc::now());
        }
        tracing::info!(instance_id = %self.instance_id, "Supervisor started");
        self.hooks.started(self);
        Ok(())
    }

    /// Stop the periodic loop. Entities are left as they are.
    pub fn stop(&self) -> Result<(), SupervisorError> {
        {
            let mut state = self.state.write();
            if state.shutdown {
                return Err(SupervisorError::Shutdown);
            }
            if state.started.take().is_none() {
                return Err(SupervisorError::NotRunning);
            }
        }
        tracing::info!(instance_id = %self.instance_id, "Supervisor stopped");
        self.hooks.stopped(self);
        Ok(())
    }

    /// One pass of the periodic loop. Returns false if not running.
    pub fn tick(&self) -> bool {
        {
            let state = self.state.read();
            if state.shutdown || state.started.is_none() {
                return false;
            }
        }
        self.hooks.tick(self);
        tracing::debug!(instance_id = %self.instance_id, "Supervisor tick");
        true
    }

    /// Shut down permanently. Returns false if already shut down.
    pub fn shutdown(&self) -> bool {
        {
            let mut state = self.state.write();
            if state.shutdown {
                return false;
            }
            state.shutdown = true;
            state.started = None;
        }
        for app in self.apps.values() {
            app.write().set_shutdown();
        }
        for service in self.services.values() {
            service.write().set_shutdown();
        }
        tracing::info!(instance_id = %self.instance_id, "Supervisor shut down");
        self.hooks.shutdown(self);
        true
    }
}
