//! Lifecycle event handlers.
//!
//! Registered programmatically when building a [`Supervisor`]; they are never
//! part of the serialized configuration.
//!
//! ```text
//! Supervisor::new   → on_start     (error aborts construction, once)
//! Supervisor::start → on_started
//! Supervisor::tick  → on_tick      (before entity checks)
//! Supervisor::stop  → on_stopped
//! Supervisor::shutdown → on_shutdown (once)
//! ```
//!
//! Handlers run with no supervisor or entity lock held, so they may call back
//! into the supervisor (e.g. `get_status`).

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::supervisor::Supervisor;

/// Error returned by a start handler to veto construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("start hook rejected supervisor: {0}")]
pub struct HookError(pub String);

type StartFn = Arc<dyn Fn(&Supervisor) -> Result<(), HookError> + Send + Sync>;
type EventFn = Arc<dyn Fn(&Supervisor) + Send + Sync>;

/// Set of optional lifecycle handlers.
#[derive(Clone, Default)]
pub struct Hooks {
    on_start: Option<StartFn>,
    on_started: Option<EventFn>,
    on_tick: Option<EventFn>,
    on_stopped: Option<EventFn>,
    on_shutdown: Option<EventFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once during construction; an error discards the supervisor.
    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: Fn(&Supervisor) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.on_start = Some(Arc::new(f));
        self
    }

    /// Called each time the periodic loop is started.
    pub fn on_started<F>(mut self, f: F) -> Self
    where
        F: Fn(&Supervisor) + Send + Sync + 'static,
    {
        self.on_started = Some(Arc::new(f));
        self
    }

    /// Called on every tick while running.
    pub fn on_tick<F>(mut self, f: F) -> Self
    where
        F: Fn(&Supervisor) + Send + Sync + 'static,
    {
        self.on_tick = Some(Arc::new(f));
        self
    }

    /// Called each time the periodic loop is stopped.
    pub fn on_stopped<F>(mut self, f: F) -> Self
    where
        F: Fn(&Supervisor) + Send + Sync + 'static,
    {
        self.on_stopped = Some(Arc::new(f));
        self
    }

    /// Called once, on the first shutdown.
    pub fn on_shutdown<F>(mut self, f: F) -> Self
    where
        F: Fn(&Supervisor) + Send + Sync + 'static,
    {
        self.on_shutdown = Some(Arc::new(f));
        self
    }

    pub(crate) fn start(&self, supervisor: &Supervisor) -> Result<(), HookError> {
        match &self.on_start {
            Some(f) => f(supervisor),
            None => Ok(()),
        }
    }

    pub(crate) fn started(&self, supervisor: &Supervisor) {
        if let Some(f) = &self.on_started {
            f(supervisor);
        }
    }

    pub(crate) fn tick(&self, supervisor: &Supervisor) {
        if let Some(f) = &self.on_tick {
            f(supervisor);
        }
    }

    pub(crate) fn stopped(&self, supervisor: &Supervisor) {
        if let Some(f) = &self.on_stopped {
            f(supervisor);
        }
    }

    pub(crate) fn shutdown(&self, supervisor: &Supervisor) {
        if let Some(f) = &self.on_shutdown {
            f(supervisor);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_started", &self.on_started.is_some())
            .field("on_tick", &self.on_tick.is_some())
            .field("on_stopped", &self.on_stopped.is_some())
            .field("on_shutdown", &self.on_shutdown.is_some())
            .finish()
    }
}
