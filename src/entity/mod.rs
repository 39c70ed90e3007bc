//! Monitored entities.
//!
//! # Data Flow
//! ```text
//! scheduler (external)
//!     → App::write / Service::write (mutate RunState)
//!
//! status aggregation
//!     → Monitored::api_response (takes the entity's read lock)
//!     → ApiResponse (owned copy, no lock held afterwards)
//! ```
//!
//! # Design Decisions
//! - One lock per entity; no entity lock is held across entities
//! - Config is immutable after construction and sits outside the lock

pub mod app;
pub mod response;
pub mod service;
pub mod state;
pub mod timestamp;

pub use app::App;
pub use response::{ApiEndpoint, ApiResponse};
pub use service::Service;
pub use state::{History, RunState};
pub use timestamp::Timestamp;

/// Capability shared by apps and services: report current state.
pub trait Monitored: Send + Sync {
    /// Canonical (lowercase) identifier.
    fn id(&self) -> &str;

    /// Snapshot this entity for `endpoint`.
    ///
    /// Holds the entity's own read lock only while copying.
    fn api_response(&self, endpoint: ApiEndpoint) -> ApiResponse;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::config::entity::{AppConfig, KeepAlive, ServiceConfig, ServiceManagement};

    #[test]
    fn test_status_omits_history_state_includes_it() {
        let app = App::new("web", AppConfig::default(), 10, Arc::from(""));
        let t0 = Utc::now();
        app.write().mark_started(Some(7), t0);
        app.write().mark_stopped(Some(0), t0);
        app.write().mark_started(Some(8), t0);

        let status = app.api_response(ApiEndpoint::Status);
        assert_eq!(status.pid, Some(8));
        assert!(status.history.is_empty());
        assert_eq!(status.keep_alive, Some(KeepAlive::Pid));

        let state = app.api_response(ApiEndpoint::State);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_service_reports_management() {
        let config = ServiceConfig {
            service: "sshd".into(),
            management: ServiceManagement::InitD,
            ignore_exit_codes: vec![3],
            disabled: true,
            ..Default::default()
        };
        let service = Service::new("ssh", config, 10, Arc::from(""));
        let response = service.api_response(ApiEndpoint::Status);

        assert_eq!(response.id, "ssh");
        assert_eq!(response.management, Some(ServiceManagement::InitD));
        assert!(response.disabled);
        assert!(response.keep_alive.is_none());
        assert!(service.ignores_exit_code(3));
        assert!(!service.ignores_exit_code(1));
    }

    #[test]
    fn test_response_serializes_kebab_case() {
        let app = App::new("web", AppConfig::default(), 10, Arc::from("%Y"));
        app.write().mark_started(Some(1), Utc::now());
        app.write().set_run_once(true);

        let value = serde_json::to_value(app.api_response(ApiEndpoint::Status)).unwrap();
        assert_eq!(value["keep-alive"], "pid");
        assert_eq!(value["run-once"], true);
        assert!(value.get("last-seen").is_some());
        assert!(value.get("history").is_none());
        assert!(value.get("disabled").is_none());
    }
}
