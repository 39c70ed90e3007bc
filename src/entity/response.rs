//! API representation of a monitored entity.

use serde::Serialize;

use crate::config::entity::{KeepAlive, ServiceManagement};
use crate::entity::state::{History, RunState};
use crate::entity::timestamp::Timestamp;

/// Reporting context an entity renders itself for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiEndpoint {
    /// Aggregate status: current state only.
    Status,
    /// Single-entity state: includes run history.
    State,
}

/// What an app or service reports about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiResponse {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<KeepAlive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management: Option<ServiceManagement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<Timestamp>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub restart: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub run_once: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub shutdown: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<History>,
}

impl ApiResponse {
    /// Copy the current run state. Callers hold the entity's read lock.
    pub(crate) fn from_state(
        id: &str,
        name: &str,
        state: &RunState,
        endpoint: ApiEndpoint,
    ) -> Self {
        let history = match endpoint {
            ApiEndpoint::Status => Vec::new(),
            ApiEndpoint::State => state.history.iter().cloned().collect(),
        };
        Self {
            id: id.to_string(),
            name: name.to_string(),
            keep_alive: None,
            management: None,
            pid: state.pid,
            started: state.started.map(|t| state.stamp(t)),
            last_seen: state.last_seen.map(|t| state.stamp(t)),
            disabled: state.disabled,
            restart: state.restart,
            run_once: state.run_once,
            shutdown: state.shutdown,
            history,
        }
    }
}
