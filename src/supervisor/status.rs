//! Aggregate status snapshot.
//!
//! Per-entity consistent, not atomic across entities: each entity is copied
//! under its own read lock, one at a time.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entity::{ApiEndpoint, ApiResponse, Monitored, Timestamp};
use crate::observability::metrics;
use crate::supervisor::Supervisor;

/// Point-in-time view of a supervisor, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Status {
    pub instance_id: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub apps: BTreeMap<String, ApiResponse>,
    /// Serialized as `service` for compatibility with existing consumers.
    #[serde(rename = "service", skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, ApiResponse>,
    /// When the periodic loop started; absent if it is not running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<Timestamp>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub shutdown: bool,
}

impl Supervisor {
    /// Build a status snapshot.
    pub fn get_status(&self) -> Status {
        let (started, shutdown) = {
            let state = self.state.read();
            (state.started, state.shutdown)
        };

        let apps = collect(self.apps.values().map(|app| app.as_ref() as &dyn Monitored));
        let services = collect(
            self.services
                .values()
                .map(|service| service.as_ref() as &dyn Monitored),
        );

        metrics::record_status_snapshot();
        Status {
            instance_id: self.instance_id.clone(),
            apps,
            services,
            started: started.map(|t| Timestamp::new(t, self.format.clone())),
            shutdown,
        }
    }
}

fn collect<'a>(entities: impl Iterator<Item = &'a dyn Monitored>) -> BTreeMap<String, ApiResponse> {
    entities
        .map(|entity| (entity.id().to_string(), entity.api_response(ApiEndpoint::Status)))
        .collect()
}
