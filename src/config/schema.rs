//! Configuration schema definitions.
//!
//! This module defines the supervisor's declaration as read from disk.
//! All types derive Serde traits; unknown fields are ignored.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::entity::{AppConfig, ServiceConfig};
use crate::config::limits::{HISTORY, TICK_EVERY};

/// Environment variable carrying the HTTP listener list to launched apps.
pub const ENV_LISTEN_HTTP: &str = "WARDEN_HTTP";

/// Environment variable carrying the UDP listener list to launched apps.
pub const ENV_LISTEN_UDP: &str = "WARDEN_UDP";

/// Root configuration for the supervisor.
///
/// Entity values are `Option` so that a `null` entry in the source document
/// survives decoding and is rejected by validation rather than by serde.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Apps keyed by identifier (hostname-label safe, unique ignoring case).
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub apps: BTreeMap<String, Option<AppConfig>>,

    /// Services keyed by identifier. Separate namespace from `apps`.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, Option<ServiceConfig>>,

    /// Seconds between supervisor ticks (0 = default, negative = minimum).
    pub tick_every: i64,

    /// Run-history entries kept per entity (0 = default, negative = minimum).
    pub history: i64,

    /// strftime layout for timestamps in API output. Empty means RFC 3339.
    #[serde(rename = "json-timestamp", skip_serializing_if = "String::is_empty")]
    pub timestamp: String,

    /// Seconds an HTTP/UDP keep-alive app may go without pinging (0 = default).
    pub ping_timeout: i64,

    /// HTTP listener addresses. Required if any app uses HTTP keep-alive.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub listen_http: Vec<String>,

    /// UDP listener addresses. Required if any app uses UDP keep-alive.
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub listen_udp: Vec<String>,

    /// HTTP listener overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpConfig>,

    /// UDP listener overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp: Option<UdpConfig>,
}

/// HTTP listener overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Replaces the default HTTP bind addresses.
    pub listen: Vec<String>,
}

/// UDP listener overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UdpConfig {
    /// Replaces the default UDP bind addresses.
    pub listen: Vec<String>,
}

impl Config {
    /// Iterate over apps that are present, skipping `null` entries.
    ///
    /// On a validated config every entry is present.
    pub fn apps(&self) -> impl Iterator<Item = (&str, &AppConfig)> {
        self.apps
            .iter()
            .filter_map(|(id, app)| app.as_ref().map(|app| (id.as_str(), app)))
    }

    /// Iterate over services that are present, skipping `null` entries.
    pub fn services(&self) -> impl Iterator<Item = (&str, &ServiceConfig)> {
        self.services
            .iter()
            .filter_map(|(id, service)| service.as_ref().map(|s| (id.as_str(), s)))
    }

    /// Interval between supervisor ticks, resolved against [`TICK_EVERY`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(TICK_EVERY.clamp(self.tick_every).unsigned_abs())
    }

    /// Run-history entries kept per entity, resolved against [`HISTORY`].
    pub fn history_limit(&self) -> usize {
        HISTORY.clamp(self.history).unsigned_abs() as usize
    }

    /// Environment handed to launched entities: listener lists as JSON arrays.
    pub fn listener_env(&self) -> Vec<(&'static str, String)> {
        vec![
            (ENV_LISTEN_HTTP, encode_addresses(&self.listen_http)),
            (ENV_LISTEN_UDP, encode_addresses(&self.listen_udp)),
        ]
    }
}

/// Decode an explicit `null` as the field's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn encode_addresses(addresses: &[String]) -> String {
    // A Vec<String> always encodes; fall back to an empty array regardless.
    serde_json::to_string(addresses).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_names() {
        let config: Config = serde_json::from_str(
            r#"{
                "apps": {
                    "web": {"binary": "server", "working-directory": "/srv", "keep-alive": "http"}
                },
                "services": {"ssh": {"service": "sshd", "management": "init.d"}},
                "tick-every": 10,
                "history": 50,
                "json-timestamp": "%Y-%m-%d",
                "ping-timeout": 20,
                "listen-http": ["127.0.0.1:8421"],
                "listen-udp": ["127.0.0.1:1248"],
                "http": {"listen": ["0.0.0.0:8421"]},
                "unknown-field": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.tick_every, 10);
        assert_eq!(config.history, 50);
        assert_eq!(config.timestamp, "%Y-%m-%d");
        assert_eq!(config.ping_timeout, 20);
        assert_eq!(config.listen_udp, vec!["127.0.0.1:1248"]);
        assert_eq!(config.http.as_ref().unwrap().listen, vec!["0.0.0.0:8421"]);
        assert!(config.udp.is_none());
        assert_eq!(config.apps().count(), 1);
        assert_eq!(config.services().count(), 1);
    }

    #[test]
    fn test_null_entity_survives_decoding() {
        let config: Config = serde_json::from_str(r#"{"apps": {"web": null}}"#).unwrap();
        assert_eq!(config.apps.len(), 1);
        assert_eq!(config.apps().count(), 0);
    }

    #[test]
    fn test_null_collections_decode_empty() {
        let config: Config = serde_json::from_str(
            r#"{"apps": null, "services": null, "listen-http": null, "listen-udp": null}"#,
        )
        .unwrap();
        assert!(config.apps.is_empty());
        assert!(config.services.is_empty());
        assert!(config.listen_http.is_empty());
        assert!(config.listen_udp.is_empty());
    }

    #[test]
    fn test_negative_tunables_decode() {
        let config: Config =
            serde_json::from_str(r#"{"tick-every": -5, "history": -1, "ping-timeout": -30}"#)
                .unwrap();
        assert_eq!(config.tick_every, -5);
        assert_eq!(config.tick_interval(), Duration::from_secs(TICK_EVERY.min as u64));
        assert_eq!(config.history_limit(), HISTORY.min as usize);
        assert_eq!(config.ping_timeout, -30);
    }

    #[test]
    fn test_listener_env_is_json() {
        let config = Config {
            listen_http: vec!["127.0.0.1:8421".into()],
            ..Default::default()
        };
        let env = config.listener_env();
        assert_eq!(env[0], (ENV_LISTEN_HTTP, r#"["127.0.0.1:8421"]"#.to_string()));
        assert_eq!(env[1], (ENV_LISTEN_UDP, "[]".to_string()));
    }

    #[test]
    fn test_clone_shares_no_storage() {
        let original = Config {
            listen_http: vec!["127.0.0.1:8421".into()],
            apps: BTreeMap::from([("web".to_string(), Some(AppConfig::default()))]),
            ..Default::default()
        };
        let mut copy = original.clone();
        copy.listen_http.push("127.0.0.1:9000".into());
        copy.apps.insert("api".into(), None);
        if let Some(Some(app)) = copy.apps.get_mut("web") {
            app.binary = "changed".into();
        }

        assert_eq!(original.listen_http.len(), 1);
        assert_eq!(original.apps.len(), 1);
        assert_eq!(original.apps["web"].as_ref().unwrap().binary, "");
    }
}
