//! Configuration validation.
//!
//! # Responsibilities
//! - Reject declarations with nothing to supervise
//! - Enforce identifier rules and case-insensitive uniqueness per namespace
//! - Run each entity's own validation on a private copy
//! - Require listeners for the keep-alive modes apps declare
//! - Clamp supervisor-wide tunables into their bounds
//!
//! # Design Decisions
//! - Stops at the first error
//! - Identifiers are lowercased after validation; collisions are detected on
//!   the lowercase form
//! - Apps and services are independent namespaces
//! - Only apps that passed their own validation count towards listener
//!   requirements
//! - Clamping is silent normalization, never an error

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::entity::{AppConfigError, EntityConfig, KeepAlive, ServiceConfigError};
use crate::config::identifier::is_entity_id;
use crate::config::limits::{HISTORY, PING_TIMEOUT, TICK_EVERY};
use crate::config::schema::Config;
use crate::observability::metrics;

/// A semantic problem with a [`Config`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("apps and services were both empty")]
    Empty,

    #[error("app key was empty")]
    AppIdEmpty,

    #[error("app key {0:?} was invalid")]
    AppIdInvalid(String),

    #[error("app {0:?} was null")]
    AppNil(String),

    #[error("duplicate app label {0:?}")]
    AppDuplicate(String),

    #[error("service key was empty")]
    ServiceIdEmpty,

    #[error("service key {0:?} was invalid")]
    ServiceIdInvalid(String),

    #[error("service {0:?} was null")]
    ServiceNil(String),

    #[error("duplicate service label {0:?}")]
    ServiceDuplicate(String),

    #[error("HTTP listeners were empty, an app requires HTTP keep-alive")]
    ListenHttpEmpty,

    #[error("UDP listeners were empty, an app requires UDP keep-alive")]
    ListenUdpEmpty,

    #[error(transparent)]
    App(#[from] AppConfigError),

    #[error(transparent)]
    Service(#[from] ServiceConfigError),
}

impl ValidationError {
    /// Short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ValidationError::Empty => "config_empty",
            ValidationError::AppIdEmpty => "app_id_empty",
            ValidationError::AppIdInvalid(_) => "app_id_invalid",
            ValidationError::AppNil(_) => "app_nil",
            ValidationError::AppDuplicate(_) => "app_duplicate",
            ValidationError::ServiceIdEmpty => "service_id_empty",
            ValidationError::ServiceIdInvalid(_) => "service_id_invalid",
            ValidationError::ServiceNil(_) => "service_nil",
            ValidationError::ServiceDuplicate(_) => "service_duplicate",
            ValidationError::ListenHttpEmpty => "listen_http_empty",
            ValidationError::ListenUdpEmpty => "listen_udp_empty",
            ValidationError::App(e) => e.as_label(),
            ValidationError::Service(e) => e.as_label(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Namespace {
    Apps,
    Services,
}

impl Namespace {
    fn id_empty(self) -> ValidationError {
        match self {
            Namespace::Apps => ValidationError::AppIdEmpty,
            Namespace::Services => ValidationError::ServiceIdEmpty,
        }
    }

    fn id_invalid(self, id: &str) -> ValidationError {
        match self {
            Namespace::Apps => ValidationError::AppIdInvalid(id.to_string()),
            Namespace::Services => ValidationError::ServiceIdInvalid(id.to_string()),
        }
    }

    fn nil(self, id: &str) -> ValidationError {
        match self {
            Namespace::Apps => ValidationError::AppNil(id.to_string()),
            Namespace::Services => ValidationError::ServiceNil(id.to_string()),
        }
    }

    fn duplicate(self, id: &str) -> ValidationError {
        match self {
            Namespace::Apps => ValidationError::AppDuplicate(id.to_string()),
            Namespace::Services => ValidationError::ServiceDuplicate(id.to_string()),
        }
    }
}

impl Config {
    /// Validate and normalize this configuration in place.
    ///
    /// On success `apps` and `services` are replaced by lowercase-keyed,
    /// individually validated copies and the tunables are clamped.
    ///
    /// On failure, maps already replaced before the failing step stay
    /// replaced. Use [`Config::normalized`] for all-or-nothing semantics.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.validate_inner().inspect_err(|e| {
            tracing::warn!(reason = e.as_label(), error = %e, "Configuration rejected");
            metrics::record_config_rejected(e.as_label());
        })
    }

    /// Validate a copy and return it, leaving `self` untouched.
    pub fn normalized(&self) -> Result<Config, ValidationError> {
        let mut config = self.clone();
        config.validate()?;
        Ok(config)
    }

    fn validate_inner(&mut self) -> Result<(), ValidationError> {
        if self.apps.is_empty() && self.services.is_empty() {
            return Err(ValidationError::Empty);
        }

        let apps = canonicalize(&self.apps, Namespace::Apps)?;
        let required = listeners_required(&apps);
        if required.contains(&KeepAlive::Http) && self.listen_http.is_empty() {
            return Err(ValidationError::ListenHttpEmpty);
        }
        if required.contains(&KeepAlive::Udp) && self.listen_udp.is_empty() {
            return Err(ValidationError::ListenUdpEmpty);
        }
        self.apps = apps;

        self.services = canonicalize(&self.services, Namespace::Services)?;

        self.tick_every = TICK_EVERY.clamp(self.tick_every);
        self.history = HISTORY.clamp(self.history);
        self.ping_timeout = PING_TIMEOUT.clamp(self.ping_timeout);

        tracing::debug!(
            apps = self.apps.len(),
            services = self.services.len(),
            tick_every = self.tick_every,
            history = self.history,
            ping_timeout = self.ping_timeout,
            "Configuration validated"
        );
        Ok(())
    }
}

/// Validate one namespace and rebuild it with lowercase keys.
///
/// Entities are cloned before validation so the source map is never touched.
fn canonicalize<E>(
    entries: &BTreeMap<String, Option<E>>,
    namespace: Namespace,
) -> Result<BTreeMap<String, Option<E>>, ValidationError>
where
    E: EntityConfig,
    ValidationError: From<E::Error>,
{
    let mut canonical = BTreeMap::new();
    for (id, entity) in entries {
        if id.is_empty() {
            return Err(namespace.id_empty());
        }
        if !is_entity_id(id) {
            return Err(namespace.id_invalid(id));
        }
        let mut entity = entity.clone().ok_or_else(|| namespace.nil(id))?;
        if let Err(e) = entity.validate() {
            tracing::debug!(id = %id, ?namespace, "Entity failed its own validation");
            return Err(e.into());
        }
        let id = id.to_ascii_lowercase();
        if canonical.contains_key(&id) {
            return Err(namespace.duplicate(&id));
        }
        canonical.insert(id, Some(entity));
    }
    Ok(canonical)
}

/// Keep-alive modes among `entries` that need a supervisor listener.
fn listeners_required<E: EntityConfig>(entries: &BTreeMap<String, Option<E>>) -> Vec<KeepAlive> {
    entries
        .values()
        .flatten()
        .filter_map(E::keep_alive)
        .filter(|mode| mode.needs_listener())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::entity::{AppConfig, ServiceConfig};

    fn app(keep_alive: KeepAlive) -> Option<AppConfig> {
        Some(AppConfig {
            binary: "server".into(),
            working_directory: "/srv".into(),
            keep_alive,
            ..Default::default()
        })
    }

    fn service() -> Option<ServiceConfig> {
        Some(ServiceConfig {
            service: "sshd".into(),
            ..Default::default()
        })
    }

    fn with_apps(ids: &[&str]) -> Config {
        Config {
            apps: ids
                .iter()
                .map(|id| (id.to_string(), app(KeepAlive::Pid)))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_declaration_rejected() {
        let mut config = Config::default();
        assert_eq!(config.validate(), Err(ValidationError::Empty));
    }

    #[test]
    fn test_keys_are_lowercased() {
        let mut config = with_apps(&["Web", "API-2"]);
        config.services.insert("SSH".into(), service());
        config.validate().unwrap();

        let apps: Vec<_> = config.apps.keys().cloned().collect();
        assert_eq!(apps, vec!["api-2", "web"]);
        assert!(config.services.contains_key("ssh"));
    }

    #[test]
    fn test_case_collision_is_duplicate() {
        let mut config = with_apps(&["Foo", "foo"]);
        assert_eq!(
            config.validate(),
            Err(ValidationError::AppDuplicate("foo".into()))
        );

        let mut config = Config::default();
        config.services.insert("SSH".into(), service());
        config.services.insert("ssh".into(), service());
        assert_eq!(
            config.validate(),
            Err(ValidationError::ServiceDuplicate("ssh".into()))
        );
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let mut config = with_apps(&["A"]);
        config.services.insert("a".into(), service());
        assert!(config.validate().is_ok());
        assert!(config.apps.contains_key("a"));
        assert!(config.services.contains_key("a"));
    }

    #[test]
    fn test_identifier_errors_per_namespace() {
        let mut config = with_apps(&[""]);
        assert_eq!(config.validate(), Err(ValidationError::AppIdEmpty));

        let mut config = with_apps(&["bad_id"]);
        assert_eq!(
            config.validate(),
            Err(ValidationError::AppIdInvalid("bad_id".into()))
        );

        let mut config = Config::default();
        config.services.insert(String::new(), service());
        assert_eq!(config.validate(), Err(ValidationError::ServiceIdEmpty));

        let mut config = Config::default();
        config.services.insert("-ssh".into(), service());
        assert_eq!(
            config.validate(),
            Err(ValidationError::ServiceIdInvalid("-ssh".into()))
        );
    }

    #[test]
    fn test_nil_entities() {
        let mut config = Config::default();
        config.apps.insert("web".into(), None);
        assert_eq!(config.validate(), Err(ValidationError::AppNil("web".into())));

        let mut config = Config::default();
        config.services.insert("ssh".into(), None);
        assert_eq!(
            config.validate(),
            Err(ValidationError::ServiceNil("ssh".into()))
        );
    }

    #[test]
    fn test_entity_error_propagated_verbatim() {
        let mut config = with_apps(&["web"]);
        if let Some(Some(app)) = config.apps.get_mut("web") {
            app.binary.clear();
        }
        let err = config.validate().unwrap_err();
        assert_eq!(err, ValidationError::App(AppConfigError::BinaryEmpty));
        assert_eq!(err.to_string(), AppConfigError::BinaryEmpty.to_string());
    }

    #[test]
    fn test_keep_alive_requires_listener() {
        let mut config = Config::default();
        config.apps.insert("web".into(), app(KeepAlive::Http));
        assert_eq!(config.validate(), Err(ValidationError::ListenHttpEmpty));

        let mut config = Config::default();
        config.apps.insert("web".into(), app(KeepAlive::Udp));
        config.listen_http.push("127.0.0.1:8421".into());
        assert_eq!(config.validate(), Err(ValidationError::ListenUdpEmpty));

        config.listen_udp.push("127.0.0.1:1248".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_listeners_required_skips_pid_modes() {
        let mut apps = BTreeMap::new();
        apps.insert("a".to_string(), app(KeepAlive::Pid));
        apps.insert("b".to_string(), app(KeepAlive::PidFile));
        assert!(listeners_required(&apps).is_empty());

        apps.insert("c".to_string(), app(KeepAlive::Udp));
        assert_eq!(listeners_required(&apps), vec![KeepAlive::Udp]);

        let services = BTreeMap::from([("ssh".to_string(), service())]);
        assert!(listeners_required(&services).is_empty());
    }

    #[test]
    fn test_negative_tunables_raised_to_min() {
        let mut config = with_apps(&["web"]);
        config.tick_every = -5;
        config.history = -1;
        config.ping_timeout = i64::MIN;
        config.validate().unwrap();
        assert_eq!(config.tick_every, TICK_EVERY.min);
        assert_eq!(config.history, HISTORY.min);
        assert_eq!(config.ping_timeout, PING_TIMEOUT.min);
    }

    #[test]
    fn test_tunables_clamped() {
        let mut config = with_apps(&["web"]);
        config.tick_every = 999_999;
        config.history = 1;
        config.validate().unwrap();
        assert_eq!(config.tick_every, TICK_EVERY.max);
        assert_eq!(config.history, HISTORY.min);
        assert_eq!(config.ping_timeout, PING_TIMEOUT.default);
    }

    #[test]
    fn test_normalized_leaves_source_untouched() {
        let config = with_apps(&["Web"]);
        let canonical = config.normalized().unwrap();
        assert!(config.apps.contains_key("Web"));
        assert_eq!(config.tick_every, 0);
        assert!(canonical.apps.contains_key("web"));

        let bad = with_apps(&["Web", "web"]);
        assert!(bad.normalized().is_err());
        assert!(bad.apps.contains_key("Web"));
    }

    #[test]
    fn test_error_labels_are_stable() {
        assert_eq!(ValidationError::Empty.as_label(), "config_empty");
        assert_eq!(
            ValidationError::from(ServiceConfigError::ServiceEmpty).as_label(),
            "service_empty"
        );
    }
}
