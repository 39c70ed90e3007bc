//! Per-entity configuration for apps and services.
//!
//! Each entity validates itself. Cross-entity rules (identifier uniqueness,
//! keep-alive listeners) belong to [`crate::config::validation`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length in bytes of an entity keep-alive secret.
pub const SECRET_MAX_LENGTH: usize = 128;

/// Contract shared by app and service configuration.
pub trait EntityConfig: Clone {
    /// Error produced by [`EntityConfig::validate`].
    type Error: std::error::Error;

    /// Check self-consistency. May normalize fields in place.
    fn validate(&mut self) -> Result<(), Self::Error>;

    /// Keep-alive policy of this entity, if it has one.
    fn keep_alive(&self) -> Option<KeepAlive> {
        None
    }
}

/// How the supervisor decides an app is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeepAlive {
    /// The supervisor owns the process and watches its PID.
    #[default]
    Pid,
    /// The app daemonizes and reports its PID through a file.
    PidFile,
    /// The app pings the supervisor's HTTP listener.
    Http,
    /// The app pings the supervisor's UDP listener.
    Udp,
}

impl KeepAlive {
    /// True for keep-alive modes that need a supervisor listener.
    pub fn needs_listener(&self) -> bool {
        matches!(self, KeepAlive::Http | KeepAlive::Udp)
    }
}

/// Configuration of a supervised app.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    /// Display name used in API output.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Executable to launch.
    pub binary: String,

    /// Directory the app is launched from.
    pub working_directory: String,

    /// Directory for stdout/stderr logs; empty means the working directory.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_directory: String,

    /// Arguments passed to `binary`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Extra environment variables.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    pub keep_alive: KeepAlive,

    /// PID file written by the app. Required for [`KeepAlive::PidFile`].
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pid_path: String,

    /// Shared secret the app presents with keep-alive pings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Start in a disabled state.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Errors from [`AppConfig::validate`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppConfigError {
    #[error("app binary was empty")]
    BinaryEmpty,

    #[error("app working directory was empty")]
    WorkingDirectoryEmpty,

    #[error("app pid path was empty, pid-file keep-alive requires one")]
    PidPathEmpty,

    #[error("app secret longer than {max} bytes")]
    SecretTooLong { max: usize },
}

impl AppConfigError {
    /// Short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            AppConfigError::BinaryEmpty => "app_binary_empty",
            AppConfigError::WorkingDirectoryEmpty => "app_working_directory_empty",
            AppConfigError::PidPathEmpty => "app_pid_path_empty",
            AppConfigError::SecretTooLong { .. } => "app_secret_too_long",
        }
    }
}

impl EntityConfig for AppConfig {
    type Error = AppConfigError;

    fn validate(&mut self) -> Result<(), AppConfigError> {
        trim_in_place(&mut self.binary);
        trim_in_place(&mut self.working_directory);
        trim_in_place(&mut self.log_directory);
        trim_in_place(&mut self.pid_path);

        if self.binary.is_empty() {
            return Err(AppConfigError::BinaryEmpty);
        }
        if self.working_directory.is_empty() {
            return Err(AppConfigError::WorkingDirectoryEmpty);
        }
        if self.keep_alive == KeepAlive::PidFile && self.pid_path.is_empty() {
            return Err(AppConfigError::PidPathEmpty);
        }
        if secret_too_long(&self.secret) {
            return Err(AppConfigError::SecretTooLong {
                max: SECRET_MAX_LENGTH,
            });
        }
        Ok(())
    }

    fn keep_alive(&self) -> Option<KeepAlive> {
        Some(self.keep_alive)
    }
}

/// How a system service is controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum ServiceManagement {
    /// `service <name> start|stop|status`
    #[default]
    #[serde(rename = "service")]
    Service,
    /// `/etc/init.d/<name> start|stop|status`
    #[serde(rename = "init.d")]
    InitD,
}

/// Configuration of a supervised system service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServiceConfig {
    /// Display name used in API output.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Name of the service known to the init system.
    pub service: String,

    pub management: ServiceManagement,

    /// Status exit codes that still count as running.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignore_exit_codes: Vec<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Errors from [`ServiceConfig::validate`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceConfigError {
    #[error("service name was empty")]
    ServiceEmpty,

    #[error("service name {0:?} was invalid")]
    ServiceInvalid(String),

    #[error("service secret longer than {max} bytes")]
    SecretTooLong { max: usize },
}

impl ServiceConfigError {
    /// Short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServiceConfigError::ServiceEmpty => "service_empty",
            ServiceConfigError::ServiceInvalid(_) => "service_invalid",
            ServiceConfigError::SecretTooLong { .. } => "service_secret_too_long",
        }
    }
}

impl EntityConfig for ServiceConfig {
    type Error = ServiceConfigError;

    fn validate(&mut self) -> Result<(), ServiceConfigError> {
        trim_in_place(&mut self.service);

        if self.service.is_empty() {
            return Err(ServiceConfigError::ServiceEmpty);
        }
        if self
            .service
            .chars()
            .any(|c| c.is_whitespace() || c == '/')
        {
            return Err(ServiceConfigError::ServiceInvalid(self.service.clone()));
        }
        if secret_too_long(&self.secret) {
            return Err(ServiceConfigError::SecretTooLong {
                max: SECRET_MAX_LENGTH,
            });
        }
        self.ignore_exit_codes.sort_unstable();
        self.ignore_exit_codes.dedup();
        Ok(())
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn secret_too_long(secret: &Option<String>) -> bool {
    secret
        .as_ref()
        .is_some_and(|s| s.len() > SECRET_MAX_LENGTH)
}
