//! Startup orchestration.
//!
//! Load, validate, build. Any failure is fatal to startup.

use std::path::Path;

use thiserror::Error;

use crate::config::{load_config, ConfigError};
use crate::supervisor::{Hooks, Supervisor, SupervisorError};

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

impl StartupError {
    pub fn as_label(&self) -> &'static str {
        match self {
            StartupError::Config(e) => e.as_label(),
            StartupError::Supervisor(e) => e.as_label(),
        }
    }
}

/// Load the declaration at `path` and build a supervisor from it.
pub fn build(path: &Path, hooks: Hooks) -> Result<Supervisor, StartupError> {
    let config = load_config(path)?;
    let supervisor = Supervisor::new(&config, hooks)?;
    Ok(supervisor)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_build_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"services": {{"SSH": {{"service": "sshd"}}}}}}"#).unwrap();

        let supervisor = build(file.path(), Hooks::new()).unwrap();
        assert!(supervisor.service("ssh").is_some());
    }

    #[test]
    fn test_null_file_fails_startup() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "null").unwrap();

        let err = build(file.path(), Hooks::new()).unwrap_err();
        assert_eq!(err.as_label(), "config_nil");
    }
}
