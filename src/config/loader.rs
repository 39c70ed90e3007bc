//! Configuration loading.
//!
//! Decoding only. Nothing here checks semantics; callers validate through
//! [`Config::validate`] / [`Config::normalized`] or use [`load_and_validate`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

use crate::config::schema::Config;
use crate::config::validation::ValidationError;

/// Source document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// Pick a format from a file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// Error type for configuration loading.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document was a literal `null`.
    #[error("config was null")]
    Nil,

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// Short stable label (snake_case) for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "config_io",
            ConfigError::Json(_) => "config_json",
            ConfigError::Toml(_) => "config_toml",
            ConfigError::Nil => "config_nil",
            ConfigError::Validation(e) => e.as_label(),
        }
    }
}

/// Decode a configuration from a reader.
pub fn from_reader<R: Read>(mut reader: R, format: Format) -> Result<Config, ConfigError> {
    match format {
        Format::Json => {
            let config: Option<Config> = serde_json::from_reader(reader)?;
            config.ok_or(ConfigError::Nil)
        }
        Format::Toml => {
            let mut content = String::new();
            reader.read_to_string(&mut content)?;
            Ok(toml::from_str(&content)?)
        }
    }
}

/// Decode a configuration from a string.
pub fn from_str(content: &str, format: Format) -> Result<Config, ConfigError> {
    from_reader(content.as_bytes(), format)
}

/// Decode a configuration from bytes.
pub fn from_slice(content: &[u8], format: Format) -> Result<Config, ConfigError> {
    from_reader(content, format)
}

/// Load a configuration file. The format follows the file extension.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let file = File::open(path)?;
    let config = from_reader(BufReader::new(file), Format::from_path(path))?;

    tracing::info!(
        path = %path.display(),
        apps = config.apps.len(),
        services = config.services.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Load a configuration file and return its canonical form.
pub fn load_and_validate(path: &Path) -> Result<Config, ConfigError> {
    let config = load_config(path)?;
    Ok(config.normalized()?)
}
