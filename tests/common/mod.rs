//! Shared fixtures for integration tests.

#![allow(dead_code)]

use warden::config::{AppConfig, Config, KeepAlive, ServiceConfig};

/// A minimal valid app.
pub fn app(keep_alive: KeepAlive) -> AppConfig {
    AppConfig {
        binary: "server".into(),
        working_directory: "/srv/app".into(),
        keep_alive,
        ..Default::default()
    }
}

/// A minimal valid service.
pub fn service(name: &str) -> ServiceConfig {
    ServiceConfig {
        service: name.into(),
        ..Default::default()
    }
}

/// A config with the given pid-supervised apps and services.
pub fn config(apps: &[&str], services: &[&str]) -> Config {
    let mut config = Config::default();
    for id in apps {
        config.apps.insert(id.to_string(), Some(app(KeepAlive::Pid)));
    }
    for id in services {
        config.services.insert(id.to_string(), Some(service(id)));
    }
    config
}
