//! Metrics collection.
//!
//! # Metrics
//! - `warden_config_rejections_total` (counter): validation failures by reason
//! - `warden_status_snapshots_total` (counter): status snapshots built
//! - `warden_entities` (gauge): supervised entities by kind

use ::metrics::{counter, gauge};

pub fn record_config_rejected(reason: &'static str) {
    counter!("warden_config_rejections_total", "reason" => reason).increment(1);
}

pub fn record_status_snapshot() {
    counter!("warden_status_snapshots_total").increment(1);
}

pub fn record_entities(apps: usize, services: usize) {
    gauge!("warden_entities", "kind" => "app").set(apps as f64);
    gauge!("warden_entities", "kind" => "service").set(services as f64);
}
