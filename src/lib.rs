//! Configuration ingestion and live status core of a process supervisor.

pub mod config;
pub mod entity;
pub mod lifecycle;
pub mod observability;
pub mod supervisor;

pub use config::schema::Config;
pub use lifecycle::Shutdown;
pub use supervisor::{Hooks, Status, Supervisor};
