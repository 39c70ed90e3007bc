//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build supervisor (on_start hook)
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Trigger broadcast → Tick loop exits → Supervisor::shutdown
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Shutdown is broadcast so every background task sees it

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
