//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and gauges via the `metrics` facade)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG)
//!     → whatever metrics recorder the embedding binary installs
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings
//! - No recorder installed here; without one metric calls are no-ops

pub mod logging;
pub mod metrics;
