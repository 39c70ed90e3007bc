//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON/TOML)
//!     → loader.rs (decode, reject `null`)
//!     → validation.rs (identifiers, entity checks, listeners, clamping)
//!          uses identifier.rs, entity.rs, limits.rs
//!     → Config (canonical, immutable)
//!     → shared via Arc with the supervisor
//! ```
//!
//! # Design Decisions
//! - Decoding and validation are separate steps
//! - All fields have defaults to allow minimal configs
//! - Lifecycle hooks are not configuration; see `supervisor::Hooks`

pub mod entity;
pub mod identifier;
pub mod limits;
pub mod loader;
pub mod schema;
pub mod validation;

pub use entity::{
    AppConfig, AppConfigError, EntityConfig, KeepAlive, ServiceConfig, ServiceConfigError,
    ServiceManagement,
};
pub use identifier::is_entity_id;
pub use loader::{load_and_validate, load_config, ConfigError, Format};
pub use schema::{Config, HttpConfig, UdpConfig};
pub use validation::ValidationError;
