//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HstsConfig (validated, immutable)
//!     → lifecycle::startup builds the store from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::HstsConfig;
pub use schema::ObservabilityConfig;
pub use schema::PinnedHost;
pub use schema::PolicyConfig;
pub use schema::StorageConfig;
pub use schema::UpstreamConfig;
pub use validation::ValidationError;
