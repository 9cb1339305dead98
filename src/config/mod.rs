//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CollectorConfig (validated, immutable)
//!     → categories.rs / Filters views handed to the collector
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so an empty file is a valid config
//! - Metric categories are opt-out, notifications are opt-in
//! - Validation separates syntactic (serde) from semantic checks

pub mod categories;
pub mod loader;
pub mod schema;
pub mod validation;

pub use categories::{MetricCategories, NotificationCategories};
pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{CollectorConfig, ObservabilityConfig};
