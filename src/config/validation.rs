//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Bound the socket path to what a unix socket address can hold
//! - Keep the restart gap at least one polling interval wide
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CollectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::CollectorConfig;

/// Capacity of `sockaddr_un.sun_path`, including the trailing NUL.
pub const SUN_PATH_LEN: usize = 108;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("SocketPath must not be empty")]
    EmptySocketPath,

    #[error("SocketPath is {len} bytes, limit is {max}")]
    SocketPathTooLong { len: usize, max: usize },

    #[error("Interval must be greater than zero")]
    ZeroInterval,

    #[error("RestartGap ({restart_gap}s) must be at least Interval ({interval}s)")]
    RestartGapBelowInterval { restart_gap: u64, interval: u64 },

    #[error("{option} contains an empty entry")]
    EmptyFilter { option: &'static str },

    #[error("MetricsAddress {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a deserialized config, collecting every problem found.
pub fn validate_config(config: &CollectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let path_len = config.socket_path.len();
    if path_len == 0 {
        errors.push(ValidationError::EmptySocketPath);
    } else if path_len >= SUN_PATH_LEN {
        errors.push(ValidationError::SocketPathTooLong {
            len: path_len,
            max: SUN_PATH_LEN - 1,
        });
    }

    if config.interval == 0 {
        errors.push(ValidationError::ZeroInterval);
    } else if config.restart_gap < config.interval {
        errors.push(ValidationError::RestartGapBelowInterval {
            restart_gap: config.restart_gap,
            interval: config.interval,
        });
    }

    if config.px_filter.iter().any(|f| f.is_empty()) {
        errors.push(ValidationError::EmptyFilter { option: "PxFilter" });
    }
    if config.sv_filter.iter().any(|f| f.is_empty()) {
        errors.push(ValidationError::EmptyFilter { option: "SvFilter" });
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
