//! HAProxy stats collector library.
//!
//! Polls the load balancer's admin socket, decodes the CSV stats report,
//! tracks per-entity up/down state and hands typed metrics and state-change
//! notifications to a [`observability::MetricSink`].

pub mod collector;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod stats;

pub use collector::{Collector, CycleOutcome};
pub use config::CollectorConfig;
pub use lifecycle::Shutdown;
