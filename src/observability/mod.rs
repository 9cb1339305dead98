//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Collector cycle produces:
//!     → metrics.rs (typed submissions + notifications → MetricSink)
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → Prometheus scrape endpoint (PrometheusSink)
//!     → in-memory capture for tests and dry runs (MemorySink)
//!     → log aggregation (stdout)
//! ```
//!
//! # Design Decisions
//! - One typed struct per metric category, no variadic value lists
//! - The sink is a trait so the collector never depends on an exporter
//! - Notifications travel through the same sink as metrics

pub mod logging;
pub mod metrics;

pub use metrics::{
    MemorySink, Metric, MetricSink, Notification, PrometheusSink, Severity, Submission, Value,
};
