//! Polling cycle orchestration.
//!
//! # Data Flow
//! ```text
//! Tick
//!     → fetch "show stat" → parse Entries
//!     → fetch "show info" → uptime
//!     → uptime < RestartGap + 1 ? discard everything
//!     → per Entry: StatusTracker → Filters → MetricSink
//!     → Entries dropped
//! ```
//!
//! # Design Decisions
//! - Any query failure discards the whole cycle with no side effects
//! - Uptime is read after stats so a restart between the two queries is caught
//! - Cycles run one at a time; the tracker needs no locking

pub mod cycle;
pub mod emit;

pub use cycle::{Collector, CycleOutcome, CycleSummary};
