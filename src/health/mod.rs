//! Entity health tracking and selection.
//!
//! # Data Flow
//! ```text
//! State machine (state.rs):
//!     Entry availability
//!     → 0.0 drives DOWN, 100.0 drives UP, anything else is ignored
//!     → Transition returned on UP ↔ DOWN edges
//!
//! Filtering (filter.rs):
//!     Entry proxy/server names
//!     → matched against optional allow-lists
//!     → included entries go on to metric emission
//! ```
//!
//! # Design Decisions
//! - Tracking runs before filtering, so filtered entities still transition
//! - First observation seeds the state silently
//! - State is keyed per (proxy, server) and lives for the process lifetime

pub mod filter;
pub mod state;

pub use filter::Filters;
pub use state::{Status, StatusTracker, Transition};
