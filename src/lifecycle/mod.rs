//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → collector loop exits after its current cycle
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
