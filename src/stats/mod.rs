//! Stats socket subsystem.
//!
//! # Data Flow
//! ```text
//! Stats query (transport.rs):
//!     connect unix socket → write "show stat\n"
//!     → read with 1s bound per read → reassemble lines
//!
//! Line decoding (parser.rs):
//!     CSV line → 51-column schema → Entry
//!     status token → availability percent
//!
//! Restart guard (uptime.rs):
//!     "show info\n" → "Uptime_sec: N" → seconds
//! ```
//!
//! # Design Decisions
//! - One connection per query; the socket is closed on every exit path
//! - No retries inside a query; the next polling cycle is the retry
//! - Malformed lines are skipped, never surfaced as errors

pub mod error;
pub mod parser;
pub mod transport;
pub mod uptime;

pub use error::{QueryError, QueryResult};
pub use parser::{Entry, EntityType, HttpResponses, StatsParser};
pub use transport::StatsSocket;
