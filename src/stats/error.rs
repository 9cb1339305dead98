//! Query failure kinds.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a stats or info query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The socket could not be opened or connected.
    #[error("failed to connect to {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Connect did not complete within the bound.
    #[error("connect to {} timed out after {timeout_ms} ms", path.display())]
    ConnectTimeout { path: PathBuf, timeout_ms: u64 },

    /// Fewer command bytes were accepted than sent.
    #[error("short write: {written} of {expected} bytes accepted")]
    WriteShort { written: usize, expected: usize },

    /// Sending the command failed outright.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// Reading the response failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// No data became readable within the per-read bound.
    #[error("no data within {0} ms")]
    Timeout(u64),

    /// A single line did not fit the receive buffer.
    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),

    /// The info response ended without an `Uptime_sec:` line.
    #[error("Uptime_sec not found in info response")]
    UptimeMissing,
}

/// Result type for socket queries.
pub type QueryResult<T> = Result<T, QueryError>;
