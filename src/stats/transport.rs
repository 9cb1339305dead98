//! Unix stream socket client for the load balancer's admin socket.
//!
//! # Responsibilities
//! - Connect with a bounded wait
//! - Send one command in a single write
//! - Read until the remote end closes, splitting on newlines
//!
//! # Design Decisions
//! - Every read is bounded by the same timeout (1000 ms by default)
//! - The receive buffer never holds more than `MAX_LINE_LEN` bytes, so a
//!   line longer than that fails the query
//! - A partial line left when the stream ends is dropped

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time;

use crate::stats::error::{QueryError, QueryResult};

/// Default location of the stats socket.
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/haproxy-stats.sock";

/// Command returning the CSV stats report.
pub const SHOW_STAT: &str = "show stat\n";

/// Command returning `key: value` process information.
pub const SHOW_INFO: &str = "show info\n";

/// Maximum bytes held in the receive buffer at once.
pub const MAX_LINE_LEN: usize = 2047;

/// Bound applied to connect and to each read.
pub const IO_TIMEOUT: Duration = Duration::from_millis(1000);

/// Client for a stats socket at a fixed path.
#[derive(Debug, Clone)]
pub struct StatsSocket {
    path: PathBuf,
    timeout: Duration,
}

impl StatsSocket {
    /// Create a client for the socket at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            timeout: IO_TIMEOUT,
        }
    }

    /// Override the connect/read bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `command` and collect every complete response line.
    pub async fn query(&self, command: &str) -> QueryResult<Vec<String>> {
        let mut lines = Vec::new();
        self.query_with(command, |line| {
            lines.push(line.to_owned());
            ControlFlow::Continue(())
        })
        .await?;
        Ok(lines)
    }

    /// Run `command` and hand each complete line to `on_line`.
    ///
    /// Returning `ControlFlow::Break` stops reading early; the query still
    /// counts as successful.
    pub async fn query_with<F>(&self, command: &str, mut on_line: F) -> QueryResult<()>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let mut stream = self.send(command).await?;
        let mut reader = LineReader::new(MAX_LINE_LEN);
        let mut chunk = [0u8; MAX_LINE_LEN];

        loop {
            let room = reader.room();
            if room == 0 {
                return Err(QueryError::LineTooLong(MAX_LINE_LEN));
            }

            let read = match time::timeout(self.timeout, stream.read(&mut chunk[..room])).await {
                Ok(Ok(n)) => n,
                Ok(Err(e)) => return Err(QueryError::Read(e)),
                Err(_) => return Err(QueryError::Timeout(self.timeout_ms())),
            };

            if read == 0 {
                if reader.pending() > 0 {
                    tracing::debug!(
                        bytes = reader.pending(),
                        "Dropping unterminated line at end of stream"
                    );
                }
                return Ok(());
            }

            for line in reader.feed(&chunk[..read]) {
                if on_line(line.as_str()).is_break() {
                    return Ok(());
                }
            }
        }
    }

    async fn send(&self, command: &str) -> QueryResult<UnixStream> {
        let mut stream = match time::timeout(self.timeout, UnixStream::connect(&self.path)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(QueryError::Connect {
                    path: self.path.clone(),
                    source,
                })
            }
            // a non-blocking unix connect fails with EAGAIN on a full backlog
            // rather than pending, so this arm is not reachable from tests
            Err(_) => {
                return Err(QueryError::ConnectTimeout {
                    path: self.path.clone(),
                    timeout_ms: self.timeout_ms(),
                })
            }
        };

        let expected = command.len();
        let written = stream
            .write(command.as_bytes())
            .await
            .map_err(QueryError::Write)?;
        if written < expected {
            return Err(QueryError::WriteShort { written, expected });
        }

        tracing::trace!(path = %self.path.display(), command = command.trim_end(), "Command sent");
        Ok(stream)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Reassembles newline-terminated lines across reads.
#[derive(Debug)]
pub struct LineReader {
    pending: Vec<u8>,
    capacity: usize,
}

impl LineReader {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bytes that can be accepted by the next read.
    pub fn room(&self) -> usize {
        self.capacity.saturating_sub(self.pending.len())
    }

    /// Bytes of an unterminated line carried over from earlier reads.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Append `data` and return every line it completes, without the newline.
    pub fn feed(&mut self, data: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(data);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            lines.push(String::from_utf8_lossy(&self.pending[start..end]).into_owned());
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }
}
