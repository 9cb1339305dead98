//! Stats report line decoding.
//!
//! Each report row is a comma separated line following a fixed 51-column
//! schema. Only the columns listed in [`column`] are interpreted; the rest
//! are ignored. Rows lacking a proxy or server name are dropped, as are
//! comment lines starting with `#`.

use std::ops::ControlFlow;

use serde::Serialize;

use crate::stats::error::QueryResult;
use crate::stats::transport::{StatsSocket, SHOW_STAT};

/// Number of columns in the report schema.
pub const FIELD_COUNT: usize = 51;

/// Indices of the interpreted report columns.
pub mod column {
    pub const PXNAME: usize = 0;
    pub const SVNAME: usize = 1;
    pub const STOT: usize = 7;
    pub const BIN: usize = 8;
    pub const BOUT: usize = 9;
    pub const DREQ: usize = 10;
    pub const DRESP: usize = 11;
    pub const EREQ: usize = 12;
    pub const ECON: usize = 13;
    pub const ERESP: usize = 14;
    pub const STATUS: usize = 17;
    pub const TYPE: usize = 32;
    pub const RATE: usize = 33;
    pub const HRSP_1XX: usize = 39;
    pub const HRSP_2XX: usize = 40;
    pub const HRSP_3XX: usize = 41;
    pub const HRSP_4XX: usize = 42;
    pub const HRSP_5XX: usize = 43;
    pub const HRSP_OTHER: usize = 44;
    pub const REQ_RATE: usize = 46;
}

/// Kind of row reported by the load balancer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Frontend,
    Backend,
    Server,
    Listener,
    Other(u64),
}

impl From<u64> for EntityType {
    fn from(raw: u64) -> Self {
        match raw {
            0 => EntityType::Frontend,
            1 => EntityType::Backend,
            2 => EntityType::Server,
            3 => EntityType::Listener,
            other => EntityType::Other(other),
        }
    }
}

impl EntityType {
    /// HTTP response counters are only meaningful above the socket layer.
    pub fn has_http_codes(&self) -> bool {
        matches!(
            self,
            EntityType::Frontend | EntityType::Backend | EntityType::Server
        )
    }
}

/// HTTP responses by status class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HttpResponses {
    pub informational: u64,
    pub success: u64,
    pub redirection: u64,
    pub client_error: u64,
    pub server_error: u64,
    pub other: u64,
}

/// One decoded report row. Lives for a single polling cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub proxy_name: String,
    pub server_name: String,
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// Session total scaled by the polling interval.
    pub sessions_total: u64,
    /// Session rate scaled by the polling interval.
    pub session_rate: u64,
    pub request_errors: u64,
    pub response_errors: u64,
    pub connection_errors: u64,
    pub requests_denied: u64,
    pub responses_denied: u64,
    pub entity_type: EntityType,
    pub request_rate: u64,
    pub http_responses: HttpResponses,
    /// Derived from the status token, 0.0 to 100.0.
    pub availability: f64,
}

impl Entry {
    /// Composite `server-proxy` identifier used to tag submissions.
    pub fn instance(&self) -> String {
        format!("{}-{}", self.server_name, self.proxy_name)
    }
}

/// Decodes report lines into entries.
#[derive(Debug, Clone, Copy)]
pub struct StatsParser {
    interval_secs: u64,
}

impl StatsParser {
    /// `interval_secs` scales the rate-style session columns.
    pub fn new(interval_secs: u64) -> Self {
        Self { interval_secs }
    }

    /// Decode one line, or `None` for comments and rows without names.
    pub fn parse_line(&self, line: &str) -> Option<Entry> {
        if line.starts_with('#') {
            return None;
        }

        let fields: Vec<&str> = line.split(',').take(FIELD_COUNT).collect();
        let proxy_name = fields.get(column::PXNAME)?;
        let server_name = fields.get(column::SVNAME)?;

        let num = |idx: usize| fields.get(idx).map_or(0, |f| leading_u64(f));
        let scaled = |idx: usize| num(idx).saturating_mul(self.interval_secs);

        Some(Entry {
            proxy_name: (*proxy_name).to_owned(),
            server_name: (*server_name).to_owned(),
            bytes_in: num(column::BIN),
            bytes_out: num(column::BOUT),
            sessions_total: scaled(column::STOT),
            session_rate: scaled(column::RATE),
            request_errors: num(column::EREQ),
            response_errors: num(column::ERESP),
            connection_errors: num(column::ECON),
            requests_denied: num(column::DREQ),
            responses_denied: num(column::DRESP),
            entity_type: EntityType::from(num(column::TYPE)),
            request_rate: num(column::REQ_RATE),
            http_responses: HttpResponses {
                informational: num(column::HRSP_1XX),
                success: num(column::HRSP_2XX),
                redirection: num(column::HRSP_3XX),
                client_error: num(column::HRSP_4XX),
                server_error: num(column::HRSP_5XX),
                other: num(column::HRSP_OTHER),
            },
            availability: fields.get(column::STATUS).map_or(0.0, |s| availability(s)),
        })
    }
}

/// Query `show stat` and decode every data row.
pub async fn fetch_entries(socket: &StatsSocket, parser: &StatsParser) -> QueryResult<Vec<Entry>> {
    let mut entries = Vec::new();
    socket
        .query_with(SHOW_STAT, |line| {
            match parser.parse_line(line) {
                Some(entry) => entries.push(entry),
                None if !line.is_empty() && !line.starts_with('#') => {
                    tracing::debug!(line, "Skipping malformed stats line");
                }
                None => {}
            }
            ControlFlow::Continue(())
        })
        .await?;
    Ok(entries)
}

/// Map a status token to an availability percentage.
///
/// `UP x/y` and `DOWN x/y` carry the progress of a pending transition; a
/// zero denominator falls back to the whole-value case.
pub fn availability(token: &str) -> f64 {
    if let Some(rest) = token.strip_prefix("UP") {
        match fraction(rest) {
            Some((num, den)) => 100.0 * num / den,
            None => 100.0,
        }
    } else if let Some(rest) = token.strip_prefix("DOWN") {
        match fraction(rest) {
            Some((num, den)) => 100.0 - 100.0 * num / den,
            None => 0.0,
        }
    } else if token == "OPEN" {
        100.0
    } else if token == "no check" {
        // neutral, never drives a transition
        50.0
    } else {
        0.0
    }
}

fn fraction(s: &str) -> Option<(f64, f64)> {
    let (num, den) = s.split_once('/')?;
    let den = leading_i64(den);
    if den == 0 {
        return None;
    }
    Some((leading_i64(num) as f64, den as f64))
}

/// Leading decimal digits after optional whitespace; anything else is 0.
pub(crate) fn leading_u64(s: &str) -> u64 {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return 0;
    }
    s[..end].parse().unwrap_or(u64::MAX)
}

fn leading_i64(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map_or(0, |v| sign * v)
}
