//! Process uptime probe used as the restart guard.

use std::ops::ControlFlow;

use crate::stats::error::{QueryError, QueryResult};
use crate::stats::parser::leading_u64;
use crate::stats::transport::{StatsSocket, SHOW_INFO};

/// Line prefix carrying the uptime in the `show info` response.
pub const UPTIME_PREFIX: &str = "Uptime_sec:";

/// Query `show info` and return the load balancer's uptime in seconds.
///
/// Reading stops at the first `Uptime_sec:` line.
pub async fn fetch_uptime(socket: &StatsSocket) -> QueryResult<u64> {
    let mut uptime = None;
    socket
        .query_with(SHOW_INFO, |line| match parse_uptime(line) {
            Some(secs) => {
                uptime = Some(secs);
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        })
        .await?;
    uptime.ok_or(QueryError::UptimeMissing)
}

/// Extract the seconds from an `Uptime_sec: N` line.
pub fn parse_uptime(line: &str) -> Option<u64> {
    line.strip_prefix(UPTIME_PREFIX).map(leading_u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uptime() {
        assert_eq!(parse_uptime("Uptime_sec: 500"), Some(500));
        assert_eq!(parse_uptime("Uptime_sec:42"), Some(42));
        assert_eq!(parse_uptime("Uptime: 0d 0h08m20s"), None);
        assert_eq!(parse_uptime("Name: HAProxy"), None);
    }
}
