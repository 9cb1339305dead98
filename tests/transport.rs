//! Socket protocol tests against a mock stats socket.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use haproxy_collector::stats::parser::fetch_entries;
use haproxy_collector::stats::transport::{SHOW_INFO, SHOW_STAT};
use haproxy_collector::stats::uptime::fetch_uptime;
use haproxy_collector::stats::{QueryError, StatsParser, StatsSocket};

mod common;

#[tokio::test]
async fn test_query_reassembles_lines_across_reads() {
    let mock = common::start_mock_socket(|_| {
        vec![
            "first line\nfe1,sv1,0,0,0,0,0,1".to_string(),
            "20,1000,2000\ntrailing partial".to_string(),
        ]
    })
    .await;

    let lines = StatsSocket::new(mock.path()).query(SHOW_STAT).await.unwrap();
    assert_eq!(
        lines,
        vec![
            "first line".to_string(),
            "fe1,sv1,0,0,0,0,0,120,1000,2000".to_string()
        ]
    );
}

#[tokio::test]
async fn test_row_split_mid_token_parses_once() {
    let row = "fe1,sv1,0,0,0,0,0,120,1000,2000,0,0,0,0,0,0,0,UP,,,,,,,,,,,,,,,,0,0,0,0,0,0,0,0,0,0,0,0,0\n";
    let (head, tail) = row.split_at(25);
    let chunks = vec![
        format!("{}\n", common::HEADER),
        head.to_string(),
        tail.to_string(),
    ];
    let mock = common::start_mock_socket(move |_| chunks.clone()).await;

    let entries = fetch_entries(&StatsSocket::new(mock.path()), &StatsParser::new(10))
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].proxy_name, "fe1");
    assert_eq!(entries[0].server_name, "sv1");
    assert_eq!(entries[0].sessions_total, 1200);
    assert_eq!(entries[0].bytes_out, 2000);
    assert_eq!(entries[0].availability, 100.0);
}

#[tokio::test]
async fn test_sends_exact_commands() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let mock = common::start_mock_socket(move |command| {
        recorder.lock().unwrap().push(command.to_string());
        if command == SHOW_INFO {
            common::info_response(500)
        } else {
            vec![format!("{}\n", common::stats_row("www", "web01", "UP", 2))]
        }
    })
    .await;
    let socket = StatsSocket::new(mock.path());

    let entries = fetch_entries(&socket, &StatsParser::new(10)).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(fetch_uptime(&socket).await.unwrap(), 500);

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, vec!["show stat\n".to_string(), "show info\n".to_string()]);
}

#[tokio::test]
async fn test_uptime_missing() {
    let mock = common::start_mock_socket(|_| vec!["Name: HAProxy\nPid: 1\n".to_string()]).await;

    let result = fetch_uptime(&StatsSocket::new(mock.path())).await;
    assert!(matches!(result, Err(QueryError::UptimeMissing)));
}

#[tokio::test]
async fn test_connect_failure() {
    let socket = StatsSocket::new("/nonexistent/haproxy-stats.sock");

    let result = socket.query(SHOW_STAT).await;
    assert!(matches!(result, Err(QueryError::Connect { .. })));
}

#[tokio::test]
async fn test_read_timeout() {
    let mock = common::start_silent_socket().await;
    let socket = StatsSocket::new(mock.path()).with_timeout(Duration::from_millis(100));

    let result = socket.query(SHOW_STAT).await;
    assert!(matches!(result, Err(QueryError::Timeout(100))));
}

#[tokio::test]
async fn test_overlong_line_fails_query() {
    let mock = common::start_mock_socket(|_| vec!["x".repeat(3000)]).await;

    let result = StatsSocket::new(mock.path()).query(SHOW_STAT).await;
    assert!(matches!(result, Err(QueryError::LineTooLong(2047))));
}
