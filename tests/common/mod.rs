//! Shared utilities for integration tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};

use haproxy_collector::config::CollectorConfig;

pub const HEADER: &str = "# pxname,svname,qcur,qmax,scur,smax,slim,stot,bin,bout,dreq,dresp,ereq,econ,eresp,wretr,wredis,status,weight,act,bck,chkfail,chkdown,lastchg,downtime,qlimit,pid,iid,sid,throttle,lbtot,tracked,type,rate,rate_lim,rate_max,check_status,check_code,check_duration,hrsp_1xx,hrsp_2xx,hrsp_3xx,hrsp_4xx,hrsp_5xx,hrsp_other,hanafail,req_rate,req_rate_max,req_tot,cli_abrt,srv_abrt,";

/// A stats socket living in its own temporary directory.
pub struct MockSocket {
    _dir: TempDir,
    path: PathBuf,
}

impl MockSocket {
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Collector config pointing at this socket.
    #[allow(dead_code)]
    pub fn config(&self) -> CollectorConfig {
        CollectorConfig {
            socket_path: self.path.display().to_string(),
            interval: 10,
            restart_gap: 20,
            hostname: Some("lb1".into()),
            ..CollectorConfig::default()
        }
    }
}

/// Build a 51-column stats row.
pub fn stats_row(proxy: &str, server: &str, status: &str, kind: u64) -> String {
    let mut fields = vec![String::from("0"); 51];
    fields[0] = proxy.into();
    fields[1] = server.into();
    fields[7] = "5".into();
    fields[8] = "100".into();
    fields[9] = "200".into();
    fields[17] = status.into();
    fields[32] = kind.to_string();
    let mut row = fields.join(",");
    row.push(',');
    row
}

/// `show info` response reporting `uptime` seconds.
pub fn info_response(uptime: u64) -> Vec<String> {
    vec![format!(
        "Name: HAProxy\nVersion: 2.8.3\nPid: 1\nUptime: 0d 0h00m00s\nUptime_sec: {}\nMemmax_MB: 0\n",
        uptime
    )]
}

/// Start a mock socket. `respond` maps the received command to the chunks
/// written back; each chunk goes out in its own write.
pub async fn start_mock_socket<F>(respond: F) -> MockSocket
where
    F: Fn(&str) -> Vec<String> + Send + Sync + 'static,
{
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.sock");
    let listener = UnixListener::bind(&path).unwrap();
    let respond = std::sync::Arc::new(respond);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        let command = read_command(&mut socket).await;
                        for chunk in respond(&command) {
                            if socket.write_all(chunk.as_bytes()).await.is_err() {
                                return;
                            }
                            let _ = socket.flush().await;
                            tokio::time::sleep(Duration::from_millis(20)).await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockSocket { _dir: dir, path }
}

/// Start a socket that accepts and reads the command but never answers.
#[allow(dead_code)]
pub async fn start_silent_socket() -> MockSocket {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silent.sock");
    let listener = UnixListener::bind(&path).unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_command(&mut socket).await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });

    MockSocket { _dir: dir, path }
}

/// Start a socket that writes `body` and then holds the connection open
/// without sending anything else.
#[allow(dead_code)]
pub async fn start_stalling_socket(body: String) -> MockSocket {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stalling.sock");
    let listener = UnixListener::bind(&path).unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let _ = read_command(&mut socket).await;
                let _ = socket.write_all(body.as_bytes()).await;
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });

    MockSocket { _dir: dir, path }
}

async fn read_command(socket: &mut UnixStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 64];
    while !buf.contains(&b'\n') {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
