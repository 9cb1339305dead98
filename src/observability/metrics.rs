//! Metric submissions and their sinks.
//!
//! # Metrics
//! - `hap_bytes` (counter): bin, bout
//! - `hap_sessions` (counter): stot, rate
//! - `frequency` (gauge): request rate
//! - `hap_errors` (counter): ereq, eresp, econ
//! - `hap_http_codes` (counter): 1xx, 2xx, 3xx, 4xx, 5xx, other
//! - `hap_deny` (counter): dreq, dresp
//! - `hap_status` (gauge): availability percent
//!
//! Every submission is tagged with the host and a `server-proxy` instance.

use std::fmt;
use std::net::SocketAddr;
use std::time::SystemTime;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::stats::HttpResponses;

/// Plugin name carried by every submission and notification.
pub const PLUGIN: &str = "haproxy";

/// Notification type for state changes.
pub const STATUS_NOTIFICATION: &str = "hap_status";

/// A single data-source value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Counter(u64),
    Gauge(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Counter(v) => write!(f, "{}", v),
            Value::Gauge(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytesMetric {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionsMetric {
    pub total: u64,
    pub rate: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyMetric {
    pub request_rate: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorsMetric {
    pub request: u64,
    pub response: u64,
    pub connection: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenyMetric {
    pub request: u64,
    pub response: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusMetric {
    pub availability: f64,
}

/// One typed metric category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Bytes(BytesMetric),
    Sessions(SessionsMetric),
    Frequency(FrequencyMetric),
    Errors(ErrorsMetric),
    HttpCodes(HttpResponses),
    Deny(DenyMetric),
    Status(StatusMetric),
}

impl Metric {
    /// Type name the sink files this metric under.
    pub fn type_name(&self) -> &'static str {
        match self {
            Metric::Bytes(_) => "hap_bytes",
            Metric::Sessions(_) => "hap_sessions",
            Metric::Frequency(_) => "frequency",
            Metric::Errors(_) => "hap_errors",
            Metric::HttpCodes(_) => "hap_http_codes",
            Metric::Deny(_) => "hap_deny",
            Metric::Status(_) => "hap_status",
        }
    }

    /// Named values in data-source order.
    pub fn values(&self) -> Vec<(&'static str, Value)> {
        use Value::{Counter, Gauge};

        match *self {
            Metric::Bytes(m) => vec![("bin", Counter(m.bytes_in)), ("bout", Counter(m.bytes_out))],
            Metric::Sessions(m) => vec![("stot", Counter(m.total)), ("rate", Counter(m.rate))],
            Metric::Frequency(m) => vec![("value", Gauge(m.request_rate as f64))],
            Metric::Errors(m) => vec![
                ("ereq", Counter(m.request)),
                ("eresp", Counter(m.response)),
                ("econ", Counter(m.connection)),
            ],
            Metric::HttpCodes(m) => vec![
                ("1xx", Counter(m.informational)),
                ("2xx", Counter(m.success)),
                ("3xx", Counter(m.redirection)),
                ("4xx", Counter(m.client_error)),
                ("5xx", Counter(m.server_error)),
                ("other", Counter(m.other)),
            ],
            Metric::Deny(m) => vec![("dreq", Counter(m.request)), ("dresp", Counter(m.response))],
            Metric::Status(m) => vec![("value", Gauge(m.availability))],
        }
    }
}

/// A metric tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub host: String,
    pub plugin: &'static str,
    /// `server-proxy`
    pub instance: String,
    pub metric: Metric,
}

impl fmt::Display for Submission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}-{}",
            self.host,
            self.plugin,
            self.metric.type_name(),
            self.instance
        )?;
        for (i, (_, value)) in self.metric.values().iter().enumerate() {
            let sep = if i == 0 { ' ' } else { ':' };
            write!(f, "{}{}", sep, value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Okay,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("WARNING"),
            Severity::Okay => f.write_str("OKAY"),
        }
    }
}

/// A state-change event.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub severity: Severity,
    pub time: SystemTime,
    pub host: String,
    pub plugin: &'static str,
    pub type_name: &'static str,
    /// `server-proxy`
    pub instance: String,
    pub message: String,
}

/// Destination for submissions and notifications.
pub trait MetricSink: Send {
    fn submit(&mut self, submission: Submission);

    fn notify(&mut self, notification: Notification);
}

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Forwards submissions to the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusSink;

impl PrometheusSink {
    pub fn new() -> Self {
        Self
    }
}

impl MetricSink for PrometheusSink {
    fn submit(&mut self, submission: Submission) {
        let name = submission.metric.type_name();
        for (ds, value) in submission.metric.values() {
            match value {
                Value::Counter(v) => ::metrics::counter!(
                    name,
                    "host" => submission.host.clone(),
                    "type_instance" => submission.instance.clone(),
                    "ds" => ds
                )
                .absolute(v),
                Value::Gauge(v) => ::metrics::gauge!(
                    name,
                    "host" => submission.host.clone(),
                    "type_instance" => submission.instance.clone(),
                    "ds" => ds
                )
                .set(v),
            }
        }
    }

    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Warning => tracing::warn!(
                host = %notification.host,
                instance = %notification.instance,
                type_name = notification.type_name,
                "{}", notification.message
            ),
            Severity::Okay => tracing::info!(
                host = %notification.host,
                instance = %notification.instance,
                type_name = notification.type_name,
                "{}", notification.message
            ),
        }

        ::metrics::counter!(
            "hap_notifications_total",
            "host" => notification.host,
            "type_instance" => notification.instance,
            "message" => notification.message
        )
        .increment(1);
    }
}

/// Keeps everything it receives, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub submissions: Vec<Submission>,
    pub notifications: Vec<Notification>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// First submission with the given type and instance.
    pub fn find(&self, type_name: &str, instance: &str) -> Option<&Submission> {
        self.submissions
            .iter()
            .find(|s| s.metric.type_name() == type_name && s.instance == instance)
    }

    pub fn clear(&mut self) {
        self.submissions.clear();
        self.notifications.clear();
    }
}

impl MetricSink for MemorySink {
    fn submit(&mut self, submission: Submission) {
        self.submissions.push(submission);
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_shapes() {
        let bytes = Metric::Bytes(BytesMetric {
            bytes_in: 1,
            bytes_out: 2,
        });
        assert_eq!(bytes.type_name(), "hap_bytes");
        assert_eq!(bytes.values().len(), 2);

        let codes = Metric::HttpCodes(HttpResponses::default());
        assert_eq!(codes.values().len(), 6);
        assert!(codes
            .values()
            .iter()
            .all(|(_, v)| matches!(v, Value::Counter(0))));

        let status = Metric::Status(StatusMetric { availability: 50.0 });
        assert_eq!(status.values(), vec![("value", Value::Gauge(50.0))]);
    }

    #[test]
    fn test_submission_display() {
        let submission = Submission {
            host: "lb1".into(),
            plugin: PLUGIN,
            instance: "sv1-fe1".into(),
            metric: Metric::Errors(ErrorsMetric {
                request: 1,
                response: 2,
                connection: 3,
            }),
        };
        assert_eq!(submission.to_string(), "lb1/haproxy/hap_errors-sv1-fe1 1:2:3");
    }

    #[test]
    fn test_memory_sink_find() {
        let mut sink = MemorySink::new();
        sink.submit(Submission {
            host: "lb1".into(),
            plugin: PLUGIN,
            instance: "sv1-fe1".into(),
            metric: Metric::Status(StatusMetric { availability: 100.0 }),
        });

        assert!(sink.find("hap_status", "sv1-fe1").is_some());
        assert!(sink.find("hap_bytes", "sv1-fe1").is_none());

        sink.clear();
        assert!(sink.submissions.is_empty());
    }
}
