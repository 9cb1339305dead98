//! Entry to submission conversion.

use std::time::SystemTime;

use crate::config::MetricCategories;
use crate::health::{Status, Transition};
use crate::observability::metrics::{
    BytesMetric, DenyMetric, ErrorsMetric, FrequencyMetric, Metric, Notification, SessionsMetric,
    Severity, StatusMetric, PLUGIN, STATUS_NOTIFICATION,
};
use crate::stats::Entry;

/// Metrics for one entry across the enabled categories.
pub fn entry_metrics(entry: &Entry, enabled: MetricCategories) -> Vec<Metric> {
    let mut metrics = Vec::with_capacity(7);

    if enabled.contains(MetricCategories::BYTES) {
        metrics.push(Metric::Bytes(BytesMetric {
            bytes_in: entry.bytes_in,
            bytes_out: entry.bytes_out,
        }));
    }

    if enabled.contains(MetricCategories::SESSIONS) {
        metrics.push(Metric::Sessions(SessionsMetric {
            total: entry.sessions_total,
            rate: entry.session_rate,
        }));
        metrics.push(Metric::Frequency(FrequencyMetric {
            request_rate: entry.request_rate,
        }));
    }

    if enabled.contains(MetricCategories::ERRORS) {
        metrics.push(Metric::Errors(ErrorsMetric {
            request: entry.request_errors,
            response: entry.response_errors,
            connection: entry.connection_errors,
        }));
    }

    // listener sockets carry no HTTP response counters
    if enabled.contains(MetricCategories::HTTP_CODES) && entry.entity_type.has_http_codes() {
        metrics.push(Metric::HttpCodes(entry.http_responses));
    }

    if enabled.contains(MetricCategories::DENY) {
        metrics.push(Metric::Deny(DenyMetric {
            request: entry.requests_denied,
            response: entry.responses_denied,
        }));
    }

    if enabled.contains(MetricCategories::STATUS) {
        metrics.push(Metric::Status(StatusMetric {
            availability: entry.availability,
        }));
    }

    metrics
}

/// Notification announcing a state transition.
pub fn status_notification(transition: &Transition, host: &str) -> Notification {
    let severity = match transition.to {
        Status::Down => Severity::Warning,
        Status::Up => Severity::Okay,
    };

    Notification {
        severity,
        time: SystemTime::now(),
        host: host.to_string(),
        plugin: PLUGIN,
        type_name: STATUS_NOTIFICATION,
        instance: format!("{}-{}", transition.server, transition.proxy),
        message: transition.to.as_str().to_string(),
    }
}
