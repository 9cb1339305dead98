//! Configuration schema definitions.
//!
//! Keys keep the option names the collector has always used
//! (`DisableBytes`, `PxFilter`, `SocketPath`, ...). All types derive Serde
//! traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::categories::{MetricCategories, NotificationCategories};
use crate::health::Filters;
use crate::stats::transport::DEFAULT_SOCKET_PATH;

/// Root configuration for the collector.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct CollectorConfig {
    /// Path of the load balancer's stats socket.
    pub socket_path: String,

    /// Polling interval in seconds. Also scales the session counters.
    pub interval: u64,

    /// Minimum load balancer uptime, in seconds, before a cycle is trusted.
    pub restart_gap: u64,

    /// Host label attached to submissions. Defaults to the local hostname.
    pub hostname: Option<String>,

    pub disable_bytes: bool,
    pub disable_deny: bool,
    pub disable_errors: bool,
    pub disable_sessions: bool,
    pub disable_status: bool,
    pub disable_http_codes: bool,

    pub notif_status_down: bool,
    pub notif_status_up: bool,

    /// Proxy allow-list (case-insensitive).
    pub px_filter: Vec<String>,

    /// Server allow-list (case-insensitive).
    pub sv_filter: Vec<String>,

    /// Logging and exporter settings.
    pub observability: ObservabilityConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            socket_path: DEFAULT_SOCKET_PATH.to_string(),
            interval: 10,
            restart_gap: 20,
            hostname: None,
            disable_bytes: false,
            disable_deny: false,
            disable_errors: false,
            disable_sessions: false,
            disable_status: false,
            disable_http_codes: false,
            notif_status_down: false,
            notif_status_up: false,
            px_filter: Vec::new(),
            sv_filter: Vec::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Metric categories left enabled after the `Disable*` switches.
    pub fn metric_categories(&self) -> MetricCategories {
        let mut enabled = MetricCategories::all();
        let switches = [
            (self.disable_bytes, MetricCategories::BYTES),
            (self.disable_deny, MetricCategories::DENY),
            (self.disable_errors, MetricCategories::ERRORS),
            (self.disable_sessions, MetricCategories::SESSIONS),
            (self.disable_status, MetricCategories::STATUS),
            (self.disable_http_codes, MetricCategories::HTTP_CODES),
        ];
        for (disabled, category) in switches {
            if disabled {
                enabled.remove(category);
            }
        }
        enabled
    }

    /// Notification categories switched on by the `Notif*` options.
    pub fn notification_categories(&self) -> NotificationCategories {
        let mut enabled = NotificationCategories::empty();
        if self.notif_status_down {
            enabled.insert(NotificationCategories::STATUS_DOWN);
        }
        if self.notif_status_up {
            enabled.insert(NotificationCategories::STATUS_UP);
        }
        enabled
    }

    pub fn filters(&self) -> Filters {
        Filters::new(self.px_filter.iter().cloned(), self.sv_filter.iter().cloned())
    }

    /// Host label for submissions and notifications.
    pub fn host(&self) -> String {
        if let Some(host) = self.hostname.as_deref().filter(|h| !h.is_empty()) {
            return host.to_string();
        }
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "localhost".to_string())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Expose the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Scrape endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9101".to_string(),
        }
    }
}
