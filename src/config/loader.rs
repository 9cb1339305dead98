//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::CollectorConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<CollectorConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<CollectorConfig, ConfigError> {
    let config: CollectorConfig = toml::from_str(content).map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MetricCategories, NotificationCategories};

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.socket_path, "/var/run/haproxy-stats.sock");
        assert_eq!(config.restart_gap, 20);
        assert_eq!(config.metric_categories(), MetricCategories::all());
        assert!(config.notification_categories().is_empty());
        assert!(config.filters().is_empty());
    }

    #[test]
    fn test_full_option_surface() {
        let config = parse_config(
            r#"
            SocketPath = "/run/haproxy/admin.sock"
            Interval = 15
            RestartGap = 30
            DisableBytes = true
            DisableHttpCodes = true
            NotifStatusDown = true
            PxFilter = ["www", "api"]
            SvFilter = ["BACKEND"]

            [Observability]
            LogLevel = "debug"
            MetricsEnabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.socket_path, "/run/haproxy/admin.sock");
        assert_eq!(config.interval, 15);
        let metrics = config.metric_categories();
        assert!(!metrics.contains(MetricCategories::BYTES));
        assert!(!metrics.contains(MetricCategories::HTTP_CODES));
        assert!(metrics.contains(MetricCategories::SESSIONS | MetricCategories::DENY));
        let notifs = config.notification_categories();
        assert!(notifs.contains(NotificationCategories::STATUS_DOWN));
        assert!(!notifs.contains(NotificationCategories::STATUS_UP));
        assert!(config.filters().includes_names("API", "backend"));
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            parse_config("SocketFile = \"/tmp/x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_failure_surfaces() {
        let err = parse_config("Interval = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().starts_with("Validation failed"));
    }
}
