//! Global configuration types for Conference Central.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! listening address, the announcement threshold and telemetry export.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.confcentral/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Address the REST API binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the REST API listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Conferences with at most this many (but more than zero) seats left
    /// are listed in the announcement.
    #[serde(default = "default_nearly_sold_out_seats")]
    pub nearly_sold_out_seats: i64,

    /// Bridge tracing spans to the OpenTelemetry stdout exporter.
    #[serde(default)]
    pub enable_otel: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_nearly_sold_out_seats() -> i64 {
    5
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            nearly_sold_out_seats: default_nearly_sold_out_seats(),
            enable_otel: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.nearly_sold_out_seats, 5);
        assert!(!config.enable_otel);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
host = "0.0.0.0"
port = 9000
nearly_sold_out_seats = 10
enable_otel = true
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.nearly_sold_out_seats, 10);
        assert!(config.enable_otel);
    }
}
