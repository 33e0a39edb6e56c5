//! Global configuration loader for Conference Central.
//!
//! Reads `config.toml` from the data directory (`~/.confcentral/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! sensible defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use confcentral_types::config::GlobalConfig;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CONFCENTRAL_DATA_DIR";

/// Resolve the data directory.
///
/// Priority: `CONFCENTRAL_DATA_DIR`, then `~/.confcentral`, then
/// `./.confcentral` when no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".confcentral");
    }

    PathBuf::from(".confcentral")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config; omitted keys take their defaults.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    let config = match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
    };

    if config.nearly_sold_out_seats < 1 {
        tracing::warn!(
            nearly_sold_out_seats = config.nearly_sold_out_seats,
            "nearly_sold_out_seats must be at least 1, using default"
        );
        return GlobalConfig {
            nearly_sold_out_seats: GlobalConfig::default().nearly_sold_out_seats,
            ..config
        };
    }

    config
}
