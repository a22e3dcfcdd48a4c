//! Configuration module for the wheel desk.
//!
//! Loads the YAML configuration, interpolates environment variables and
//! validates the result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wheel_desk::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! println!("backend: {}", config.backend.base_url);
//! ```

mod backend;
mod observability;
mod session;
mod storage;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use backend::{BackendConfig, RetrySettings};
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};
pub use session::SessionConfig;
pub use storage::StorageConfig;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Assistant backend connection.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Session defaults and pacing.
    #[serde(default)]
    pub session: SessionConfig,
    /// Local settings storage.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// A missing file at the default path yields the default configuration; a
/// missing file at an explicit path is an error.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let explicit = path.is_some();
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path, "No config file, using defaults");
            String::new()
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_string(),
                source: e,
            });
        }
    };

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

fn validate_otm(field: &str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value >= Decimal::ONE_HUNDRED {
        return Err(ConfigError::ValidationError(format!(
            "{field} must be in [0, 100), got {value}"
        )));
    }
    Ok(())
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = &config.backend.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "backend.base_url must start with http:// or https://, got '{base_url}'"
        )));
    }

    let retry = &config.backend.retry;
    if retry.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "backend.retry.max_attempts must be at least 1".to_string(),
        ));
    }
    if retry.multiplier.is_nan() || retry.multiplier < 1.0 {
        return Err(ConfigError::ValidationError(
            "backend.retry.multiplier must be >= 1.0".to_string(),
        ));
    }

    if config.backend.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "backend.timeout_secs must be positive".to_string(),
        ));
    }

    let session = &config.session;
    if session.order_poll_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "session.order_poll_interval_secs must be positive".to_string(),
        ));
    }
    validate_otm("session.default_call_otm_pct", session.default_call_otm_pct)?;
    validate_otm("session.default_put_otm_pct", session.default_put_otm_pct)?;
    validate_otm(
        "session.default_rollover_otm_pct",
        session.default_rollover_otm_pct,
    )?;

    if config.storage.settings_path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.settings_path must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.backend.base_url, "http://localhost:5001/api");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.session.bulk_delay_ms, 500);
        assert_eq!(config.session.order_poll_interval_secs, 10);
        assert_eq!(config.session.default_call_otm_pct, dec!(10));
        assert_eq!(config.session.rollover_expiration_offset_days, 7);
        assert_eq!(config.storage.settings_path, "wheel-settings.json");
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = load_config_from_string("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "base_url: ${WHEEL_DESK_CONFIG_TEST_NONEXISTENT_VAR:-http://backend:5001/api}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "base_url: http://backend:5001/api");
    }

    #[test]
    // ${...} is env var syntax, not format args
    #[expect(clippy::literal_string_with_formatting_args)]
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "token: ${WHEEL_DESK_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "token: ");
    }

    #[test]
    fn test_validation_rejects_non_http_base_url() {
        let yaml = r"
backend:
  base_url: ftp://localhost/api
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for base_url");
        };
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_validation_rejects_shrinking_backoff() {
        let yaml = r"
backend:
  retry:
    multiplier: 0.5
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for multiplier");
        };
        assert!(err.to_string().contains("multiplier"));
    }

    #[test]
    fn test_validation_rejects_zero_poll_interval() {
        let yaml = r"
session:
  order_poll_interval_secs: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for poll interval");
        };
        assert!(err.to_string().contains("order_poll_interval_secs"));
    }

    #[test]
    fn test_validation_rejects_otm_out_of_range() {
        let yaml = r"
session:
  default_put_otm_pct: 100
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for OTM");
        };
        assert!(err.to_string().contains("default_put_otm_pct"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
backend:
  base_url: "https://wheel.example.com/api/"
  timeout_secs: 5
  retry:
    max_attempts: 5
    initial_backoff_ms: 250
    max_backoff_ms: 4000
    multiplier: 3.0

session:
  bulk_delay_ms: 0
  order_poll_interval_secs: 15
  default_call_otm_pct: 12.5
  default_put_otm_pct: 8
  rollover_expiration_offset_days: 14
  default_rollover_otm_pct: 5

storage:
  settings_path: "/var/lib/wheel/settings.json"

observability:
  logging:
    level: "wheel_desk=debug"
    format: "pretty"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        let http = config.backend.to_http_config();
        assert_eq!(http.normalized_base_url(), "https://wheel.example.com/api");
        assert_eq!(http.timeout, Duration::from_secs(5));
        assert_eq!(http.retry.max_attempts, 5);
        assert_eq!(http.retry.initial_backoff, Duration::from_millis(250));

        let defaults = config.session.to_defaults();
        assert_eq!(defaults.ticker_settings.call_otm_pct, dec!(12.5));
        assert_eq!(defaults.ticker_settings.put_otm_pct, dec!(8));
        assert_eq!(defaults.rollover_offset_days, 14);
        assert_eq!(defaults.rollover_otm_pct, dec!(5));
        assert_eq!(config.session.bulk_delay(), Duration::ZERO);
        assert_eq!(config.session.poller_config().interval, Duration::from_secs(15));

        assert_eq!(config.storage.settings_path, "/var/lib/wheel/settings.json");
        assert_eq!(config.observability.logging.level, "wheel_desk=debug");
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        let Err(err) = load_config(path.to_str()) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
