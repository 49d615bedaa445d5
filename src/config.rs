//! Monitor settings with layered precedence: built-in defaults, then an optional file,
//! then `ORDER_MONITOR_*` environment variables.

use crate::detect::{DetectSettings, DEFAULT_PRICE_EPSILON};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const ENV_PREFIX: &str = "ORDER_MONITOR";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_NOTIFY_TIMEOUT_MS: u64 = 500;
const DEFAULT_STORE_BUFFER: usize = 64;
const DEFAULT_NOTICE_BUFFER: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Time between two floating-order sweeps.
    pub poll_interval_ms: u64,
    pub price_epsilon: f64,
    /// Upper bound on a single notifier call.
    pub notify_timeout_ms: u64,
    /// Request queue of the order store actor.
    pub store_buffer: usize,
    /// Capacity of the notice channel handed to the host UI.
    pub notice_buffer: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            price_epsilon: DEFAULT_PRICE_EPSILON,
            notify_timeout_ms: DEFAULT_NOTIFY_TIMEOUT_MS,
            store_buffer: DEFAULT_STORE_BUFFER,
            notice_buffer: DEFAULT_NOTICE_BUFFER,
        }
    }
}

impl MonitorConfig {
    /// Loads and validates the configuration.
    ///
    /// A `path` that is given must exist; its format follows the file extension.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("poll_interval_ms", defaults.poll_interval_ms)?
            .set_default("price_epsilon", defaults.price_epsilon)?
            .set_default("notify_timeout_ms", defaults.notify_timeout_ms)?
            .set_default("store_buffer", defaults.store_buffer as u64)?
            .set_default("notice_buffer", defaults.notice_buffer as u64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(env);

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        if self.notify_timeout_ms == 0 {
            return Err(ConfigError::Invalid("notify_timeout_ms must be positive".into()));
        }
        if self.store_buffer == 0 || self.notice_buffer == 0 {
            return Err(ConfigError::Invalid("channel buffers must be positive".into()));
        }
        if !self.price_epsilon.is_finite() || self.price_epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "price_epsilon must be a non-negative number, got {}",
                self.price_epsilon
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_millis(self.notify_timeout_ms)
    }

    pub fn detect_settings(&self) -> DetectSettings {
        DetectSettings {
            price_epsilon: self.price_epsilon,
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.detect_settings(), DetectSettings::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config("poll_interval_ms = 250\nprice_epsilon = 0.5\n");
        let config = MonitorConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.price_epsilon, 0.5);
        assert_eq!(config.notify_timeout_ms, DEFAULT_NOTIFY_TIMEOUT_MS);
    }

    fn env_vars(vars: &[(&str, &str)]) -> Environment {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        environment().source(Some(map))
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("poll_interval_ms = 250\nprice_epsilon = 0.5\nnotify_timeout_ms = 900\n");
        let env = env_vars(&[
            ("ORDER_MONITOR_POLL_INTERVAL_MS", "750"),
            ("ORDER_MONITOR_PRICE_EPSILON", "0.05"),
            ("OTHER_APP_POLL_INTERVAL_MS", "1"),
        ]);
        let config = MonitorConfig::load_with_env(Some(file.path()), env).unwrap();

        assert_eq!(config.poll_interval_ms, 750);
        assert_eq!(config.price_epsilon, 0.05);
        assert_eq!(config.notify_timeout_ms, 900);
        assert_eq!(config.store_buffer, DEFAULT_STORE_BUFFER);
    }

    #[test]
    fn test_env_without_file() {
        let env = env_vars(&[("ORDER_MONITOR_NOTICE_BUFFER", "8")]);
        let config = MonitorConfig::load_with_env(None, env).unwrap();
        assert_eq!(config.notice_buffer, 8);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);

        let env = env_vars(&[("ORDER_MONITOR_STORE_BUFFER", "0")]);
        assert!(matches!(
            MonitorConfig::load_with_env(None, env),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = MonitorConfig::load(Some(Path::new("/nonexistent/order-monitor.toml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let file = write_config("poll_interval_ms = 0\n");
        assert!(matches!(
            MonitorConfig::load(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));

        let config = MonitorConfig {
            price_epsilon: -0.1,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MonitorConfig {
            price_epsilon: f64::NAN,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
