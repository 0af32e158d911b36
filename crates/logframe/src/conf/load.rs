//! Load — config loading from file and environment variables.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::model::IngestConfig;
use crate::delimiter::MIN_MESSAGE_BYTES;
use crate::parser::FormatRegistry;

pub const DEFAULT_CONFIG_FILE: &str = "/etc/logframe/logframe.toml";

/// Upper bound for `max_message_bytes`.
pub const MAX_MESSAGE_BYTES_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl IngestConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("LOGFRAME_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_string(),
            source,
        })
    }

    /// Apply `LOGFRAME_*` overrides read through `lookup`. Unparseable values
    /// are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup("LOGFRAME_FORMAT") {
            self.format = format;
        }
        if let Some(value) = lookup("LOGFRAME_MAX_MESSAGE_BYTES") {
            override_parsed("LOGFRAME_MAX_MESSAGE_BYTES", &value, &mut self.max_message_bytes);
        }
        if let Some(value) = lookup("LOGFRAME_REFERENCE_ZONE") {
            override_parsed("LOGFRAME_REFERENCE_ZONE", &value, &mut self.reference_zone);
        }
        if let Some(value) = lookup("LOGFRAME_READ_BUFFER_BYTES") {
            override_parsed("LOGFRAME_READ_BUFFER_BYTES", &value, &mut self.read_buffer_bytes);
        }
    }

    /// Check that the format resolves and sizes are sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        FormatRegistry::global()
            .resolve(&self.format)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.max_message_bytes < MIN_MESSAGE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "max_message_bytes must be >= {}",
                MIN_MESSAGE_BYTES
            )));
        }
        if self.max_message_bytes > MAX_MESSAGE_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_message_bytes must be <= {}",
                MAX_MESSAGE_BYTES_LIMIT
            )));
        }
        if self.read_buffer_bytes == 0 {
            return Err(ConfigError::Invalid("read_buffer_bytes must be > 0".to_string()));
        }
        Ok(())
    }
}

fn override_parsed<T: std::str::FromStr>(key: &str, value: &str, target: &mut T) {
    match value.trim().parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => tracing::warn!("Ignoring unparseable {}={:?}", key, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ReferenceZone;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut cfg = IngestConfig::default();
        cfg.apply_overrides(env(&[
            ("LOGFRAME_FORMAT", "syslog-paren"),
            ("LOGFRAME_MAX_MESSAGE_BYTES", "4096"),
            ("LOGFRAME_REFERENCE_ZONE", "Local"),
            ("LOGFRAME_READ_BUFFER_BYTES", " 512 "),
        ]));
        assert_eq!(cfg.format, "syslog-paren");
        assert_eq!(cfg.max_message_bytes, 4096);
        assert_eq!(cfg.reference_zone, ReferenceZone::Local);
        assert_eq!(cfg.read_buffer_bytes, 512);
    }

    #[test]
    fn test_unparseable_override_keeps_value() {
        let mut cfg = IngestConfig::default();
        cfg.apply_overrides(env(&[
            ("LOGFRAME_MAX_MESSAGE_BYTES", "lots"),
            ("LOGFRAME_REFERENCE_ZONE", "mars"),
        ]));
        assert_eq!(cfg, IngestConfig::default());
    }

    #[test]
    fn test_no_overrides_is_identity() {
        let mut cfg = IngestConfig::default();
        cfg.apply_overrides(env(&[]));
        assert_eq!(cfg, IngestConfig::default());
    }

    #[test]
    fn test_validate_default_passes() {
        assert!(IngestConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_format() {
        let cfg = IngestConfig {
            format: "json".to_string(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("json"), "Error should name the format: {}", err);
    }

    #[test]
    fn test_validate_rejects_tiny_buffer() {
        let cfg = IngestConfig {
            max_message_bytes: MIN_MESSAGE_BYTES - 1,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("max_message_bytes"));
    }

    #[test]
    fn test_validate_rejects_huge_buffer() {
        let cfg = IngestConfig {
            max_message_bytes: MAX_MESSAGE_BYTES_LIMIT + 1,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_zero_read_buffer() {
        let cfg = IngestConfig {
            read_buffer_bytes: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("read_buffer_bytes"));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("logframe-test-{}.toml", std::process::id()));
        fs::write(&path, "format = \"plain\"\nmax_message_bytes = 1024\n").unwrap();

        let cfg = IngestConfig::from_file(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(cfg.format, "plain");
        assert_eq!(cfg.max_message_bytes, 1024);
        assert_eq!(cfg.read_buffer_bytes, 8192);
    }

    #[test]
    fn test_from_file_missing() {
        let err = IngestConfig::from_file("/nonexistent/logframe.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_from_file_bad_toml() {
        let path = std::env::temp_dir().join(format!("logframe-bad-{}.toml", std::process::id()));
        fs::write(&path, "format = [").unwrap();

        let err = IngestConfig::from_file(path.to_str().unwrap()).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Toml { .. }));
    }
}
