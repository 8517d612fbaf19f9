//! Configuration for the logfmt exporters.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use logfmt_common::Temporality;

use crate::logs::EventNameKey;
use crate::pipeline::ExporterSet;
use crate::sink::{Destination, SinkRegistry};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete exporter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Log record output.
    #[serde(default)]
    pub logs: LogsConfig,

    /// Span output.
    #[serde(default)]
    pub traces: TracesConfig,

    /// Metric point output.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Diagnostics of the exporter itself.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log exporter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default)]
    pub destination: Destination,

    /// Field name for event names: "event_name" or "event_id".
    #[serde(default)]
    pub event_name_key: EventNameKey,
}

/// Span exporter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracesConfig {
    #[serde(default)]
    pub destination: Destination,
}

/// Metric exporter settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub destination: Destination,

    /// Aggregation temporality: "cumulative" or "delta".
    #[serde(default)]
    pub temporality: Temporality,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text", "json" or "logfmt".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
    /// Diagnostics rendered as logfmt through the log exporter.
    Logfmt,
}

impl ExporterConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a JSON5 string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ExporterConfig = json5::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let destinations = [
            ("logs", &self.logs.destination),
            ("traces", &self.traces.destination),
            ("metrics", &self.metrics.destination),
        ];
        for (signal, destination) in destinations {
            if let Destination::File(path) = destination
                && path.as_os_str().is_empty()
            {
                return Err(ConfigError::Validation(format!(
                    "{signal}.destination file path cannot be empty"
                )));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the three exporters.
    ///
    /// Signals configured with the same destination share one sink.
    pub fn build(&self) -> Result<ExporterSet, ConfigError> {
        self.build_with(&SinkRegistry::new())
    }

    /// Build the three exporters, taking sinks from `registry`.
    pub fn build_with(&self, registry: &SinkRegistry) -> Result<ExporterSet, ConfigError> {
        Ok(ExporterSet::new(
            registry.sink(&self.logs.destination)?,
            registry.sink(&self.traces.destination)?,
            registry.sink(&self.metrics.destination)?,
        )
        .with_event_name_key(self.logs.event_name_key)
        .with_temporality(self.metrics.temporality))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_minimal_config() {
        let config = ExporterConfig::parse("{}").unwrap();

        assert_eq!(config.logs.destination, Destination::Stdout);
        assert_eq!(config.logs.event_name_key, EventNameKey::EventName);
        assert_eq!(config.traces.destination, Destination::Stdout);
        assert_eq!(config.metrics.temporality, Temporality::Cumulative);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            logs: {
                destination: "stderr",
                event_name_key: "event_id",
            },
            traces: { destination: "stdout" },
            metrics: {
                destination: { file: "/var/log/metrics.logfmt" },
                temporality: "delta",
            },
            logging: {
                level: "debug",
                format: "logfmt",
            },
        }"#;

        let config = ExporterConfig::parse(json).unwrap();

        assert_eq!(config.logs.destination, Destination::Stderr);
        assert_eq!(config.logs.event_name_key, EventNameKey::EventId);
        assert_eq!(
            config.metrics.destination,
            Destination::File(PathBuf::from("/var/log/metrics.logfmt"))
        );
        assert_eq!(config.metrics.temporality, Temporality::Delta);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Logfmt);
    }

    #[test]
    fn test_validate_empty_file_path() {
        let json = r#"{
            traces: { destination: { file: "" } }
        }"#;

        let result = ExporterConfig::parse(json);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("traces.destination")
        );
    }

    #[test]
    fn test_validate_empty_level() {
        let json = r#"{ logging: { level: " " } }"#;
        assert!(ExporterConfig::parse(json).is_err());
    }

    #[test]
    fn test_unknown_temporality_rejected() {
        let json = r#"{ metrics: { temporality: "sometimes" } }"#;
        assert!(matches!(
            ExporterConfig::parse(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logfmt.json5");
        std::fs::write(&path, "{ logging: { format: \"json\" } }").unwrap();

        let config = ExporterConfig::load_from_file(&path).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);

        let missing = ExporterConfig::load_from_file(dir.path().join("missing.json5"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_build_shares_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.logfmt");
        let json = format!(
            r#"{{
                logs: {{ destination: {{ file: "{0}" }} }},
                traces: {{ destination: {{ file: "{0}" }} }},
                metrics: {{ destination: "stderr" }},
            }}"#,
            path.display()
        );
        let config = ExporterConfig::parse(&json).unwrap();

        let registry = SinkRegistry::new();
        let _set = config.build_with(&registry).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(path.exists());
    }
}
