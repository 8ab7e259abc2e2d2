//! Declarative destination configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::destination::{Format, FormatOptions};
use crate::error::Result;

/// A set of named destinations, usually read from TOML:
///
/// ```toml
/// [destinations.console]
/// sink = { type = "stderr" }
///
/// [destinations.audit]
/// sink = { type = "file", path = "/var/log/audit.jsonl" }
/// format = "structured"
/// options = { level = "debug", timestamp = "uptime" }
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Destinations keyed by name.
    pub destinations: BTreeMap<String, DestinationConfig>,
}

impl RegistryConfig {
    /// Parse configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// This function will return an error if the document is not valid TOML
    /// or does not describe a registry.
    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}

/// One destination.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DestinationConfig {
    /// Where the bytes go.
    pub sink: SinkConfig,

    /// How records are rendered.
    #[serde(default)]
    pub format: Format,

    /// Formatting options.
    #[serde(default)]
    pub options: FormatOptions,
}

/// Byte sinks that can be described in configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// Standard output.
    Stdout,

    /// Standard error.
    Stderr,

    /// A file, created if missing and appended to.
    File {
        /// Path to the file.
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::Timestamp;
    use crate::error::Error;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_parse_full_config() {
        let config = RegistryConfig::from_toml(
            r#"
            [destinations.console]
            sink = { type = "stderr" }

            [destinations.audit]
            sink = { type = "file", path = "/tmp/audit.jsonl" }
            format = "structured"
            options = { level = "debug", timestamp = { custom = "%H:%M" }, source_location = true }
            "#,
        )
        .unwrap();

        let console = &config.destinations["console"];
        assert_eq!(console.sink, SinkConfig::Stderr);
        assert_eq!(console.format, Format::Text);
        assert_eq!(console.options, FormatOptions::default());

        let audit = &config.destinations["audit"];
        assert_eq!(
            audit.sink,
            SinkConfig::File {
                path: PathBuf::from("/tmp/audit.jsonl")
            }
        );
        assert_eq!(audit.format, Format::Structured);
        assert_eq!(audit.options.level, LevelFilter::DEBUG);
        assert_eq!(audit.options.timestamp, Timestamp::Custom("%H:%M".into()));
        assert!(audit.options.source_location);
        assert!(audit.options.target);
    }

    #[test]
    fn test_json_alias_and_unit_timestamps() {
        let config = RegistryConfig::from_toml(
            r#"
            [destinations.out]
            sink = { type = "stdout" }
            format = "json"
            options = { level = "off", timestamp = "none" }
            "#,
        )
        .unwrap();

        let out = &config.destinations["out"];
        assert_eq!(out.format, Format::Structured);
        assert_eq!(out.options.level, LevelFilter::OFF);
        assert_eq!(out.options.timestamp, Timestamp::None);
    }

    #[test]
    fn test_empty_config() {
        let config = RegistryConfig::from_toml("").unwrap();

        assert!(config.destinations.is_empty());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let result = RegistryConfig::from_toml(
            r#"
            [destinations.out]
            sink = { type = "stdout" }
            options = { level = "loud" }
            "#,
        );

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_sink_is_rejected() {
        let result = RegistryConfig::from_toml(
            r#"
            [destinations.out]
            sink = { type = "syslog" }
            "#,
        );

        assert!(matches!(result, Err(Error::Config(_))));
    }
}
