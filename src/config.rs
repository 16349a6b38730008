//! Seed configuration loaded from YAML and resolved against flags and environment.
//!
//! Table name and event tag are resolved with precedence
//! CLI flag > environment variable > config file > default.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::formatter::{FormatOptions, DEFAULT_EVENT_VERSION};

/// Target table when nothing else names one.
pub const DEFAULT_TABLE: &str = "events";

/// Environment variable overriding the target table
pub const TABLE_ENV: &str = "EVENT_SEED_TABLE";

/// Environment variable overriding the trailing event tag
pub const EVENT_VERSION_ENV: &str = "EVENT_SEED_VERSION";

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    InvalidTable(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Yaml(e) => write!(f, "Failed to parse YAML: {}", e),
            ConfigError::InvalidTable(name) => write!(
                f,
                "Invalid table name '{}': expected an identifier or schema.identifier",
                name
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Contents of a seed config file.
///
/// ```yaml
/// table: events
/// event_version: world_2025
/// rows_per_statement: 0
/// strict_dates: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedConfig {
    pub table: String,
    pub event_version: String,
    /// Rows per `INSERT` statement; 0 puts every row in one statement
    pub rows_per_statement: usize,
    pub strict_dates: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            event_version: DEFAULT_EVENT_VERSION.to_string(),
            rows_per_statement: 0,
            strict_dates: false,
        }
    }
}

impl SeedConfig {
    /// Load a config file. Missing keys take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, not as an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}

/// Values given on the command line; `None` defers to lower layers.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub table: Option<String>,
    pub event_version: Option<String>,
    pub rows_per_statement: Option<usize>,
    pub strict_dates: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSettings {
    pub table: String,
    pub rows_per_statement: usize,
    pub format: FormatOptions,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            rows_per_statement: 0,
            format: FormatOptions::default(),
        }
    }
}

impl SeedSettings {
    /// Resolve against the process environment.
    pub fn resolve(file: Option<SeedConfig>, overrides: Overrides) -> Result<Self, ConfigError> {
        Self::resolve_with(file, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve using `env` to look up environment variables.
    pub fn resolve_with<F>(
        file: Option<SeedConfig>,
        overrides: Overrides,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = file.unwrap_or_default();
        let env_value = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let table = overrides
            .table
            .or_else(|| env_value(TABLE_ENV))
            .unwrap_or(file.table);
        let table = table.trim().to_string();
        if !is_valid_table_name(&table) {
            return Err(ConfigError::InvalidTable(table));
        }

        let event_version = overrides
            .event_version
            .or_else(|| env_value(EVENT_VERSION_ENV))
            .unwrap_or(file.event_version);

        tracing::debug!(table = %table, event_version = %event_version, "resolved seed settings");

        Ok(Self {
            table,
            rows_per_statement: overrides.rows_per_statement.unwrap_or(file.rows_per_statement),
            format: FormatOptions {
                event_version,
                strict_dates: overrides.strict_dates || file.strict_dates,
            },
        })
    }
}

static TABLE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Plain identifier, optionally qualified by one schema name.
pub fn is_valid_table_name(name: &str) -> bool {
    TABLE_PATTERN
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
                .expect("valid table regex")
        })
        .is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = SeedSettings::resolve_with(None, Overrides::default(), env_of(&[])).unwrap();
        assert_eq!(settings, SeedSettings::default());
        assert_eq!(settings.table, "events");
        assert_eq!(settings.format.event_version, "world_2025");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = SeedConfig::from_yaml("table: venue_events\n").unwrap();
        assert_eq!(config.table, "venue_events");
        assert_eq!(config.event_version, "world_2025");
        assert_eq!(config.rows_per_statement, 0);
        assert!(!config.strict_dates);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(SeedConfig::from_yaml("  \n").unwrap(), SeedConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = SeedConfig::from_yaml("tabel: events\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_precedence_flag_over_env_over_file() {
        let file = SeedConfig {
            table: "from_file".to_string(),
            event_version: "file_tag".to_string(),
            rows_per_statement: 10,
            strict_dates: true,
        };
        let env = env_of(&[(TABLE_ENV, "from_env"), (EVENT_VERSION_ENV, "env_tag")]);

        let settings = SeedSettings::resolve_with(Some(file.clone()), Overrides::default(), &env).unwrap();
        assert_eq!(settings.table, "from_env");
        assert_eq!(settings.format.event_version, "env_tag");
        assert_eq!(settings.rows_per_statement, 10);
        assert!(settings.format.strict_dates);

        let overrides = Overrides {
            table: Some("from_flag".to_string()),
            event_version: Some("flag_tag".to_string()),
            rows_per_statement: Some(2),
            strict_dates: false,
        };
        let settings = SeedSettings::resolve_with(Some(file.clone()), overrides, &env).unwrap();
        assert_eq!(settings.table, "from_flag");
        assert_eq!(settings.format.event_version, "flag_tag");
        assert_eq!(settings.rows_per_statement, 2);

        let settings = SeedSettings::resolve_with(Some(file), Overrides::default(), env_of(&[])).unwrap();
        assert_eq!(settings.table, "from_file");
        assert_eq!(settings.format.event_version, "file_tag");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let settings = SeedSettings::resolve_with(
            None,
            Overrides::default(),
            env_of(&[(TABLE_ENV, "  ")]),
        )
        .unwrap();
        assert_eq!(settings.table, "events");
    }

    #[test]
    fn test_invalid_table_rejected() {
        let overrides = Overrides {
            table: Some("events; DROP TABLE users".to_string()),
            ..Overrides::default()
        };
        let err = SeedSettings::resolve_with(None, overrides, env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTable(_)));
    }

    #[test]
    fn test_table_name_validation() {
        assert!(is_valid_table_name("events"));
        assert!(is_valid_table_name("public.events"));
        assert!(is_valid_table_name("_events_2025"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2025_events"));
        assert!(!is_valid_table_name("a.b.c"));
        assert!(!is_valid_table_name("events (id)"));
    }
}
