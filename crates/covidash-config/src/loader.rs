//! Configuration loading from TOML or YAML files.

use crate::schema::Config;
use covidash_common::{DashError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml` files.
    Toml,
    /// `.yaml` / `.yml` and anything else.
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Configuration loader.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader for a file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this loader reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and validates the configuration file.
    pub fn load(&self) -> Result<Config> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            DashError::config_with_source(
                format!("Failed to read configuration file {}", self.path.display()),
                e,
            )
        })?;

        let format = ConfigFormat::from_path(&self.path);
        debug!(path = %self.path.display(), ?format, "parsing configuration");
        let config = Self::parse(&content, format)?;
        config.validate()?;

        info!(path = %self.path.display(), "configuration loaded");
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load_from_file(path: impl Into<PathBuf>) -> Result<Config> {
        Self::new(path).load()
    }

    /// Parses configuration text; missing sections and fields take defaults.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Config> {
        match format {
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
            ConfigFormat::Yaml if content.trim().is_empty() => Ok(Config::default()),
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }

    /// Loads a configuration file, or returns validated defaults without one.
    pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let config = Config::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Serializes a configuration as TOML, e.g. to seed a config file.
    pub fn to_toml(config: &Config) -> Result<String> {
        toml::to_string_pretty(config)
            .map_err(|e| DashError::config_with_source("Failed to serialize configuration", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covidash_common::Method;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.TOML")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = ConfigLoader::parse(
            "[output]\ntitle = \"Weekly report\"\n\n[dashboard]\nmethod = \"difference\"\n",
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.output.title, "Weekly report");
        assert_eq!(config.dashboard.method, Method::Difference);
        assert_eq!(config.source, Config::default().source);
        assert_eq!(config.styling.width, 800);
    }

    #[test]
    fn test_partial_yaml_takes_defaults() {
        let config = ConfigLoader::parse(
            "dashboard:\n  state: Washington\n  rolling_window: 7\n",
            ConfigFormat::Yaml,
        )
        .unwrap();

        assert_eq!(config.dashboard.state.as_deref(), Some("Washington"));
        assert_eq!(config.dashboard.rolling_window, 7);
        assert_eq!(config.output, Config::default().output);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ConfigLoader::parse("", ConfigFormat::Yaml).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = ConfigLoader::parse("[output\ntitle = 1", ConfigFormat::Toml).unwrap_err();
        assert_eq!(err.stage(), "config");
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let text = ConfigLoader::to_toml(&Config::default()).unwrap();
        let parsed = ConfigLoader::parse(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
