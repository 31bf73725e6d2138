//! Structured logging infrastructure for covidash

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "covidash_graphs=trace")
    pub level: String,
    /// Whether to emit one JSON object per event
    pub json_format: bool,
    /// Whether to enable pretty multi-line formatting
    pub pretty_format: bool,
    /// Optional file path for log output
    pub file_path: Option<String>,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            pretty_format: false,
            file_path: None,
            include_targets: true,
        }
    }
}

impl LoggingConfig {
    /// Builds the filter, falling back to `info` on an unparsable directive
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// Console output goes to stderr so stdout stays free for notebook
/// display blocks.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = tracing_subscriber::registry().with(config.env_filter());

    if let Some(file_path) = &config.file_path {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let layer = fmt::layer()
            .with_ansi(false)
            .with_target(config.include_targets)
            .with_writer(std::sync::Mutex::new(file));

        if config.json_format {
            registry.with(layer.json()).try_init()?;
        } else {
            registry.with(layer).try_init()?;
        }
    } else if config.json_format {
        let layer = fmt::layer()
            .json()
            .with_target(config.include_targets)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else if config.pretty_format {
        let layer = fmt::layer()
            .pretty()
            .with_target(config.include_targets)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    } else {
        let layer = fmt::layer()
            .compact()
            .with_target(config.include_targets)
            .with_writer(std::io::stderr);
        registry.with(layer).try_init()?;
    }

    tracing::debug!(
        level = %config.level,
        file = ?config.file_path,
        json = config.json_format,
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.json_format);
        assert!(!config.pretty_format);
        assert!(config.file_path.is_none());
        assert!(config.include_targets);
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = LoggingConfig {
            level: "covidash=loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(EnvFilter::try_new(&config.level).is_err());
        // Falls back instead of panicking
        let _filter = config.env_filter();
    }
}
