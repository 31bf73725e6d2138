//! Command line arguments and how they override the configuration.

use clap::Parser;
use covidash_common::{LoggingConfig, Method};
use covidash_config::{Config, ConfigLoader};
use std::path::PathBuf;

/// Render a static COVID-19 dashboard from the NYT county dataset.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Output HTML file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Document title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Dataset URL (http, https or file)
    #[arg(long)]
    pub url: Option<String>,

    /// Configuration file path (TOML or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Restrict totals to one state
    #[arg(long)]
    pub state: Option<String>,

    /// Restrict totals to one county of --state
    #[arg(long, requires = "state")]
    pub county: Option<String>,

    /// Cumulative totals or daily differences
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Trailing rolling average window in days
    #[arg(long, value_name = "DAYS")]
    pub rolling: Option<u32>,

    /// Number of grid columns
    #[arg(long)]
    pub columns: Option<usize>,

    /// Stack charts vertically
    #[arg(long)]
    pub stacked: bool,

    /// Show one chart at a time behind tabs
    #[arg(long, conflicts_with = "stacked")]
    pub tabs: bool,

    /// Log filter, e.g. `info` or `covidash_graphs=debug`
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// `--method` values.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    /// Running totals.
    Cumulative,
    /// New counts per day.
    Difference,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Cumulative => Self::Cumulative,
            MethodArg::Difference => Self::Difference,
        }
    }
}

impl Args {
    /// Loads the config file (or defaults), applies the flags and validates.
    pub fn resolve_config(&self) -> covidash_common::Result<Config> {
        let mut config = ConfigLoader::load_or_default(self.config.as_deref())?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overrides configuration values with the flags that were given.
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output.path.clone_from(output);
        }
        if let Some(title) = &self.title {
            config.output.title.clone_from(title);
        }
        if let Some(url) = &self.url {
            config.source.url.clone_from(url);
        }
        if self.state.is_some() {
            config.dashboard.state.clone_from(&self.state);
            config.dashboard.county.clone_from(&self.county);
        }
        if let Some(method) = self.method {
            config.dashboard.method = method.into();
        }
        if let Some(rolling) = self.rolling {
            config.dashboard.rolling_window = rolling;
        }
        if let Some(columns) = self.columns {
            config.dashboard.columns = columns;
        }
        if self.stacked {
            config.dashboard.stacked = true;
            config.dashboard.tabs = false;
        }
        if self.tabs {
            config.dashboard.tabs = true;
            config.dashboard.stacked = false;
        }
    }

    /// Logging settings selected by the flags.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            file_path: self
                .log_file
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            ..LoggingConfig::default()
        }
    }
}
