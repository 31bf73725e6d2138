//! Configuration schema definitions using serde.

use covidash_common::{Method, Scope};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for covidash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset source configuration.
    pub source: SourceConfig,
    /// Output document configuration.
    pub output: OutputConfig,
    /// Dashboard content configuration.
    pub dashboard: DashboardConfig,
    /// Chart styling configuration.
    pub styling: StylingConfig,
}

/// Dataset source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// CSV location: `http(s)://` or `file://`.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// User agent sent with the request.
    pub user_agent: String,
}

/// Output document configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination of the HTML document.
    pub path: PathBuf,
    /// Document title.
    pub title: String,
}

/// Dashboard content configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Restrict totals to one state.
    pub state: Option<String>,
    /// Restrict totals to one county of `state`.
    pub county: Option<String>,
    /// Cumulative totals or daily differences.
    pub method: Method,
    /// Trailing rolling average window in days, 1 disables it.
    pub rolling_window: u32,
    /// Number of grid columns.
    pub columns: usize,
    /// Stack charts vertically instead of using a grid.
    pub stacked: bool,
    /// Show one chart at a time behind a tab strip.
    pub tabs: bool,
    /// Prefix of every chart title.
    pub title_prefix: String,
}

/// Chart styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylingConfig {
    /// Chart width in pixels.
    pub width: u32,
    /// Chart height in pixels.
    pub height: u32,
    /// Whether to draw grid lines.
    pub enable_grid: bool,
    /// Font family for titles and labels.
    pub font_family: String,
    /// Title font size.
    pub title_font_size: u32,
    /// Color configuration.
    pub colors: ColorsConfig,
}

/// Color configuration, hex encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Cases series color.
    pub cases: String,
    /// Deaths series color.
    pub deaths: String,
    /// Cobweb identity diagonal color.
    pub reference: String,
    /// Chart background color.
    pub background: String,
}

impl DashboardConfig {
    /// Scope selected by the state and county settings.
    pub fn scope(&self) -> Scope {
        Scope::from_names(self.state.as_deref(), self.county.as_deref())
    }
}
