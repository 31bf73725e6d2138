//! Runtime validation of a loaded configuration.

use crate::schema::Config;
use covidash_common::{DashError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Largest rolling average window, in days.
pub const MAX_ROLLING_WINDOW: u32 = 14;

/// Smallest chart edge, in pixels.
pub const MIN_CHART_EDGE: u32 = 100;

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_source_url(&self.source.url)?;

        if self.source.timeout_seconds == 0 {
            return Err(DashError::config("Source timeout must be at least 1 second"));
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(DashError::config("Output path cannot be empty"));
        }

        if self.output.title.trim().is_empty() {
            return Err(DashError::config("Document title cannot be empty"));
        }

        let dashboard = &self.dashboard;
        if !(1..=MAX_ROLLING_WINDOW).contains(&dashboard.rolling_window) {
            return Err(DashError::config(format!(
                "Rolling window must be between 1 and {MAX_ROLLING_WINDOW} days, got {}",
                dashboard.rolling_window
            )));
        }

        if dashboard.columns == 0 {
            return Err(DashError::config("Grid needs at least one column"));
        }

        if dashboard.tabs && dashboard.stacked {
            return Err(DashError::config("Tabs and stacked layout are mutually exclusive"));
        }

        if dashboard.county.is_some() && dashboard.state.is_none() {
            return Err(DashError::config("A county filter requires a state filter"));
        }

        let styling = &self.styling;
        if styling.width < MIN_CHART_EDGE || styling.height < MIN_CHART_EDGE {
            return Err(DashError::config(format!(
                "Chart size must be at least {MIN_CHART_EDGE}x{MIN_CHART_EDGE} pixels"
            )));
        }

        let colors = [
            ("cases", &styling.colors.cases),
            ("deaths", &styling.colors.deaths),
            ("reference", &styling.colors.reference),
            ("background", &styling.colors.background),
        ];
        for (name, value) in colors {
            if !HEX_COLOR_REGEX.is_match(value) {
                return Err(DashError::config(format!(
                    "Color '{name}' must be a hex color like #1f77b4, got '{value}'"
                )));
            }
        }

        Ok(())
    }
}

/// Checks that the source URL parses and uses a supported scheme.
pub fn validate_source_url(raw: &str) -> Result<url::Url> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| DashError::config_with_source(format!("Invalid source URL '{raw}'"), e))?;

    match parsed.scheme() {
        "http" | "https" | "file" => Ok(parsed),
        other => Err(DashError::config(format!(
            "Unsupported source URL scheme '{other}', expected http, https or file"
        ))),
    }
}
