//! Default values for every configuration section.

use crate::schema::*;
use covidash_common::Method;
use std::path::PathBuf;

/// New York Times county-level dataset.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/nytimes/covid-19-data/master/us-counties.csv";

/// Default output document.
pub const DEFAULT_OUTPUT_PATH: &str = "covid_static.html";

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            output: OutputConfig::default(),
            dashboard: DashboardConfig::default(),
            styling: StylingConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            timeout_seconds: 60,
            user_agent: concat!("covidash/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            title: "COVID-19 Dashboard".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            state: None,
            county: None,
            method: Method::Cumulative,
            rolling_window: 1,
            columns: 2,
            stacked: false,
            tabs: false,
            title_prefix: "NYT COVID-19 data".to_string(),
        }
    }
}

impl Default for StylingConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            enable_grid: true,
            font_family: "sans-serif".to_string(),
            title_font_size: 20,
            colors: ColorsConfig::default(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            cases: "#1f77b4".to_string(),
            deaths: "#2ca02c".to_string(),
            reference: "#d62728".to_string(),
            background: "#ffffff".to_string(),
        }
    }
}
