//! Error types and utilities for covidash

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for covidash operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Boxed source error carried by the struct variants
type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for covidash operations
#[derive(Error, Debug)]
pub enum DashError {
    /// The dataset could not be retrieved (network, HTTP status, payload)
    #[error("Retrieval error for {url}: {message}")]
    Retrieval {
        /// What went wrong
        message: String,
        /// Source location that was requested
        url: String,
        /// Underlying network or I/O error
        #[source]
        source: Option<BoxedSource>,
    },

    /// The CSV payload or one of its fields could not be parsed
    #[error("Parse error{}: {message}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Parse {
        /// What could not be parsed
        message: String,
        /// CSV line of the offending record, when known
        line: Option<u64>,
        /// Underlying CSV or field parse error
        #[source]
        source: Option<BoxedSource>,
    },

    /// An expected column is absent from a table
    #[error("Schema error: column '{column}' missing from table '{table}'")]
    Schema {
        /// Name of the missing column
        column: String,
        /// Table the column was looked up in
        table: String,
    },

    /// The output document could not be written
    #[error("Write error for {}: {source}", path.display())]
    Write {
        /// Destination that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
        /// Underlying read or deserialization error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Chart drawing errors
    #[error("Graph error: {message}")]
    Graph {
        /// What could not be drawn
        message: String,
        /// Underlying drawing error
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    /// Create a new retrieval error
    pub fn retrieval(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Retrieval {
            message: msg.into(),
            url: url.into(),
            source: None,
        }
    }

    /// Create a new retrieval error with source
    pub fn retrieval_with_source(
        url: impl Into<String>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Retrieval {
            message: msg.into(),
            url: url.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new parse error with source
    pub fn parse_with_source(
        line: Option<u64>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Parse {
            message: msg.into(),
            line,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new schema error for a missing column
    pub fn schema(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
            table: table.into(),
        }
    }

    /// Create a new write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Pipeline stage the error belongs to, as shown to CLI users
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Retrieval { .. } => "retrieval",
            Self::Parse { .. } => "parse",
            Self::Schema { .. } => "schema",
            Self::Write { .. } => "write",
            Self::Config { .. } => "config",
            Self::Graph { .. } => "render",
            Self::Io(_) => "io",
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Retrieval { .. } => 2,
            Self::Parse { .. } => 3,
            Self::Schema { .. } => 4,
            Self::Write { .. } => 5,
            Self::Config { .. } => 6,
            Self::Graph { .. } | Self::Io(_) => 1,
        }
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to DashError
impl From<reqwest::Error> for DashError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(ToString::to_string)
            .unwrap_or_else(|| "<unknown>".to_string());
        if err.is_timeout() {
            Self::retrieval_with_source(url, "Request timeout", err)
        } else if err.is_connect() {
            Self::retrieval_with_source(url, "Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16()).unwrap_or(0);
            Self::retrieval_with_source(url, format!("HTTP error: {status_code}"), err)
        } else {
            Self::retrieval_with_source(url, "Network request failed", err)
        }
    }
}

/// Convert from csv::Error to DashError
impl From<csv::Error> for DashError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        Self::parse_with_source(line, "Malformed CSV", err)
    }
}

/// Convert from std::fmt::Error to DashError
impl From<std::fmt::Error> for DashError {
    fn from(err: std::fmt::Error) -> Self {
        Self::graph_with_source("Failed to format document", err)
    }
}

/// Convert from toml::de::Error to DashError
impl From<toml::de::Error> for DashError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

/// Convert from serde_yaml::Error to DashError
impl From<serde_yaml::Error> for DashError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::config_with_source("YAML parsing error", err)
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to DashError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for DashError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
