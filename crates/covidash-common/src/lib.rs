//! # covidash common
//!
//! Shared types, utilities, and common functionality for covidash.
//!
//! This crate provides the domain records, the error taxonomy and the
//! logging setup used across all other crates in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod table;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{DashError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use table::{Column, DataTable};
pub use types::*;
pub use utils::*;
