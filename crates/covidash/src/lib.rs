//! # covidash
//!
//! Command line dashboard for the NYT county-level COVID-19 dataset.
//!
//! One run fetches the CSV, aggregates daily totals for the selected scope,
//! and writes a static HTML page with time series and cobweb charts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
