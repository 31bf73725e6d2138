//! # covidash graphs
//!
//! Loading, daily aggregation and chart assembly for the COVID-19 dashboard.
//!
//! The pipeline is [`DataFetcher`] → [`Aggregator`] → [`Assembler`] →
//! [`Renderer`]. Plots are described declaratively by [`PlotSpec`] and drawn
//! as SVG with plotters.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod assembler;
pub mod cobweb;
pub mod data_fetcher;
pub mod notebook;
pub mod renderer;
pub mod svg;
pub mod time_series;
pub mod traits;
pub mod types;
pub mod utils;

pub use aggregator::*;
pub use assembler::*;
pub use data_fetcher::*;
pub use renderer::*;
pub use traits::*;
pub use types::*;
