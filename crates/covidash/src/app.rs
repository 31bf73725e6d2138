//! The batch pipeline: fetch, aggregate, assemble, render.

use crate::error::AppResult;
use covidash_config::Config;
use covidash_graphs::{
    AggregationConfig, Aggregator, Assembler, AssemblyOptions, DataFetcher, HtmlRenderer, Renderer,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument};

/// One dashboard run over a validated configuration.
pub struct Dashboard {
    config: Config,
}

impl Dashboard {
    /// Creates a run for the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration of this run.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs every stage and returns the path of the written document.
    ///
    /// Nothing is written unless every earlier stage succeeded.
    #[instrument(skip_all, fields(url = %self.config.source.url))]
    pub async fn run(&self) -> AppResult<PathBuf> {
        let started = Instant::now();
        let config = &self.config;

        let fetcher = DataFetcher::new(&config.source)?;
        let raw = fetcher.fetch_records().await?;

        let aggregation = AggregationConfig::from(&config.dashboard);
        info!(scope = %aggregation.scope, method = %aggregation.method, "aggregating");
        let daily = Aggregator::with_config(aggregation).aggregate(&raw)?;

        let layout = Assembler::new(AssemblyOptions::from(config))
            .assemble(&raw.to_table(), &daily.to_table())?;
        info!(plots = layout.plots.len(), dates = daily.len(), "layout ready");

        let renderer = HtmlRenderer::new(&config.output.path, &config.output.title);
        let path = renderer.render(&layout).await?;

        info!(
            path = %path.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dashboard complete"
        );
        Ok(path)
    }
}
