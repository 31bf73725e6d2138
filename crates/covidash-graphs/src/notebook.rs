//! Inline dashboards for evcxr notebooks.
//!
//! ```ignore
//! :dep covidash-graphs = { path = "crates/covidash-graphs" }
//! let config = covidash_config::Config::default();
//! let (raw, daily) = covidash_graphs::notebook::load_and_aggregate(&config).await?;
//! covidash_graphs::notebook::dashboard(&raw, &daily)?.evcxr_display();
//! ```

use crate::aggregator::{AggregationConfig, Aggregator};
use crate::assembler::{Assembler, AssemblyOptions};
use crate::data_fetcher::DataFetcher;
use crate::renderer::render_fragment;
use crate::traits::Renderer;
use crate::types::Layout;
use async_trait::async_trait;
use covidash_common::{escape_html, DailyTable, RawTable, Result};
use covidash_config::Config;
use tracing::{error, instrument};

const EVCXR_BEGIN: &str = "EVCXR_BEGIN_CONTENT text/html";
const EVCXR_END: &str = "EVCXR_END_CONTENT";

/// Builds the dashboard layout from prepared tables.
///
/// Chart titles and labels follow the scope and method `daily` was built
/// with; styling uses the configuration defaults.
pub fn dashboard(raw: &RawTable, daily: &DailyTable) -> Result<Layout> {
    let options = AssemblyOptions {
        scope: daily.scope().clone(),
        method: daily.method(),
        ..AssemblyOptions::default()
    };
    Assembler::new(options).assemble(&raw.to_table(), &daily.to_table())
}

/// Fetches the dataset and aggregates it as configured.
#[instrument(skip_all, fields(url = %config.source.url))]
pub async fn load_and_aggregate(config: &Config) -> Result<(RawTable, DailyTable)> {
    config.validate()?;
    let raw = DataFetcher::new(&config.source)?.fetch_records().await?;
    let daily = Aggregator::with_config(AggregationConfig::from(&config.dashboard)).aggregate(&raw)?;
    Ok((raw, daily))
}

/// Wraps HTML in evcxr's display block.
pub fn evcxr_block(html: &str) -> String {
    format!("{EVCXR_BEGIN}\n{}\n{EVCXR_END}\n", html.trim_end())
}

/// Produces the evcxr display block of a layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotebookRenderer;

impl NotebookRenderer {
    /// Renders without an async runtime.
    pub fn render_blocking(&self, layout: &Layout) -> Result<String> {
        render_fragment(layout).map(|html| evcxr_block(&html))
    }
}

#[async_trait]
impl Renderer for NotebookRenderer {
    type Output = String;

    async fn render(&self, layout: &Layout) -> Result<String> {
        self.render_blocking(layout)
    }

    fn name(&self) -> &'static str {
        "notebook"
    }
}

impl Layout {
    /// Prints the layout so evcxr shows it inline.
    pub fn evcxr_display(&self) {
        match NotebookRenderer.render_blocking(self) {
            Ok(block) => print!("{block}"),
            Err(e) => {
                error!(error = %e, "failed to render dashboard");
                let message = format!("<pre>{}</pre>", escape_html(&e.to_string()));
                print!("{}", evcxr_block(&message));
            }
        }
    }
}
