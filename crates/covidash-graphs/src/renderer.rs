//! Self-contained HTML output.

use crate::svg::render_plot;
use crate::traits::Renderer;
use crate::types::{Arrangement, AxisScale, ChartKind, Layout, PlotSpec};
use async_trait::async_trait;
use covidash_common::{escape_html, DashError, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Inline stylesheet of the document.
const STYLESHEET: &str = "\
body { margin: 0; padding: 24px; font-family: sans-serif; color: #222; background: #fafafa; }
header h1 { margin: 0 0 4px 0; font-size: 24px; }
header p { margin: 0 0 16px 0; color: #555; }
.plots { display: grid; gap: 16px; }
figure { margin: 0; padding: 8px; background: #fff; border: 1px solid #ddd; overflow-x: auto; }
figure svg { display: block; max-width: 100%; height: auto; }
";

/// Tab strip rules; the checked radio input selects the visible figure.
const TAB_STYLESHEET: &str = "\
.plots.tabs { display: block; }
.tabs > input { position: absolute; opacity: 0; pointer-events: none; }
.tabs > label { display: inline-block; padding: 6px 14px; margin: 0 4px 0 0; border: 1px solid #ddd; border-bottom: none; background: #eee; cursor: pointer; }
.tabs > figure { display: none; }
";

/// Name shared by the radio inputs of one tab strip.
const TAB_GROUP: &str = "covidash-tabs";

/// Renders the plots of a layout as inline SVG inside one HTML fragment.
///
/// The fragment holds the heading and the plots but no `<html>` shell. A
/// tabbed layout carries its own `<style>` so it also works inline in a
/// notebook.
pub fn render_fragment(layout: &Layout) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "<header>")?;
    writeln!(out, "<h1>{}</h1>", escape_html(&layout.title))?;
    if let Some(subtitle) = &layout.subtitle {
        writeln!(out, "<p>{}</p>", escape_html(subtitle))?;
    }
    writeln!(out, "</header>")?;

    match layout.arrangement {
        Arrangement::Tabs => write_tabs(&mut out, &layout.plots)?,
        arrangement => write_grid(&mut out, arrangement, &layout.plots)?,
    }

    Ok(out)
}

fn write_grid(out: &mut String, arrangement: Arrangement, plots: &[PlotSpec]) -> Result<()> {
    let class = match arrangement {
        Arrangement::Stack => "stack",
        _ => "grid",
    };
    writeln!(
        out,
        "<div class=\"plots {class}\" style=\"grid-template-columns: repeat({}, minmax(0, 1fr));\">",
        arrangement.columns()
    )?;
    for plot in plots {
        write_figure(out, plot)?;
    }
    writeln!(out, "</div>")?;
    Ok(())
}

fn write_tabs(out: &mut String, plots: &[PlotSpec]) -> Result<()> {
    writeln!(out, "<style>\n{TAB_STYLESHEET}")?;
    for plot in plots {
        let id = escape_html(&plot.id);
        writeln!(out, "#tab-{id}:checked ~ #{id} {{ display: block; }}")?;
        writeln!(
            out,
            "#tab-{id}:checked ~ label[for=\"tab-{id}\"] {{ background: #fff; font-weight: bold; }}"
        )?;
    }
    writeln!(out, "</style>")?;

    writeln!(out, "<div class=\"plots tabs\">")?;
    for (i, plot) in plots.iter().enumerate() {
        let checked = if i == 0 { " checked" } else { "" };
        writeln!(
            out,
            "<input type=\"radio\" name=\"{TAB_GROUP}\" id=\"tab-{}\"{checked}>",
            escape_html(&plot.id)
        )?;
    }
    for plot in plots {
        writeln!(
            out,
            "<label for=\"tab-{}\">{}</label>",
            escape_html(&plot.id),
            escape_html(&tab_label(plot))
        )?;
    }
    for plot in plots {
        write_figure(out, plot)?;
    }
    writeln!(out, "</div>")?;
    Ok(())
}

fn write_figure(out: &mut String, plot: &PlotSpec) -> Result<()> {
    let svg = render_plot(plot)?;
    writeln!(
        out,
        "<figure id=\"{}\" aria-label=\"{}\">\n{}\n</figure>",
        escape_html(&plot.id),
        escape_html(&plot.title),
        svg.trim_end()
    )?;
    Ok(())
}

/// Short tab caption, e.g. `Linear` or `Cobweb deaths`.
fn tab_label(plot: &PlotSpec) -> String {
    match (plot.kind, plot.y_axis.scale) {
        (ChartKind::TimeSeries, AxisScale::Linear) => "Linear".to_string(),
        (ChartKind::TimeSeries, AxisScale::Log) => "Log".to_string(),
        (ChartKind::Cobweb, _) => format!("Cobweb {}", plot.y_axis.column),
    }
}

/// Renders a complete HTML5 document with no external resources.
pub fn render_document(layout: &Layout, title: &str) -> Result<String> {
    let body = render_fragment(layout)?;

    let mut out = String::with_capacity(body.len() + STYLESHEET.len() + 256);
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(
        out,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    )?;
    writeln!(out, "<title>{}</title>", escape_html(title))?;
    writeln!(out, "<style>\n{STYLESHEET}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    out.push_str(&body);
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;

    Ok(out)
}

/// Writes the dashboard as a static HTML file.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    output_path: PathBuf,
    title: String,
}

impl HtmlRenderer {
    /// Creates a renderer writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            title: title.into(),
        }
    }

    /// Destination of the document.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

#[async_trait]
impl Renderer for HtmlRenderer {
    type Output = PathBuf;

    #[instrument(skip_all, fields(path = %self.output_path.display()))]
    async fn render(&self, layout: &Layout) -> Result<PathBuf> {
        let document = render_document(layout, &self.title)?;

        tokio::fs::write(&self.output_path, document.as_bytes())
            .await
            .map_err(|e| DashError::write(&self.output_path, e))?;

        info!(bytes = document.len(), plots = layout.plots.len(), "dashboard written");
        Ok(self.output_path.clone())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}
