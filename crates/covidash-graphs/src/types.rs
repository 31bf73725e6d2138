//! Declarative chart and layout descriptions.

use covidash_common::{DashError, DataTable, Result};
use covidash_config::StylingConfig;
use std::sync::Arc;

/// Kind of chart a [`PlotSpec`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Values over report dates.
    TimeSeries,
    /// Tomorrow's value against today's value.
    Cobweb,
}

/// Axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    /// Linear scale.
    #[default]
    Linear,
    /// Base-10 logarithmic scale; non-positive values are not drawn.
    Log,
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStyle {
    /// Connected line.
    Line,
    /// Horizontal then vertical segments between points.
    Step,
    /// Markers only.
    Points,
    /// Line with markers.
    LinePoints,
}

/// One chart axis bound to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    /// Column plotted along the axis.
    pub column: String,
    /// Axis label.
    pub label: String,
    /// Axis scale.
    pub scale: AxisScale,
}

impl Axis {
    /// Linear axis over a column.
    pub fn linear(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            label: label.into(),
            scale: AxisScale::Linear,
        }
    }

    /// Same axis with another scale.
    #[must_use]
    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.scale = scale;
        self
    }
}

/// One drawn series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSpec {
    /// Legend entry.
    pub name: String,
    /// Column of the x values.
    pub x: String,
    /// Column of the y values.
    pub y: String,
    /// Mark style.
    pub mark: MarkStyle,
    /// Hex color like `#1f77b4`.
    pub color: String,
}

/// Visual settings shared by every chart of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background hex color.
    pub background: String,
    /// Whether grid lines are drawn.
    pub grid: bool,
    /// Font family of titles and labels.
    pub font_family: String,
    /// Title font size.
    pub title_font_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&StylingConfig::default())
    }
}

impl From<&StylingConfig> for ChartStyle {
    fn from(styling: &StylingConfig) -> Self {
        Self {
            width: styling.width,
            height: styling.height,
            background: styling.colors.background.clone(),
            grid: styling.enable_grid,
            font_family: styling.font_family.clone(),
            title_font_size: styling.title_font_size,
        }
    }
}

/// Declarative description of one chart bound to a data table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    /// Stable identifier, e.g. `cobweb-cases`.
    pub id: String,
    /// Chart title.
    pub title: String,
    /// Chart kind.
    pub kind: ChartKind,
    /// Table the series read from, shared between charts.
    pub data: Arc<DataTable>,
    /// Horizontal axis.
    pub x_axis: Axis,
    /// Vertical axis.
    pub y_axis: Axis,
    /// Series in drawing order.
    pub series: Vec<SeriesSpec>,
    /// Visual settings.
    pub style: ChartStyle,
}

impl PlotSpec {
    /// Checks that every bound column exists and can sit on an axis.
    pub fn validate(&self) -> Result<()> {
        let bound = [self.x_axis.column.as_str(), self.y_axis.column.as_str()]
            .into_iter()
            .chain(self.series.iter().flat_map(|s| [s.x.as_str(), s.y.as_str()]));

        for name in bound {
            let column = self.data.column(name)?;
            if !column.is_plottable() {
                return Err(DashError::graph(format!(
                    "column '{name}' of type {} cannot be plotted",
                    column.type_name()
                )));
            }
        }
        Ok(())
    }
}

/// How plots are arranged in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Row-major grid.
    Grid {
        /// Plots per row, at least 1.
        columns: usize,
    },
    /// One plot per row.
    Stack,
    /// One plot visible at a time, picked from a tab strip.
    Tabs,
}

impl Arrangement {
    /// Plots per row.
    pub fn columns(self) -> usize {
        match self {
            Self::Grid { columns } => columns.max(1),
            Self::Stack | Self::Tabs => 1,
        }
    }
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::Grid { columns: 2 }
    }
}

/// Ordered composition of plots handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Dashboard heading.
    pub title: String,
    /// Line below the heading.
    pub subtitle: Option<String>,
    /// Plot arrangement.
    pub arrangement: Arrangement,
    /// Plots in display order.
    pub plots: Vec<PlotSpec>,
}

impl Layout {
    /// Looks up a plot by id.
    pub fn plot(&self, id: &str) -> Option<&PlotSpec> {
        self.plots.iter().find(|p| p.id == id)
    }

    /// Ids of all plots in order.
    pub fn plot_ids(&self) -> Vec<&str> {
        self.plots.iter().map(|p| p.id.as_str()).collect()
    }
}
