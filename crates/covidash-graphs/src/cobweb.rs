//! Cobweb charts: tomorrow's value against today's.
//!
//! Points above the identity diagonal mark growth from one day to the next,
//! points on it mark a flat day.

use crate::assembler::AssemblyOptions;
use crate::types::{Axis, ChartKind, MarkStyle, PlotSpec, SeriesSpec};
use covidash_common::{DataTable, Metric};
use std::sync::Arc;

/// Id of the cobweb chart of a metric.
pub fn cobweb_id(metric: Metric) -> String {
    format!("cobweb-{metric}")
}

/// Step series of `metric` against its shifted column, plus the diagonal.
pub fn cobweb_plot(data: Arc<DataTable>, metric: Metric, options: &AssemblyOptions) -> PlotSpec {
    let label = options.metric_label(metric);
    let today = metric.shifted_column();
    let tomorrow = metric.column();

    PlotSpec {
        id: cobweb_id(metric),
        title: format!("{} ({metric} cobweb)", options.chart_title()),
        kind: ChartKind::Cobweb,
        data,
        x_axis: Axis::linear(today, format!("{label} today")),
        y_axis: Axis::linear(tomorrow, format!("{label} tomorrow")),
        series: vec![
            SeriesSpec {
                name: label,
                x: today.to_string(),
                y: tomorrow.to_string(),
                mark: MarkStyle::Step,
                color: options.colors.metric(metric).to_string(),
            },
            SeriesSpec {
                name: "today = tomorrow".to_string(),
                x: today.to_string(),
                y: today.to_string(),
                mark: MarkStyle::Line,
                color: options.colors.reference.clone(),
            },
        ],
        style: options.style.clone(),
    }
}
