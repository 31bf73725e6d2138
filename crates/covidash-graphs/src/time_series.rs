//! Cases and deaths over report dates.

use crate::assembler::AssemblyOptions;
use crate::types::{Axis, AxisScale, ChartKind, MarkStyle, PlotSpec, SeriesSpec};
use covidash_common::{DataTable, Metric};
use std::sync::Arc;

/// Id of the time series chart for an axis scale.
pub fn time_series_id(scale: AxisScale) -> &'static str {
    match scale {
        AxisScale::Linear => "timeseries-linear",
        AxisScale::Log => "timeseries-log",
    }
}

/// Both metrics as lines against `date`.
pub fn time_series_plot(
    data: Arc<DataTable>,
    scale: AxisScale,
    options: &AssemblyOptions,
) -> PlotSpec {
    let series = Metric::ALL
        .into_iter()
        .map(|metric| SeriesSpec {
            name: options.metric_label(metric),
            x: "date".to_string(),
            y: metric.column().to_string(),
            mark: MarkStyle::Line,
            color: options.colors.metric(metric).to_string(),
        })
        .collect();

    let title = match scale {
        AxisScale::Linear => options.chart_title(),
        AxisScale::Log => format!("{} (log scale)", options.chart_title()),
    };

    PlotSpec {
        id: time_series_id(scale).to_string(),
        title,
        kind: ChartKind::TimeSeries,
        data,
        x_axis: Axis::linear("date", "Date"),
        y_axis: Axis::linear(
            Metric::Cases.column(),
            format!("{} count", options.method.label()),
        )
        .with_scale(scale),
        series,
        style: options.style.clone(),
    }
}
