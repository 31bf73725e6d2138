//! SVG rendering of a single [`PlotSpec`] with plotters.

use crate::types::{Axis, AxisScale, MarkStyle, PlotSpec};
use crate::utils::{
    count_label, day_offset, exponent_label, offset_label, padded_range, parse_color, step_points,
};
use chrono::NaiveDate;
use covidash_common::{Column, DashError, DataTable, Result};
use plotters::prelude::*;
use tracing::debug;

/// Relative padding added around the data on each axis.
const RANGE_PADDING: f64 = 0.05;

/// Marker radius of point marks.
const POINT_SIZE: u32 = 3;

/// How axis coordinates map back to tick labels.
#[derive(Debug, Clone, Copy)]
enum Ticks {
    Dates(NaiveDate),
    Counts,
    Exponents,
}

impl Ticks {
    fn label(self, value: f64) -> String {
        match self {
            Self::Dates(origin) => offset_label(origin, value),
            Self::Counts => count_label(value),
            Self::Exponents => exponent_label(value),
        }
    }
}

/// Coordinates of one column along one axis.
struct Projection {
    values: Vec<Option<f64>>,
    ticks: Ticks,
}

fn project(table: &DataTable, column: &str, axis: &Axis) -> Result<Projection> {
    let log = axis.scale == AxisScale::Log;

    match table.column(column)? {
        Column::Date(dates) => {
            let origin = dates.iter().min().copied().unwrap_or_default();
            Ok(Projection {
                values: dates.iter().map(|&d| Some(day_offset(origin, d))).collect(),
                ticks: Ticks::Dates(origin),
            })
        }
        Column::Int(values) => Ok(Projection {
            values: values
                .iter()
                .map(|&v| match (log, v) {
                    (true, v) if v <= 0 => None,
                    (true, v) => Some((v as f64).log10()),
                    (false, v) => Some(v as f64),
                })
                .collect(),
            ticks: if log { Ticks::Exponents } else { Ticks::Counts },
        }),
        other => Err(DashError::graph(format!(
            "column '{column}' of type {} cannot be plotted",
            other.type_name()
        ))),
    }
}

struct ProjectedSeries<'a> {
    name: &'a str,
    mark: MarkStyle,
    color: RGBColor,
    points: Vec<(f64, f64)>,
}

/// Draws one chart and returns the SVG markup.
///
/// Dates are laid out as day offsets from the first date and labelled with
/// the date. Log axes plot `log10(v)` and drop values that are not positive.
pub fn render_plot(spec: &PlotSpec) -> Result<String> {
    spec.validate()?;

    let mut x_ticks = Ticks::Counts;
    let mut y_ticks = Ticks::Counts;
    let mut series = Vec::with_capacity(spec.series.len());

    for entry in &spec.series {
        let x = project(&spec.data, &entry.x, &spec.x_axis)?;
        let y = project(&spec.data, &entry.y, &spec.y_axis)?;
        x_ticks = x.ticks;
        y_ticks = y.ticks;

        let points = x
            .values
            .iter()
            .zip(&y.values)
            .filter_map(|(&x, &y)| Some((x?, y?)))
            .collect();

        series.push(ProjectedSeries {
            name: &entry.name,
            mark: entry.mark,
            color: parse_color(&entry.color),
            points,
        });
    }

    let x_range = padded_range(
        series.iter().flat_map(|s| s.points.iter().map(|p| p.0)),
        RANGE_PADDING,
    );
    let y_range = padded_range(
        series.iter().flat_map(|s| s.points.iter().map(|p| p.1)),
        RANGE_PADDING,
    );

    let style = &spec.style;
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        root.fill(&parse_color(&style.background))?;

        let title_font = (style.font_family.as_str(), style.title_font_size);
        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, title_font)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)?;

        let x_formatter = |v: &f64| x_ticks.label(*v);
        let y_formatter = |v: &f64| y_ticks.label(*v);

        let mut mesh = chart.configure_mesh();
        if !style.grid {
            mesh.disable_mesh();
        }
        mesh.x_desc(spec.x_axis.label.as_str())
            .y_desc(spec.y_axis.label.as_str())
            .x_labels(6)
            .y_labels(8)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .label_style((style.font_family.as_str(), 12))
            .draw()?;

        for entry in &series {
            let color = entry.color;
            let stroke = color.stroke_width(2);
            let annotation = match entry.mark {
                MarkStyle::Line => {
                    chart.draw_series(LineSeries::new(entry.points.iter().copied(), stroke))?
                }
                MarkStyle::Step => {
                    chart.draw_series(LineSeries::new(step_points(&entry.points), stroke))?
                }
                MarkStyle::Points => chart.draw_series(
                    entry
                        .points
                        .iter()
                        .map(|&p| Circle::new(p, POINT_SIZE, color.filled())),
                )?,
                MarkStyle::LinePoints => chart.draw_series(
                    LineSeries::new(entry.points.iter().copied(), stroke).point_size(POINT_SIZE),
                )?,
            };
            annotation
                .label(entry.name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((style.font_family.as_str(), 12))
            .draw()?;

        root.present()?;
    }

    debug!(plot = %spec.id, bytes = svg.len(), "plot rendered");
    Ok(strip_xml_declaration(svg))
}

/// Removes a leading `<?xml ... ?>` so the markup can be inlined into HTML.
fn strip_xml_declaration(svg: String) -> String {
    if let Some(rest) = svg.strip_prefix("<?xml") {
        if let Some(end) = rest.find("?>") {
            return rest[end + 2..].trim_start().to_string();
        }
    }
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregator;
    use crate::assembler::Assembler;
    use crate::types::{ChartKind, ChartStyle, SeriesSpec};
    use covidash_common::test_utils::table_fixtures;
    use std::sync::Arc;

    fn layout() -> crate::types::Layout {
        let raw = table_fixtures::multi_state_table();
        let daily = Aggregator::new().aggregate(&raw).unwrap();
        Assembler::default()
            .assemble(&raw.to_table(), &daily.to_table())
            .unwrap()
    }

    #[test]
    fn test_render_every_plot() {
        for plot in &layout().plots {
            let svg = render_plot(plot).unwrap();
            assert!(svg.starts_with("<svg"), "{}: {}", plot.id, &svg[..40.min(svg.len())]);
            assert!(svg.trim_end().ends_with("</svg>"));
            assert!(svg.contains("<text"));
        }
    }

    #[test]
    fn test_legend_names_series() {
        let layout = layout();
        let svg = render_plot(layout.plot("timeseries-linear").unwrap()).unwrap();
        assert!(svg.contains("Cumulative cases"));
        assert!(svg.contains("Cumulative deaths"));
    }

    #[test]
    fn test_date_ticks() {
        let layout = layout();
        let svg = render_plot(layout.plot("timeseries-linear").unwrap()).unwrap();
        assert!(svg.contains("2020-03-0"));
    }

    #[test]
    fn test_log_axis_skips_non_positive() {
        let table = DataTable::new("daily")
            .with_column("x", Column::Int(vec![1, 2, 3]))
            .with_column("y", Column::Int(vec![0, 10, 100]));
        let axis = Axis::linear("y", "y").with_scale(AxisScale::Log);

        let projection = project(&table, "y", &axis).unwrap();
        assert_eq!(projection.values, vec![None, Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_text_column_is_graph_error() {
        let table = DataTable::new("raw").with_column("county", Column::Text(vec!["King".into()]));
        let spec = PlotSpec {
            id: "text".to_string(),
            title: "Text".to_string(),
            kind: ChartKind::TimeSeries,
            data: Arc::new(table),
            x_axis: Axis::linear("county", "County"),
            y_axis: Axis::linear("county", "County"),
            series: vec![SeriesSpec {
                name: "county".to_string(),
                x: "county".to_string(),
                y: "county".to_string(),
                mark: MarkStyle::Points,
                color: "#000000".to_string(),
            }],
            style: ChartStyle::default(),
        };

        let err = render_plot(&spec).unwrap_err();
        assert_eq!(err.stage(), "render");
    }

    #[test]
    fn test_empty_table_renders() {
        let raw = covidash_common::RawTable::default();
        let daily = Aggregator::new().aggregate(&raw).unwrap();
        let layout = Assembler::default()
            .assemble(&raw.to_table(), &daily.to_table())
            .unwrap();

        for plot in &layout.plots {
            assert!(render_plot(plot).is_ok());
        }
    }

    #[test]
    fn test_strip_xml_declaration() {
        let svg = "<?xml version=\"1.0\"?>\n<svg></svg>".to_string();
        assert_eq!(strip_xml_declaration(svg), "<svg></svg>");
        assert_eq!(strip_xml_declaration("<svg/>".to_string()), "<svg/>");
    }
}
