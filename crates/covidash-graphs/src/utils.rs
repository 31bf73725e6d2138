//! Helpers shared by the chart renderers.

use chrono::{Duration, NaiveDate};
use covidash_common::{format_count, format_date};
use plotters::style::RGBColor;
use std::ops::Range;

/// Fallback for colors that fail to parse.
pub const FALLBACK_COLOR: RGBColor = RGBColor(0, 0, 0);

/// Parses a `#rrggbb` color, falling back to black.
pub fn parse_color(color: &str) -> RGBColor {
    let Some(hex) = color.strip_prefix('#').filter(|h| h.len() == 6) else {
        return FALLBACK_COLOR;
    };

    match (
        u8::from_str_radix(&hex[0..2], 16),
        u8::from_str_radix(&hex[2..4], 16),
        u8::from_str_radix(&hex[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => RGBColor(r, g, b),
        _ => FALLBACK_COLOR,
    }
}

/// Days between `origin` and `date`, as a plot coordinate.
pub fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

/// Tick label of a day offset.
pub fn offset_label(origin: NaiveDate, offset: f64) -> String {
    format_date(origin + Duration::days(offset.round() as i64))
}

/// Tick label of a linear count axis.
pub fn count_label(value: f64) -> String {
    format_count(value.round() as i64)
}

/// Tick label of a log axis coordinate.
pub fn exponent_label(exponent: f64) -> String {
    if (exponent - exponent.round()).abs() < 1e-9 {
        format!("10^{}", exponent.round() as i64)
    } else {
        format!("10^{exponent:.1}")
    }
}

/// Smallest range covering `values`, padded so it is never empty.
pub fn padded_range(values: impl IntoIterator<Item = f64>, padding: f64) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }

    let pad = (max - min) * padding;
    (min - pad)..(max + pad)
}

/// Points of a staircase: horizontal to the next x, then vertical to its y.
pub fn step_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for pair in points.windows(2) {
        let ((x0, y0), (x1, _)) = (pair[0], pair[1]);
        out.push((x0, y0));
        out.push((x1, y0));
    }
    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}
