//! Composition of the dashboard's chart set from prepared tables.

use crate::cobweb::cobweb_plot;
use crate::time_series::time_series_plot;
use crate::types::{Arrangement, AxisScale, ChartStyle, Layout};
use chrono::NaiveDate;
use covidash_common::{
    format_date, truncate_string, Column, DataTable, Method, Metric, Result, Scope,
};
use covidash_config::Config;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Columns the raw table must provide.
pub const RAW_COLUMNS: [&str; 3] = ["date", "cases", "deaths"];

/// Columns the daily table must provide.
pub const DAILY_COLUMNS: [&str; 5] = ["date", "cases", "deaths", "shifted_cases", "shifted_deaths"];

/// Longest chart title before it is shortened.
pub const MAX_TITLE_LENGTH: usize = 80;

/// Series colors, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesColors {
    /// Cases series.
    pub cases: String,
    /// Deaths series.
    pub deaths: String,
    /// Cobweb identity diagonal.
    pub reference: String,
}

impl SeriesColors {
    /// Color of a metric's series.
    pub fn metric(&self, metric: Metric) -> &str {
        match metric {
            Metric::Cases => &self.cases,
            Metric::Deaths => &self.deaths,
        }
    }
}

/// Everything the assembler needs besides the tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Dashboard heading.
    pub title: String,
    /// Prefix of each chart title.
    pub title_prefix: String,
    /// Scope the daily totals cover.
    pub scope: Scope,
    /// Method the daily totals were built with.
    pub method: Method,
    /// Plot arrangement.
    pub arrangement: Arrangement,
    /// Series colors.
    pub colors: SeriesColors,
    /// Chart styling.
    pub style: ChartStyle,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for AssemblyOptions {
    fn from(config: &Config) -> Self {
        let dashboard = &config.dashboard;
        let arrangement = if dashboard.tabs {
            Arrangement::Tabs
        } else if dashboard.stacked {
            Arrangement::Stack
        } else {
            Arrangement::Grid {
                columns: dashboard.columns,
            }
        };
        let colors = &config.styling.colors;

        Self {
            title: config.output.title.clone(),
            title_prefix: dashboard.title_prefix.clone(),
            scope: dashboard.scope(),
            method: dashboard.method,
            arrangement,
            colors: SeriesColors {
                cases: colors.cases.clone(),
                deaths: colors.deaths.clone(),
                reference: colors.reference.clone(),
            },
            style: ChartStyle::from(&config.styling),
        }
    }
}

impl AssemblyOptions {
    /// Chart title for the configured scope, e.g. `NYT COVID-19 data: State: Ohio`.
    pub fn chart_title(&self) -> String {
        truncate_string(
            &format!("{}: {}", self.title_prefix, self.scope),
            MAX_TITLE_LENGTH,
        )
    }

    /// Label of a metric under the configured method, e.g. `New deaths`.
    pub fn metric_label(&self, metric: Metric) -> String {
        format!("{} {}", self.method.label(), metric)
    }
}

/// Builds the fixed chart set of the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: AssemblyOptions,
}

impl Assembler {
    /// Creates an assembler with the given options.
    pub fn new(options: AssemblyOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Builds the layout. Performs no rendering or I/O.
    ///
    /// # Errors
    ///
    /// Returns a schema error naming the first required column missing from
    /// either table.
    #[instrument(skip_all, fields(raw_rows = raw.len(), daily_rows = daily.len()))]
    pub fn assemble(&self, raw: &DataTable, daily: &DataTable) -> Result<Layout> {
        raw.require(&RAW_COLUMNS)?;
        daily.require(&DAILY_COLUMNS)?;

        let data = Arc::new(daily.clone());
        let options = &self.options;

        let mut plots = vec![
            time_series_plot(Arc::clone(&data), AxisScale::Linear, options),
            time_series_plot(Arc::clone(&data), AxisScale::Log, options),
        ];
        plots.extend(
            Metric::ALL
                .into_iter()
                .map(|metric| cobweb_plot(Arc::clone(&data), metric, options)),
        );

        for plot in &plots {
            plot.validate()?;
        }

        debug!(plots = plots.len(), "layout assembled");
        Ok(Layout {
            title: options.title.clone(),
            subtitle: subtitle(raw)?,
            arrangement: options.arrangement,
            plots,
        })
    }
}

/// Latest report date and number of distinct counties of the raw table.
fn subtitle(raw: &DataTable) -> Result<Option<String>> {
    let latest = match raw.column("date")? {
        Column::Date(dates) => dates.iter().max().copied(),
        _ => None,
    };

    Ok(latest.map(|date| describe(date, county_count(raw))))
}

fn county_count(raw: &DataTable) -> Option<usize> {
    let Ok(Column::Text(counties)) = raw.column("county") else {
        return None;
    };

    let count = match raw.column("state") {
        Ok(Column::Text(states)) => states
            .iter()
            .zip(counties)
            .collect::<BTreeSet<_>>()
            .len(),
        _ => counties.iter().collect::<BTreeSet<_>>().len(),
    };
    Some(count)
}

fn describe(date: NaiveDate, counties: Option<usize>) -> String {
    match counties {
        Some(1) => format!("Data through {}, 1 county", format_date(date)),
        Some(n) => format!("Data through {}, {n} counties", format_date(date)),
        None => format!("Data through {}", format_date(date)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Aggregator;
    use crate::types::{ChartKind, MarkStyle};
    use covidash_common::test_utils::table_fixtures;
    use covidash_common::DashError;

    fn tables() -> (DataTable, DataTable) {
        let raw = table_fixtures::two_day_table();
        let daily = Aggregator::new().aggregate(&raw).unwrap();
        (raw.to_table(), daily.to_table())
    }

    #[test]
    fn test_fixed_plot_set() {
        let (raw, daily) = tables();
        let layout = Assembler::default().assemble(&raw, &daily).unwrap();

        assert_eq!(
            layout.plot_ids(),
            vec!["timeseries-linear", "timeseries-log", "cobweb-cases", "cobweb-deaths"]
        );
        assert_eq!(layout.title, "COVID-19 Dashboard");
        assert_eq!(layout.arrangement, Arrangement::Grid { columns: 2 });
        assert_eq!(
            layout.subtitle.as_deref(),
            Some("Data through 2020-01-22, 2 counties")
        );
    }

    #[test]
    fn test_plots_share_the_daily_table() {
        let (raw, daily) = tables();
        let layout = Assembler::default().assemble(&raw, &daily).unwrap();

        let first = &layout.plots[0].data;
        assert!(layout.plots.iter().all(|p| Arc::ptr_eq(&p.data, first)));
        assert_eq!(first.name(), "daily");
    }

    #[test]
    fn test_cobweb_bindings() {
        let (raw, daily) = tables();
        let layout = Assembler::default().assemble(&raw, &daily).unwrap();
        let plot = layout.plot("cobweb-deaths").unwrap();

        assert_eq!(plot.kind, ChartKind::Cobweb);
        assert_eq!(plot.x_axis.column, "shifted_deaths");
        assert_eq!(plot.y_axis.column, "deaths");
        assert_eq!(plot.x_axis.label, "Cumulative deaths today");
        assert_eq!(plot.y_axis.label, "Cumulative deaths tomorrow");

        let step = &plot.series[0];
        assert_eq!((step.x.as_str(), step.y.as_str()), ("shifted_deaths", "deaths"));
        assert_eq!(step.mark, MarkStyle::Step);

        let diagonal = &plot.series[1];
        assert_eq!(diagonal.x, diagonal.y);
        assert_eq!(diagonal.color, "#d62728");
    }

    #[test]
    fn test_titles_follow_scope_and_method() {
        let (raw, daily) = tables();
        let options = AssemblyOptions {
            scope: Scope::from_names(Some("Washington"), Some("Snohomish")),
            method: Method::Difference,
            ..AssemblyOptions::default()
        };
        let layout = Assembler::new(options).assemble(&raw, &daily).unwrap();

        let linear = layout.plot("timeseries-linear").unwrap();
        assert_eq!(linear.title, "NYT COVID-19 data: County: Snohomish, Washington");
        assert_eq!(linear.series[0].name, "New cases");
        assert_eq!(linear.series[1].name, "New deaths");

        let log = layout.plot("timeseries-log").unwrap();
        assert_eq!(log.y_axis.scale, AxisScale::Log);
    }

    #[test]
    fn test_stacked_arrangement_from_config() {
        let mut config = Config::default();
        config.dashboard.stacked = true;
        config.dashboard.state = Some("Ohio".to_string());

        let options = AssemblyOptions::from(&config);
        assert_eq!(options.arrangement, Arrangement::Stack);
        assert_eq!(options.chart_title(), "NYT COVID-19 data: State: Ohio");
    }

    #[test]
    fn test_tabbed_arrangement_from_config() {
        let mut config = Config::default();
        config.dashboard.tabs = true;

        assert_eq!(AssemblyOptions::from(&config).arrangement, Arrangement::Tabs);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let (raw, daily) = tables();

        let err = Assembler::default()
            .assemble(&raw, &daily.clone().without_column("shifted_deaths"))
            .unwrap_err();
        assert!(
            matches!(err, DashError::Schema { ref column, ref table } if column == "shifted_deaths" && table == "daily")
        );

        let err = Assembler::default()
            .assemble(&raw.without_column("deaths"), &daily)
            .unwrap_err();
        assert!(matches!(err, DashError::Schema { ref table, .. } if table == "raw"));
    }

    #[test]
    fn test_empty_tables_have_no_subtitle() {
        let raw = covidash_common::RawTable::default();
        let daily = Aggregator::new().aggregate(&raw).unwrap();

        let layout = Assembler::default()
            .assemble(&raw.to_table(), &daily.to_table())
            .unwrap();
        assert_eq!(layout.plots.len(), 4);
        assert!(layout.subtitle.is_none());
    }
}
