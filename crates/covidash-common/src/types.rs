//! Domain records for county-level COVID-19 counts and their daily totals.

use crate::table::{Column, DataTable};
use crate::utils::count_to_i64;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One source row: cumulative counts of one county on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Report date.
    pub date: NaiveDate,
    /// County name as published.
    pub county: String,
    /// State name as published.
    pub state: String,
    /// FIPS code, absent for some aggregated areas.
    pub fips: Option<String>,
    /// Cumulative cases.
    pub cases: u64,
    /// Cumulative deaths.
    pub deaths: u64,
}

/// The loaded dataset, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    records: Vec<RawRecord>,
}

impl RawTable {
    /// Name of the table produced by [`RawTable::to_table`].
    pub const TABLE_NAME: &'static str = "raw";

    /// Wraps already parsed records.
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Records in source order.
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, RawRecord> {
        self.records.iter()
    }

    /// Distinct state names, sorted.
    pub fn states(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.state.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct county names of one state, sorted.
    pub fn counties_in(&self, state: &str) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.state == state)
            .map(|r| r.county.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Most recent report date.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    /// Column-oriented view named `raw`.
    pub fn to_table(&self) -> DataTable {
        let rows = &self.records;
        DataTable::new(Self::TABLE_NAME)
            .with_column("date", Column::Date(rows.iter().map(|r| r.date).collect()))
            .with_column(
                "county",
                Column::Text(rows.iter().map(|r| r.county.clone()).collect()),
            )
            .with_column(
                "state",
                Column::Text(rows.iter().map(|r| r.state.clone()).collect()),
            )
            .with_column(
                "fips",
                Column::Text(
                    rows.iter()
                        .map(|r| r.fips.clone().unwrap_or_default())
                        .collect(),
                ),
            )
            .with_column("cases", Column::Int(rows.iter().map(|r| count_to_i64(r.cases)).collect()))
            .with_column(
                "deaths",
                Column::Int(rows.iter().map(|r| count_to_i64(r.deaths)).collect()),
            )
    }
}

impl FromIterator<RawRecord> for RawTable {
    fn from_iter<I: IntoIterator<Item = RawRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RawTable {
    type Item = &'a RawRecord;
    type IntoIter = std::slice::Iter<'a, RawRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Totals of one date across the selected counties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotal {
    /// Report date.
    pub date: NaiveDate,
    /// Summed cases.
    pub cases: i64,
    /// Summed deaths.
    pub deaths: i64,
    /// `cases` of the previous row, 0 on the first row.
    pub shifted_cases: i64,
    /// `deaths` of the previous row, 0 on the first row.
    pub shifted_deaths: i64,
}

impl DailyTotal {
    /// Value of one metric.
    pub fn value(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Cases => self.cases,
            Metric::Deaths => self.deaths,
        }
    }

    /// Previous-day value of one metric.
    pub fn shifted(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Cases => self.shifted_cases,
            Metric::Deaths => self.shifted_deaths,
        }
    }
}

/// Daily totals ordered by date ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTable {
    rows: Vec<DailyTotal>,
    scope: Scope,
    method: Method,
}

impl DailyTable {
    /// Name of the table produced by [`DailyTable::to_table`].
    pub const TABLE_NAME: &'static str = "daily";

    /// Wraps rows that are already sorted by date.
    pub fn new(rows: Vec<DailyTotal>, scope: Scope, method: Method) -> Self {
        Self { rows, scope, method }
    }

    /// Rows in date order.
    pub fn rows(&self) -> &[DailyTotal] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Scope the totals were built for.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Method the totals were built with.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Column-oriented view named `daily`.
    pub fn to_table(&self) -> DataTable {
        let rows = &self.rows;
        DataTable::new(Self::TABLE_NAME)
            .with_column("date", Column::Date(rows.iter().map(|r| r.date).collect()))
            .with_column("cases", Column::Int(rows.iter().map(|r| r.cases).collect()))
            .with_column("deaths", Column::Int(rows.iter().map(|r| r.deaths).collect()))
            .with_column(
                "shifted_cases",
                Column::Int(rows.iter().map(|r| r.shifted_cases).collect()),
            )
            .with_column(
                "shifted_deaths",
                Column::Int(rows.iter().map(|r| r.shifted_deaths).collect()),
            )
    }
}

/// A summed quantity of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Case counts.
    Cases,
    /// Death counts.
    Deaths,
}

impl Metric {
    /// Both metrics in display order.
    pub const ALL: [Self; 2] = [Self::Cases, Self::Deaths];

    /// Column holding the value.
    pub fn column(self) -> &'static str {
        match self {
            Self::Cases => "cases",
            Self::Deaths => "deaths",
        }
    }

    /// Column holding the previous-day value.
    pub fn shifted_column(self) -> &'static str {
        match self {
            Self::Cases => "shifted_cases",
            Self::Deaths => "shifted_deaths",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Geographic selection the totals are built over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Every county.
    #[default]
    National,
    /// Every county of one state.
    State(String),
    /// A single county.
    County {
        /// State the county belongs to.
        state: String,
        /// County name.
        county: String,
    },
}

impl Scope {
    /// Builds a scope from optional state and county names.
    ///
    /// A county without a state is rejected by configuration validation,
    /// here it falls back to the national scope.
    pub fn from_names(state: Option<&str>, county: Option<&str>) -> Self {
        match (state, county) {
            (Some(state), Some(county)) => Self::County {
                state: state.to_string(),
                county: county.to_string(),
            },
            (Some(state), None) => Self::State(state.to_string()),
            _ => Self::National,
        }
    }

    /// Whether a record belongs to this scope.
    pub fn contains(&self, record: &RawRecord) -> bool {
        match self {
            Self::National => true,
            Self::State(state) => record.state == *state,
            Self::County { state, county } => record.state == *state && record.county == *county,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::National => f.write_str("National"),
            Self::State(state) => write!(f, "State: {state}"),
            Self::County { state, county } => write!(f, "County: {county}, {state}"),
        }
    }
}

/// How values are derived from the cumulative source counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Cumulative totals as published.
    #[default]
    Cumulative,
    /// Day-over-day differences (new counts).
    Difference,
}

impl Method {
    /// Prefix used in axis labels.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cumulative => "Cumulative",
            Self::Difference => "New",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cumulative => f.write_str("cumulative"),
            Self::Difference => f.write_str("difference"),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cumulative" => Ok(Self::Cumulative),
            "difference" | "new" => Ok(Self::Difference),
            other => Err(format!("unknown method '{other}', expected cumulative or difference")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: (i32, u32, u32), state: &str, county: &str, cases: u64) -> RawRecord {
        RawRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            county: county.to_string(),
            state: state.to_string(),
            fips: None,
            cases,
            deaths: 0,
        }
    }

    #[test]
    fn test_states_and_counties_are_sorted_and_distinct() {
        let table: RawTable = vec![
            record((2020, 3, 1), "Washington", "Snohomish", 1),
            record((2020, 3, 1), "Illinois", "Cook", 2),
            record((2020, 3, 2), "Washington", "King", 3),
            record((2020, 3, 2), "Washington", "Snohomish", 4),
        ]
        .into_iter()
        .collect();

        assert_eq!(table.states(), vec!["Illinois", "Washington"]);
        assert_eq!(table.counties_in("Washington"), vec!["King", "Snohomish"]);
        assert!(table.counties_in("Oregon").is_empty());
        assert_eq!(table.latest_date(), NaiveDate::from_ymd_opt(2020, 3, 2));
    }

    #[test]
    fn test_scope_membership() {
        let row = record((2020, 3, 1), "Washington", "King", 1);

        assert!(Scope::National.contains(&row));
        assert!(Scope::State("Washington".into()).contains(&row));
        assert!(!Scope::State("Oregon".into()).contains(&row));
        assert!(Scope::from_names(Some("Washington"), Some("King")).contains(&row));
        assert!(!Scope::from_names(Some("Washington"), Some("Pierce")).contains(&row));
        assert_eq!(Scope::from_names(None, Some("King")), Scope::National);
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::National.to_string(), "National");
        assert_eq!(Scope::State("Ohio".into()).to_string(), "State: Ohio");
        assert_eq!(
            Scope::from_names(Some("Ohio"), Some("Franklin")).to_string(),
            "County: Franklin, Ohio"
        );
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("cumulative".parse::<Method>(), Ok(Method::Cumulative));
        assert_eq!("Difference".parse::<Method>(), Ok(Method::Difference));
        assert_eq!("new".parse::<Method>(), Ok(Method::Difference));
        assert!("weekly".parse::<Method>().is_err());
        assert_eq!(Method::Difference.label(), "New");
    }

    #[test]
    fn test_raw_table_columns() {
        let table: RawTable = vec![record((2020, 3, 1), "Ohio", "Franklin", 5)]
            .into_iter()
            .collect();
        let data = table.to_table();

        assert_eq!(data.name(), "raw");
        assert_eq!(
            data.column_names(),
            vec!["date", "county", "state", "fips", "cases", "deaths"]
        );
        assert_eq!(data.len(), 1);
    }
}
