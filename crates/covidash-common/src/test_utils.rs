//! Test utilities and shared fixtures for covidash.
//!
//! Enabled for the crate's own tests and, through the `testing` feature,
//! for the other workspace crates.

use crate::types::{RawRecord, RawTable};
use chrono::NaiveDate;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests; safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Builds a date, panicking on an invalid one.
pub fn mock_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Builds a record with a synthetic FIPS code.
pub fn record(
    date: NaiveDate,
    state: &str,
    county: &str,
    cases: u64,
    deaths: u64,
) -> RawRecord {
    RawRecord {
        date,
        county: county.to_string(),
        state: state.to_string(),
        fips: Some(format!("{:05}", county.len() * 1000 + state.len())),
        cases,
        deaths,
    }
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Source-shaped CSV fixtures.
pub mod csv_fixtures {
    /// Header of the county dataset.
    pub const HEADER: &str = "date,county,state,fips,cases,deaths";

    /// The first days of the dataset: two counties, three dates.
    pub fn early_outbreak_csv() -> &'static str {
        concat!(
            "date,county,state,fips,cases,deaths\n",
            "2020-01-21,Snohomish,Washington,53061,1,0\n",
            "2020-01-22,Snohomish,Washington,53061,1,0\n",
            "2020-01-24,Cook,Illinois,17031,1,0\n",
            "2020-01-24,Snohomish,Washington,53061,1,0\n",
        )
    }

    /// Rows with a blank FIPS code and a blank death count.
    pub fn blank_fields_csv() -> &'static str {
        concat!(
            "date,county,state,fips,cases,deaths\n",
            "2020-03-01,New York City,New York,,1,\n",
            "2020-03-02,New York City,New York,,2,0\n",
        )
    }

    /// A header without the deaths column.
    pub fn missing_deaths_csv() -> &'static str {
        concat!(
            "date,county,state,fips,cases\n",
            "2020-01-21,Snohomish,Washington,53061,1\n",
        )
    }

    /// A row whose date cannot be parsed.
    pub fn bad_date_csv() -> &'static str {
        concat!(
            "date,county,state,fips,cases,deaths\n",
            "2020-01-21,Snohomish,Washington,53061,1,0\n",
            "21/01/2020,Snohomish,Washington,53061,1,0\n",
        )
    }
}

/// Table fixtures.
pub mod table_fixtures {
    use super::*;

    /// The three-row scenario: two rows on 2020-01-21, one on 2020-01-22.
    pub fn two_day_table() -> RawTable {
        vec![
            record(mock_date(2020, 1, 21), "Washington", "Snohomish", 1, 0),
            record(mock_date(2020, 1, 21), "Illinois", "Cook", 0, 0),
            record(mock_date(2020, 1, 22), "Washington", "Snohomish", 2, 1),
        ]
        .into_iter()
        .collect()
    }

    /// Two states over four days with growing counts.
    pub fn multi_state_table() -> RawTable {
        let mut records = Vec::new();
        for day in 0..4u32 {
            let date = mock_date(2020, 3, 1 + day);
            let d = u64::from(day);
            records.push(record(date, "Washington", "King", 10 + 5 * d, d));
            records.push(record(date, "Washington", "Pierce", 2 + d * d, 0));
            records.push(record(date, "Oregon", "Multnomah", 1 + 2 * d, d / 2));
        }
        records.into_iter().collect()
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for one record within a two-month window and a few counties.
    pub fn record_strategy() -> impl Strategy<Value = RawRecord> {
        (
            0i64..60,
            prop::sample::select(vec![
                ("Washington", "King"),
                ("Washington", "Snohomish"),
                ("Illinois", "Cook"),
                ("New York", "New York City"),
            ]),
            0u64..1_000_000,
            0u64..50_000,
        )
            .prop_map(|(offset, (state, county), cases, deaths)| {
                record(
                    mock_date(2020, 1, 21) + chrono::Duration::days(offset),
                    state,
                    county,
                    cases,
                    deaths,
                )
            })
    }

    /// Strategy for a table of up to `max_rows` records in random order.
    pub fn raw_table_strategy(max_rows: usize) -> impl Strategy<Value = RawTable> {
        prop::collection::vec(record_strategy(), 0..max_rows).prop_map(RawTable::new)
    }
}
