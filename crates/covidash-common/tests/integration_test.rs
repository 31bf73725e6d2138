//! Integration tests for covidash-common crate.

use chrono::NaiveDate;
use covidash_common::{
    escape_html, format_count, Column, DailyTable, DailyTotal, DashError, Method, Metric,
    RawRecord, RawTable, Scope,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
}

#[test]
fn test_daily_table_columns_follow_rows() {
    let rows = vec![
        DailyTotal {
            date: date(21),
            cases: 1,
            deaths: 0,
            shifted_cases: 0,
            shifted_deaths: 0,
        },
        DailyTotal {
            date: date(22),
            cases: 2,
            deaths: 1,
            shifted_cases: 1,
            shifted_deaths: 0,
        },
    ];
    let daily = DailyTable::new(rows, Scope::National, Method::Cumulative);
    let table = daily.to_table();

    assert_eq!(table.name(), DailyTable::TABLE_NAME);
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.column(Metric::Cases.shifted_column()).unwrap(),
        &Column::Int(vec![0, 1])
    );
    assert_eq!(
        table.column("date").unwrap(),
        &Column::Date(vec![date(21), date(22)])
    );
    assert_eq!(daily.rows()[1].value(Metric::Deaths), 1);
    assert_eq!(daily.rows()[1].shifted(Metric::Cases), 1);
}

#[test]
fn test_raw_table_missing_column_is_schema_error() {
    let raw = RawTable::new(vec![RawRecord {
        date: date(21),
        county: "Snohomish".to_string(),
        state: "Washington".to_string(),
        fips: Some("53061".to_string()),
        cases: 1,
        deaths: 0,
    }]);
    let table = raw.to_table().without_column("deaths");

    let err = table.require(&["date", "cases", "deaths"]).unwrap_err();
    assert!(matches!(err, DashError::Schema { ref column, .. } if column == "deaths"));
    assert_eq!(err.stage(), "schema");
}

#[test]
fn test_formatting_helpers() {
    assert_eq!(format_count(1_234_567), "1,234,567");
    assert_eq!(escape_html("<b>"), "&lt;b&gt;");
}
