//! Aggregation of county rows into daily totals with lagged columns.

use chrono::NaiveDate;
use covidash_common::{
    count_to_i64, DailyTable, DailyTotal, DashError, Method, RawTable, Result, Scope,
};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Options controlling how daily totals are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Counties included in the totals.
    pub scope: Scope,
    /// Cumulative totals or day-over-day differences.
    pub method: Method,
    /// Trailing rolling average window in days; 1 leaves values untouched.
    pub rolling_window: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            scope: Scope::National,
            method: Method::Cumulative,
            rolling_window: 1,
        }
    }
}

impl From<&covidash_config::DashboardConfig> for AggregationConfig {
    fn from(config: &covidash_config::DashboardConfig) -> Self {
        Self {
            scope: config.scope(),
            method: config.method,
            rolling_window: config.rolling_window.max(1) as usize,
        }
    }
}

/// Groups rows by date and sums cases and deaths.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    /// National cumulative totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals built with the given options.
    pub fn with_config(config: AggregationConfig) -> Self {
        Self { config }
    }

    /// Options in use.
    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Builds one row per distinct date, ascending.
    ///
    /// Dates come from the data only: a date without rows in scope has no
    /// entry. The shifted columns hold the previous row's value, 0 on the
    /// first row.
    #[instrument(skip_all, fields(scope = %self.config.scope, method = %self.config.method))]
    pub fn aggregate(&self, raw: &RawTable) -> Result<DailyTable> {
        let mut sums: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
        let mut matched = 0usize;

        for record in raw.iter().filter(|r| self.config.scope.contains(r)) {
            matched += 1;
            let entry = sums.entry(record.date).or_insert((0, 0));
            entry.0 = entry.0.saturating_add(count_to_i64(record.cases));
            entry.1 = entry.1.saturating_add(count_to_i64(record.deaths));
        }

        if matched == 0 && self.config.scope != Scope::National {
            return Err(unmatched_scope(&self.config.scope, raw));
        }

        let dates: Vec<NaiveDate> = sums.keys().copied().collect();
        let mut cases: Vec<i64> = sums.values().map(|v| v.0).collect();
        let mut deaths: Vec<i64> = sums.values().map(|v| v.1).collect();

        for values in [&mut cases, &mut deaths] {
            if self.config.method == Method::Difference {
                difference_in_place(values);
            }
            rolling_mean_in_place(values, self.config.rolling_window);
        }

        let shifted_cases = shift(&cases);
        let shifted_deaths = shift(&deaths);

        let rows: Vec<DailyTotal> = dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| DailyTotal {
                date,
                cases: cases[i],
                deaths: deaths[i],
                shifted_cases: shifted_cases[i],
                shifted_deaths: shifted_deaths[i],
            })
            .collect();

        debug!(input_rows = matched, dates = rows.len(), "aggregated daily totals");
        Ok(DailyTable::new(rows, self.config.scope.clone(), self.config.method))
    }
}

/// Config error for a scope without rows, listing the names that do exist.
fn unmatched_scope(scope: &Scope, raw: &RawTable) -> DashError {
    let (kind, available) = match scope {
        Scope::County { state, .. } if !raw.counties_in(state).is_empty() => {
            (format!("counties in {state}"), raw.counties_in(state))
        }
        _ => ("states".to_string(), raw.states()),
    };

    if available.is_empty() {
        return DashError::config(format!("no rows match scope '{scope}': dataset is empty"));
    }
    DashError::config(format!(
        "no rows match scope '{scope}', available {kind}: {}",
        available.join(", ")
    ))
}

/// Replaces each value after the first by its difference to the previous one.
pub fn difference_in_place(values: &mut [i64]) {
    for i in (1..values.len()).rev() {
        values[i] = values[i].saturating_sub(values[i - 1]);
    }
}

/// Replaces values from index `window - 1` on by the trailing mean of the
/// last `window` values, rounded to the nearest integer.
pub fn rolling_mean_in_place(values: &mut [i64], window: usize) {
    if window <= 1 || values.len() < window {
        return;
    }

    let source = values.to_vec();
    let mut sum: i128 = source[..window - 1].iter().map(|&v| i128::from(v)).sum();
    for i in window - 1..source.len() {
        sum += i128::from(source[i]);
        let mean = sum as f64 / window as f64;
        values[i] = mean.round() as i64;
        sum -= i128::from(source[i + 1 - window]);
    }
}

/// Shifts values down one row, filling the first row with 0.
pub fn shift(values: &[i64]) -> Vec<i64> {
    std::iter::once(0)
        .chain(values.iter().copied())
        .take(values.len())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use covidash_common::test_utils::{mock_date, record, table_fixtures};

    #[test]
    fn test_two_day_scenario() {
        let daily = Aggregator::new()
            .aggregate(&table_fixtures::two_day_table())
            .unwrap();

        assert_eq!(
            daily.rows(),
            &[
                DailyTotal {
                    date: mock_date(2020, 1, 21),
                    cases: 1,
                    deaths: 0,
                    shifted_cases: 0,
                    shifted_deaths: 0,
                },
                DailyTotal {
                    date: mock_date(2020, 1, 22),
                    cases: 2,
                    deaths: 1,
                    shifted_cases: 1,
                    shifted_deaths: 0,
                },
            ]
        );
    }

    #[test]
    fn test_gaps_are_not_filled() {
        let raw: RawTable = vec![
            record(mock_date(2020, 1, 24), "Illinois", "Cook", 1, 0),
            record(mock_date(2020, 1, 21), "Washington", "Snohomish", 1, 0),
        ]
        .into_iter()
        .collect();

        let daily = Aggregator::new().aggregate(&raw).unwrap();
        let dates: Vec<_> = daily.rows().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![mock_date(2020, 1, 21), mock_date(2020, 1, 24)]);
    }

    #[test]
    fn test_empty_input() {
        let daily = Aggregator::new().aggregate(&RawTable::default()).unwrap();
        assert!(daily.is_empty());
    }

    #[test]
    fn test_state_and_county_scope() {
        let raw = table_fixtures::multi_state_table();

        let state = Aggregator::with_config(AggregationConfig {
            scope: Scope::State("Washington".to_string()),
            ..AggregationConfig::default()
        })
        .aggregate(&raw)
        .unwrap();
        // King 10 + Pierce 2 on the first day, King 25 + Pierce 11 on the last.
        assert_eq!(state.rows()[0].cases, 12);
        assert_eq!(state.rows()[3].cases, 36);
        assert_eq!(state.scope(), &Scope::State("Washington".to_string()));

        let county = Aggregator::with_config(AggregationConfig {
            scope: Scope::from_names(Some("Oregon"), Some("Multnomah")),
            ..AggregationConfig::default()
        })
        .aggregate(&raw)
        .unwrap();
        let cases: Vec<_> = county.rows().iter().map(|r| r.cases).collect();
        assert_eq!(cases, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_unknown_scope_is_error() {
        let err = Aggregator::with_config(AggregationConfig {
            scope: Scope::State("Atlantis".to_string()),
            ..AggregationConfig::default()
        })
        .aggregate(&table_fixtures::multi_state_table())
        .unwrap_err();

        assert_eq!(err.stage(), "config");
        assert!(err.to_string().contains("Atlantis"));
        assert!(err.to_string().contains("available states: Oregon, Washington"));
    }

    #[test]
    fn test_unknown_county_lists_counties_of_state() {
        let err = Aggregator::with_config(AggregationConfig {
            scope: Scope::from_names(Some("Washington"), Some("Spokane")),
            ..AggregationConfig::default()
        })
        .aggregate(&table_fixtures::multi_state_table())
        .unwrap_err();

        assert!(err
            .to_string()
            .contains("available counties in Washington: King, Pierce"));

        let err = Aggregator::with_config(AggregationConfig {
            scope: Scope::from_names(Some("Texas"), Some("Travis")),
            ..AggregationConfig::default()
        })
        .aggregate(&table_fixtures::multi_state_table())
        .unwrap_err();
        assert!(err.to_string().contains("available states: Oregon, Washington"));
    }

    #[test]
    fn test_scope_over_empty_dataset_is_error() {
        let err = Aggregator::with_config(AggregationConfig {
            scope: Scope::State("Ohio".to_string()),
            ..AggregationConfig::default()
        })
        .aggregate(&RawTable::default())
        .unwrap_err();

        assert_eq!(err.stage(), "config");
        assert!(err.to_string().contains("dataset is empty"));
    }

    #[test]
    fn test_difference_method_then_shift() {
        let daily = Aggregator::with_config(AggregationConfig {
            scope: Scope::from_names(Some("Oregon"), Some("Multnomah")),
            method: Method::Difference,
            rolling_window: 1,
        })
        .aggregate(&table_fixtures::multi_state_table())
        .unwrap();

        let cases: Vec<_> = daily.rows().iter().map(|r| r.cases).collect();
        let shifted: Vec<_> = daily.rows().iter().map(|r| r.shifted_cases).collect();
        assert_eq!(cases, vec![1, 2, 2, 2]);
        assert_eq!(shifted, vec![0, 1, 2, 2]);
        assert_eq!(daily.method(), Method::Difference);
    }

    #[test]
    fn test_difference_in_place() {
        let mut values = vec![1, 3, 6, 6, 10];
        difference_in_place(&mut values);
        assert_eq!(values, vec![1, 2, 3, 0, 4]);

        let mut empty: Vec<i64> = vec![];
        difference_in_place(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_rolling_mean_in_place() {
        let mut values = vec![1, 2, 3, 4, 10];
        rolling_mean_in_place(&mut values, 3);
        // First window-1 rows keep their values.
        assert_eq!(values, vec![1, 2, 2, 3, 6]);

        let mut short = vec![5, 7];
        rolling_mean_in_place(&mut short, 3);
        assert_eq!(short, vec![5, 7]);

        let mut untouched = vec![5, 7];
        rolling_mean_in_place(&mut untouched, 1);
        assert_eq!(untouched, vec![5, 7]);
    }

    #[test]
    fn test_shift() {
        assert_eq!(shift(&[4, 5, 9]), vec![0, 4, 5]);
        assert_eq!(shift(&[4]), vec![0]);
        assert!(shift(&[]).is_empty());
    }
}
