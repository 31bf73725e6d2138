//! Property tests for daily aggregation.

use covidash_common::test_utils::property_testing::raw_table_strategy;
use covidash_common::{Method, RawTable, Scope};
use covidash_graphs::{AggregationConfig, Aggregator};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn aggregator(method: Method, rolling_window: usize) -> Aggregator {
    Aggregator::with_config(AggregationConfig {
        scope: Scope::National,
        method,
        rolling_window,
    })
}

proptest! {
    #[test]
    fn prop_one_row_per_distinct_date(raw in raw_table_strategy(200)) {
        let daily = Aggregator::new().aggregate(&raw).unwrap();
        let dates: BTreeSet<_> = raw.iter().map(|r| r.date).collect();

        prop_assert_eq!(daily.len(), dates.len());
        let rows: Vec<_> = daily.rows().iter().map(|r| r.date).collect();
        prop_assert_eq!(rows, dates.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_totals_preserve_mass(raw in raw_table_strategy(200)) {
        let daily = Aggregator::new().aggregate(&raw).unwrap();

        let raw_cases: i64 = raw.iter().map(|r| r.cases as i64).sum();
        let raw_deaths: i64 = raw.iter().map(|r| r.deaths as i64).sum();
        prop_assert_eq!(daily.rows().iter().map(|r| r.cases).sum::<i64>(), raw_cases);
        prop_assert_eq!(daily.rows().iter().map(|r| r.deaths).sum::<i64>(), raw_deaths);
    }

    #[test]
    fn prop_shifted_is_previous_row(
        raw in raw_table_strategy(200),
        difference in any::<bool>(),
        window in 1usize..=14,
    ) {
        let method = if difference { Method::Difference } else { Method::Cumulative };
        let daily = aggregator(method, window).aggregate(&raw).unwrap();
        let rows = daily.rows();

        if let Some(first) = rows.first() {
            prop_assert_eq!((first.shifted_cases, first.shifted_deaths), (0, 0));
        }
        for pair in rows.windows(2) {
            prop_assert_eq!(pair[1].shifted_cases, pair[0].cases);
            prop_assert_eq!(pair[1].shifted_deaths, pair[0].deaths);
        }
    }

    #[test]
    fn prop_aggregation_is_deterministic(raw in raw_table_strategy(200)) {
        let aggregator = aggregator(Method::Difference, 3);
        let reversed: RawTable = raw.iter().rev().cloned().collect();

        let first = aggregator.aggregate(&raw).unwrap();
        prop_assert_eq!(&first, &aggregator.aggregate(&raw).unwrap());
        prop_assert_eq!(&first, &aggregator.aggregate(&reversed).unwrap());
    }

    #[test]
    fn prop_differences_sum_to_cumulative(raw in raw_table_strategy(200)) {
        let cumulative = Aggregator::new().aggregate(&raw).unwrap();
        let difference = aggregator(Method::Difference, 1).aggregate(&raw).unwrap();

        let mut running = 0i64;
        for (diff, total) in difference.rows().iter().zip(cumulative.rows()) {
            running += diff.cases;
            prop_assert_eq!(running, total.cases);
        }
    }
}
