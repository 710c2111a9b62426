//! Percentages and frequency tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `part / whole` as a percentage in [0, 100]. A zero denominator yields 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

/// Round to a fixed number of decimal places for display/report output.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frequency<K> {
    pub key: K,
    pub count: usize,
    pub percent: f64,
}

/// Count occurrences of each key and attach percentages of the total.
///
/// Rows are ordered by count descending, ties broken by key ascending.
pub fn frequency_table<K, I>(keys: I) -> Vec<Frequency<K>>
where
    K: Ord + Clone,
    I: IntoIterator<Item = K>,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    let total: usize = counts.values().sum();
    let mut rows: Vec<Frequency<K>> = counts
        .into_iter()
        .map(|(key, count)| Frequency {
            key,
            count,
            percent: percentage(count, total),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn percentage_handles_zero_denominator() {
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn round_to_two_places() {
        assert_eq!(round_to(33.33333, 2), 33.33);
        assert_eq!(round_to(66.666, 1), 66.7);
    }

    #[test]
    fn frequency_table_orders_by_count_then_key() {
        let rows = frequency_table(vec!["b", "a", "c", "b", "a", "b"]);
        let keys: Vec<_> = rows.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(rows[0].count, 3);
        assert_eq!(rows[0].percent, 50.0);
    }

    #[test]
    fn frequency_table_of_nothing_is_empty() {
        let rows = frequency_table(Vec::<u8>::new());
        assert!(rows.is_empty());
    }

    proptest! {
        #[test]
        fn percents_sum_to_hundred(keys in proptest::collection::vec(0u8..10, 1..300)) {
            let rows = frequency_table(keys.clone());
            let total_pct: f64 = rows.iter().map(|r| r.percent).sum();
            let total_count: usize = rows.iter().map(|r| r.count).sum();
            prop_assert!((total_pct - 100.0).abs() < 1e-9);
            prop_assert_eq!(total_count, keys.len());
        }
    }
}
