//! Order statistics and location summaries over integer samples.
//!
//! Inputs are small integer measurements (durations in days, counts per
//! member). Empty samples summarize to `None` rather than NaN so reports
//! never carry non-finite numbers.

use serde::{Deserialize, Serialize};

/// Median of a sample. Even-length samples average the two middle values.
pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid] as f64)
    } else {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    }
}

/// Arithmetic mean of a sample.
pub fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: i128 = values.iter().map(|&v| i128::from(v)).sum();
    Some(sum as f64 / values.len() as f64)
}

/// Five-number-ish summary used by the duration report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: i64,
    pub max: i64,
}

impl Summary {
    pub fn of(values: &[i64]) -> Option<Self> {
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;
        Some(Self {
            count: values.len(),
            mean: mean(values)?,
            median: median(values)?,
            min,
            max,
        })
    }
}
