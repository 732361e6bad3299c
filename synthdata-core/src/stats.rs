//! Descriptive statistics shared by the quality metrics and noise mechanisms.
//!
//! Everything here is recomputed from column values on demand; nothing is
//! cached on the table.

use serde::{Deserialize, Serialize};

/// Summary statistics over a set of numeric values.
///
/// Non-finite inputs are kept, so a column containing NaN or infinity
/// produces a summary where [`NumericSummary::is_finite`] is false. Callers
/// treat that as a metric failure rather than silently dropping values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Number of values
    pub count: usize,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1), 0 for fewer than two values
    pub std_dev: f64,
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
}

impl NumericSummary {
    /// Computes the summary, or `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let (mean, std_dev) = mean_and_std(values);

        Some(Self {
            count: values.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            std_dev,
            q1: quantile_sorted(&sorted, 0.25),
            q3: quantile_sorted(&sorted, 0.75),
        })
    }

    /// Interquartile range (Q3 - Q1).
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Observed range (max - min).
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if every statistic is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.min,
            self.max,
            self.mean,
            self.std_dev,
            self.q1,
            self.q3,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Mean and sample standard deviation.
///
/// The standard deviation uses the n - 1 denominator and is 0 when fewer
/// than two values are present.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    if values.len() < 2 {
        return (mean, 0.0);
    }

    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

/// Quantile of pre-sorted values with linear interpolation between order
/// statistics.
///
/// Returns NaN for an empty slice. `p` is clamped to `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if p <= 0.0 {
        return sorted[0];
    }
    if p >= 1.0 {
        return sorted[n - 1];
    }
    let idx = p * ((n - 1) as f64);
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let w = idx - (lo as f64);
    sorted[lo] + w * (sorted[hi] - sorted[lo])
}

/// Percentage `part / whole * 100`, or 0 when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
