//! Consistency analysis for data quality assessment.
//!
//! Numeric columns are checked for Tukey-fence outliers; every other column
//! is checked for how strongly a single value dominates it.

use crate::Result;
use crate::error::SynthError;
use crate::models::Column;
use crate::stats::{NumericSummary, percent};

use super::analyzer::MetricContext;

/// Consistency score (0-100) for one column.
pub(crate) fn column_consistency(column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    if column.kind().is_numeric() {
        numeric_consistency(column, ctx)
    } else {
        Ok(categorical_consistency(column, ctx))
    }
}

/// `100 - outlier%`, where outliers fall outside
/// `[Q1 - k*IQR, Q3 + k*IQR]` and the percentage is taken over all rows.
fn numeric_consistency(column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    let values = column.numeric_values();
    let Some(summary) = NumericSummary::from_values(&values) else {
        return Ok(100.0);
    };

    if !summary.is_finite() {
        return Err(SynthError::metric(
            "consistency",
            column.name(),
            "quartiles are not finite",
        ));
    }

    let fence = ctx.config.outlier_iqr_multiplier * summary.iqr();
    let lower = summary.q1 - fence;
    let upper = summary.q3 + fence;

    let outliers = values
        .iter()
        .filter(|v| !(lower..=upper).contains(*v))
        .count();

    Ok(100.0 - percent(outliers, ctx.row_count))
}

/// `100 - 0.5 * share of the most frequent value`, over all rows.
///
/// A column with no non-null values has no dominant value and scores 100.
fn categorical_consistency(column: &Column, ctx: &MetricContext<'_>) -> f64 {
    100.0 - 0.5 * percent(column.most_frequent_count(), ctx.row_count)
}
