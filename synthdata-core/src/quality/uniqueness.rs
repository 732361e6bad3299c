//! Uniqueness adjustment for data quality assessment.
//!
//! Penalizes near-constant columns and columns that look like keys, using
//! the distinct-value ratio over all rows.

use crate::Result;
use crate::models::Column;

use super::analyzer::MetricContext;

/// Uniqueness adjustment score for one column.
pub(crate) fn column_uniqueness(column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    let ratio = if ctx.row_count == 0 {
        0.0
    } else {
        column.unique_count() as f64 / ctx.row_count as f64
    };
    Ok(ctx.config.uniqueness.score(ratio))
}
