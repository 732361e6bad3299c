//! Completeness analysis for data quality assessment.
//!
//! Completeness measures the presence of values: the share of rows in a
//! column that are not null.

use crate::Result;
use crate::models::Column;
use crate::stats::percent;

use super::analyzer::MetricContext;

/// Completeness score (0-100) for one column.
///
/// A column without any non-null value scores 0, including the degenerate
/// case of a table with no rows.
pub(crate) fn column_completeness(column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    if column.non_null_count() == 0 {
        return Ok(0.0);
    }
    Ok(100.0 - percent(column.null_count(), ctx.row_count))
}
