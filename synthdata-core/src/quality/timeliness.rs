//! Timeliness analysis for data quality assessment.

use chrono::TimeDelta;

use crate::Result;
use crate::error::SynthError;
use crate::models::{Column, ColumnKind};
use crate::stats::percent;

use super::analyzer::MetricContext;

/// Timeliness score (0-100) for one column.
///
/// For datetime columns, the share of non-null timestamps no older than the
/// configured window before the reference time. Timestamps after the
/// reference time count as timely. Every other kind scores 100.
pub(crate) fn column_timeliness(column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    if column.kind() != ColumnKind::DateTime {
        return Ok(100.0);
    }

    let window = TimeDelta::days(i64::from(ctx.config.timeliness_window_days));
    let cutoff = ctx
        .reference_time
        .checked_sub_signed(window)
        .ok_or_else(|| {
            SynthError::metric("timeliness", column.name(), "window start is out of range")
        })?;

    let timely = column
        .non_null()
        .filter(|v| v.as_datetime().is_some_and(|dt| dt >= cutoff))
        .count();

    Ok(percent(timely, column.non_null_count()))
}
