//! Validity analysis for data quality assessment.
//!
//! Checks that cells agree with the column's inferred kind: integer columns
//! hold integral numbers, text columns stay within the length limit.

use crate::Result;
use crate::models::{Column, ColumnKind};
use crate::stats::percent;

use super::analyzer::MetricContext;

/// Validity score (0-100) for one column, over its non-null cells.
pub(crate) fn column_validity(column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    let valid = match column.kind() {
        ColumnKind::Integer => column.non_null().filter(|v| v.is_exact_integer()).count(),
        ColumnKind::Text => {
            let max_length = ctx.config.max_text_length;
            // Non-text cells in a text column have no length to check
            column
                .non_null()
                .filter(|v| v.as_str().is_none_or(|s| s.chars().count() <= max_length))
                .count()
        }
        ColumnKind::Float | ColumnKind::DateTime | ColumnKind::Boolean => return Ok(100.0),
    };

    Ok(percent(valid, column.non_null_count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;
    use crate::quality::QualityConfig;
    use chrono::Utc;

    fn score_with(column: &Column, config: &QualityConfig) -> f64 {
        let ctx = MetricContext {
            row_count: column.len(),
            config,
            reference_time: Utc::now(),
        };
        column_validity(column, &ctx).unwrap()
    }

    fn score(column: &Column) -> f64 {
        score_with(column, &QualityConfig::default())
    }

    #[test]
    fn test_validity_integer_column() {
        let column = Column::from_values("count", vec![1_i64, 2, 3]);
        assert_eq!(score(&column), 100.0);
    }

    #[test]
    fn test_validity_integer_column_with_text_cell() {
        let column = Column::new(
            "count",
            vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::from("four")],
        );
        assert_eq!(column.kind(), ColumnKind::Integer);
        assert_eq!(score(&column), 75.0);
    }

    #[test]
    fn test_validity_text_length_limit() {
        let long = "x".repeat(256);
        let column = Column::from_values("bio", vec!["short".to_string(), long]);
        assert_eq!(score(&column), 50.0);
    }

    #[test]
    fn test_validity_text_length_counts_characters() {
        let column = Column::from_values("name", vec!["ÅÅÅ"]);
        let config = QualityConfig::new().with_max_text_length(3);
        assert_eq!(score_with(&column, &config), 100.0);
    }

    #[test]
    fn test_validity_float_column_is_neutral() {
        let column = Column::from_values("ratio", vec![0.5, 1.25]);
        assert_eq!(score(&column), 100.0);
    }

    #[test]
    fn test_validity_all_null_column() {
        let column = Column::new("empty", vec![Value::Null, Value::Null]);
        assert_eq!(score(&column), 0.0);
    }
}
