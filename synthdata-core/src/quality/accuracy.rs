//! Accuracy analysis for data quality assessment.
//!
//! Numeric columns are checked against a plausible range: the domain range
//! implied by the column name when one is recognized, otherwise
//! `mean ± k·σ`. Text columns are checked against the format implied by the
//! column name, or for non-blank content when no format is recognized.

use crate::Result;
use crate::error::SynthError;
use crate::models::{Column, ColumnKind};
use crate::stats::{NumericSummary, percent};

use super::analyzer::MetricContext;
use super::patterns::{NumericDomain, TextFormat};

/// Accuracy score (0-100) for one column.
///
/// Percentages are taken over the non-null cells.
pub(crate) fn column_accuracy(column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    match column.kind() {
        ColumnKind::Integer | ColumnKind::Float => numeric_accuracy(column, ctx),
        ColumnKind::Text => Ok(text_accuracy(column)),
        ColumnKind::DateTime | ColumnKind::Boolean => Ok(100.0),
    }
}

fn numeric_accuracy(column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    let values = column.numeric_values();

    let (low, high) = match NumericDomain::detect(column.name()) {
        Some(domain) => domain.range(),
        None => {
            let Some(summary) = NumericSummary::from_values(&values) else {
                return Ok(0.0);
            };
            if !summary.is_finite() {
                return Err(SynthError::metric(
                    "accuracy",
                    column.name(),
                    "mean or standard deviation is not finite",
                ));
            }
            let spread = ctx.config.accuracy_sigma * summary.std_dev;
            (summary.mean - spread, summary.mean + spread)
        }
    };

    let plausible = values.iter().filter(|v| (low..=high).contains(*v)).count();
    Ok(percent(plausible, column.non_null_count()))
}

fn text_accuracy(column: &Column) -> f64 {
    let accurate = match TextFormat::detect(column.name()) {
        Some(format) => {
            tracing::trace!(
                column = column.name(),
                format = format.name(),
                "Checking text format"
            );
            column
                .non_null()
                .filter(|v| v.as_str().is_some_and(|s| format.matches(s)))
                .count()
        }
        // Cells of another type in a text column are judged by validity
        None => column
            .non_null()
            .filter(|v| v.as_str().is_none_or(|s| !s.trim().is_empty()))
            .count(),
    };
    percent(accurate, column.non_null_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;
    use crate::quality::QualityConfig;
    use chrono::Utc;

    fn score_with(column: &Column, config: &QualityConfig) -> Result<f64> {
        let ctx = MetricContext {
            row_count: column.len(),
            config,
            reference_time: Utc::now(),
        };
        column_accuracy(column, &ctx)
    }

    fn score(column: &Column) -> f64 {
        score_with(column, &QualityConfig::default()).unwrap()
    }

    #[test]
    fn test_accuracy_age_domain() {
        let column = Column::from_values("age", vec![25_i64, 30, 35, 40, 1000]);
        assert!((score(&column) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_domain_bounds_inclusive() {
        let column = Column::from_values("conversion_rate", vec![0.0, 50.0, 100.0, 100.5]);
        assert!((score(&column) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_negative_salary() {
        let column = Column::from_values("salary", vec![52_000_i64, -10, 61_000, 48_000]);
        assert!((score(&column) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_sigma_band_without_domain() {
        let mut values: Vec<i64> = vec![10; 20];
        values.push(10_000);
        let column = Column::from_values("reading", values);
        // The extreme value sits well beyond three standard deviations
        assert!((score(&column) - 2000.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_constant_column_without_domain() {
        let column = Column::from_values("reading", vec![4.2, 4.2, 4.2]);
        assert_eq!(score(&column), 100.0);
    }

    #[test]
    fn test_accuracy_non_finite_without_domain_fails() {
        let column = Column::from_values("reading", vec![1.0, f64::NAN]);
        assert!(matches!(
            score_with(&column, &QualityConfig::default()),
            Err(SynthError::Metric { .. })
        ));
    }

    #[test]
    fn test_accuracy_email_format() {
        let column = Column::from_values(
            "email",
            vec!["a@x.com", "bad", "b@y.com", "c@z.com", "d@w.com"],
        );
        assert!((score(&column) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_phone_format() {
        let column = Column::from_values("phone", vec!["+1 555 123 4567", "n/a"]);
        assert!((score(&column) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_plain_text_blank_values() {
        let column = Column::from_values("name", vec!["Alice", "  ", "Bob", ""]);
        assert!((score(&column) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_accuracy_ignores_nulls() {
        let column = Column::new(
            "email",
            vec![Value::from("a@x.com"), Value::Null, Value::Null],
        );
        assert_eq!(score(&column), 100.0);
    }

    #[test]
    fn test_accuracy_other_kinds_are_neutral() {
        let column = Column::from_values("active", vec![true, false]);
        assert_eq!(score(&column), 100.0);
    }
}
