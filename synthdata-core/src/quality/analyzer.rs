//! Quality analyzer facade.
//!
//! This module provides the main `QualityAnalyzer` that evaluates every
//! sub-metric for every column and combines them into the composite score.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{Result, SynthError};
use crate::models::{Column, Table};

use super::accuracy::column_accuracy;
use super::completeness::column_completeness;
use super::config::{NEUTRAL_SCORE, QualityConfig};
use super::consistency::column_consistency;
use super::models::{ColumnQuality, MetricScores, QualityMetric, QualityReport};
use super::timeliness::column_timeliness;
use super::uniqueness::column_uniqueness;
use super::validity::column_validity;

/// Score a column receives for a metric that could not be computed.
const NEUTRAL_METRIC_SCORE: f64 = 100.0;

/// Inputs shared by every per-column metric evaluation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MetricContext<'a> {
    /// Table row count
    pub row_count: usize,
    /// Active configuration
    pub config: &'a QualityConfig,
    /// "Now" for timeliness
    pub reference_time: DateTime<Utc>,
}

/// Quality analyzer for scoring tabular data.
///
/// The analyzer is stateless apart from its configuration, so one instance
/// can score many tables, including from several threads at once.
///
/// # Example
///
/// ```rust
/// use synthdata_core::models::{Column, Table};
/// use synthdata_core::quality::QualityAnalyzer;
///
/// let table = Table::new(vec![
///     Column::from_values("age", vec![25_i64, 30, 35, 40, 45]),
///     Column::from_values("email", vec!["a@x.com", "b@y.com", "c@z.com", "d@w.com", "e@v.com"]),
/// ])?;
///
/// let score = QualityAnalyzer::with_defaults().score(&table);
/// assert!((0.0..=100.0).contains(&score));
/// # Ok::<(), synthdata_core::SynthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QualityAnalyzer {
    config: QualityConfig,
    reference_time: Option<DateTime<Utc>>,
}

impl QualityAnalyzer {
    /// Creates a new quality analyzer with the given configuration.
    pub fn new(config: QualityConfig) -> Self {
        Self {
            config,
            reference_time: None,
        }
    }

    /// Creates a new quality analyzer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(QualityConfig::default())
    }

    /// Pins the reference time used for timeliness.
    ///
    /// Without it, every assessment uses the current time.
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    /// Returns a reference to the analyzer configuration.
    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Scores a table, never failing.
    ///
    /// Any error from [`QualityAnalyzer::assess`] is logged and replaced by
    /// the configured fallback score so a broken score never blocks the
    /// caller's pipeline.
    pub fn score(&self, table: &Table) -> f64 {
        match self.assess(table) {
            Ok(report) => report.overall_score,
            Err(e) => {
                warn!("Quality scoring failed, returning neutral score: {}", e);
                self.fallback_score()
            }
        }
    }

    /// Assesses a table and returns the full report.
    ///
    /// Per-column metric failures are absorbed (the metric scores 100 for
    /// that column and is listed in `failed_metrics`). Errors are returned
    /// only when no composite score can be produced at all: invalid
    /// configuration, a table without columns, or a non-finite result.
    pub fn assess(&self, table: &Table) -> Result<QualityReport> {
        self.config
            .validate()
            .map_err(|e| SynthError::configuration(e.to_string()))?;

        if table.is_empty() {
            return Err(SynthError::EmptyTable);
        }

        let ctx = MetricContext {
            row_count: table.row_count(),
            config: &self.config,
            reference_time: self.reference_time.unwrap_or_else(Utc::now),
        };

        let columns: Vec<ColumnQuality> = table
            .columns()
            .iter()
            .map(|column| assess_column(column, &ctx))
            .collect();

        let per_column: Vec<MetricScores> = columns.iter().map(|c| c.scores).collect();
        let metrics = MetricScores::mean_of(&per_column).ok_or(SynthError::EmptyTable)?;

        let overall_score = self.composite_score(&metrics);
        if !overall_score.is_finite() {
            return Err(SynthError::metric(
                "composite",
                "*",
                "weighted average is not finite",
            ));
        }

        debug!(
            rows = ctx.row_count,
            columns = columns.len(),
            score = overall_score,
            "Quality assessment completed"
        );

        Ok(QualityReport {
            overall_score,
            metrics,
            row_count: ctx.row_count,
            column_count: columns.len(),
            columns,
            assessed_at: ctx.reference_time,
        })
    }

    /// Weighted average of the per-metric column averages, in [0, 100].
    fn composite_score(&self, metrics: &MetricScores) -> f64 {
        let weights = &self.config.weights;
        let weighted: f64 = QualityMetric::ALL
            .iter()
            .map(|m| weights.weight(*m) * metrics.get(*m))
            .sum();
        (weighted / weights.total()).clamp(0.0, 100.0)
    }

    fn fallback_score(&self) -> f64 {
        let configured = self.config.fallback_score;
        if (0.0..=100.0).contains(&configured) {
            configured
        } else {
            NEUTRAL_SCORE
        }
    }
}

/// Evaluates one metric for one column.
fn evaluate(metric: QualityMetric, column: &Column, ctx: &MetricContext<'_>) -> Result<f64> {
    match metric {
        QualityMetric::Completeness => column_completeness(column, ctx),
        QualityMetric::Consistency => column_consistency(column, ctx),
        QualityMetric::Accuracy => column_accuracy(column, ctx),
        QualityMetric::Timeliness => column_timeliness(column, ctx),
        QualityMetric::Validity => column_validity(column, ctx),
        QualityMetric::Uniqueness => column_uniqueness(column, ctx),
    }
}

/// Evaluates every metric for a column, substituting the neutral score for
/// any metric that fails.
fn assess_column(column: &Column, ctx: &MetricContext<'_>) -> ColumnQuality {
    let mut scores = MetricScores::default();
    let mut failed_metrics = Vec::new();

    for metric in QualityMetric::ALL {
        let outcome = evaluate(metric, column, ctx).and_then(|score| {
            if score.is_finite() {
                Ok(score.clamp(0.0, 100.0))
            } else {
                Err(SynthError::metric(
                    metric.name(),
                    column.name(),
                    "score is not finite",
                ))
            }
        });

        match outcome {
            Ok(score) => scores.set(metric, score),
            Err(e) => {
                warn!(
                    column = column.name(),
                    metric = metric.name(),
                    "Metric failed, using neutral score: {}",
                    e
                );
                scores.set(metric, NEUTRAL_METRIC_SCORE);
                failed_metrics.push(metric);
            }
        }
    }

    ColumnQuality {
        column_name: column.name().to_string(),
        kind: column.kind(),
        scores,
        failed_metrics,
    }
}

/// Scores a table with the default configuration.
///
/// Always returns a value in `[0, 100]`; 50 when the table cannot be scored.
pub fn score_quality(table: &Table) -> f64 {
    QualityAnalyzer::with_defaults().score(table)
}
