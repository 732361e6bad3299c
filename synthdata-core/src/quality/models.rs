//! Data quality report models.
//!
//! All report types contain scores, counts and column names only, never
//! cell values, so a report can be persisted or logged next to a generation
//! job without leaking the data it describes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ColumnKind;

/// The sub-metrics that make up the composite quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityMetric {
    /// Share of non-null cells
    Completeness,
    /// Outliers (numeric) or dominance of one value (non-numeric)
    Consistency,
    /// Plausible ranges and recognized formats
    Accuracy,
    /// Recency of timestamps
    Timeliness,
    /// Type and length validity
    Validity,
    /// Distinct-value ratio adjustment
    Uniqueness,
}

impl QualityMetric {
    /// Every metric, in report order.
    pub const ALL: [QualityMetric; 6] = [
        QualityMetric::Completeness,
        QualityMetric::Consistency,
        QualityMetric::Accuracy,
        QualityMetric::Timeliness,
        QualityMetric::Validity,
        QualityMetric::Uniqueness,
    ];

    /// Lowercase metric name.
    pub fn name(&self) -> &'static str {
        match self {
            QualityMetric::Completeness => "completeness",
            QualityMetric::Consistency => "consistency",
            QualityMetric::Accuracy => "accuracy",
            QualityMetric::Timeliness => "timeliness",
            QualityMetric::Validity => "validity",
            QualityMetric::Uniqueness => "uniqueness",
        }
    }
}

impl fmt::Display for QualityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One score (0-100) per sub-metric.
///
/// Used both for a single column and for the per-metric column averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricScores {
    /// Completeness score
    pub completeness: f64,
    /// Consistency score
    pub consistency: f64,
    /// Accuracy score
    pub accuracy: f64,
    /// Timeliness score
    pub timeliness: f64,
    /// Validity score
    pub validity: f64,
    /// Uniqueness adjustment score
    pub uniqueness: f64,
}

impl Default for MetricScores {
    fn default() -> Self {
        Self::uniform(100.0)
    }
}

impl MetricScores {
    /// Scores with the same value for every metric.
    pub fn uniform(score: f64) -> Self {
        Self {
            completeness: score,
            consistency: score,
            accuracy: score,
            timeliness: score,
            validity: score,
            uniqueness: score,
        }
    }

    /// Returns the score of one metric.
    pub fn get(&self, metric: QualityMetric) -> f64 {
        match metric {
            QualityMetric::Completeness => self.completeness,
            QualityMetric::Consistency => self.consistency,
            QualityMetric::Accuracy => self.accuracy,
            QualityMetric::Timeliness => self.timeliness,
            QualityMetric::Validity => self.validity,
            QualityMetric::Uniqueness => self.uniqueness,
        }
    }

    /// Sets the score of one metric.
    pub fn set(&mut self, metric: QualityMetric, score: f64) {
        let slot = match metric {
            QualityMetric::Completeness => &mut self.completeness,
            QualityMetric::Consistency => &mut self.consistency,
            QualityMetric::Accuracy => &mut self.accuracy,
            QualityMetric::Timeliness => &mut self.timeliness,
            QualityMetric::Validity => &mut self.validity,
            QualityMetric::Uniqueness => &mut self.uniqueness,
        };
        *slot = score;
    }

    /// Arithmetic mean of each metric across a set of scores.
    ///
    /// Every entry contributes equally. Returns `None` for an empty slice.
    pub fn mean_of(scores: &[MetricScores]) -> Option<Self> {
        if scores.is_empty() {
            return None;
        }
        let n = scores.len() as f64;
        let mut mean = Self::uniform(0.0);
        for metric in QualityMetric::ALL {
            mean.set(metric, scores.iter().map(|s| s.get(metric)).sum::<f64>() / n);
        }
        Some(mean)
    }
}

/// Quality scores for a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnQuality {
    /// Column name
    pub column_name: String,
    /// Inferred column kind
    pub kind: ColumnKind,
    /// Per-metric scores for this column
    pub scores: MetricScores,
    /// Metrics that failed and were replaced by the neutral score
    pub failed_metrics: Vec<QualityMetric>,
}

impl ColumnQuality {
    /// Returns true if any metric fell back to the neutral score.
    pub fn is_degraded(&self) -> bool {
        !self.failed_metrics.is_empty()
    }
}

/// Complete quality assessment for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Composite score (0-100)
    pub overall_score: f64,
    /// Per-metric averages across columns
    pub metrics: MetricScores,
    /// Per-column detail
    pub columns: Vec<ColumnQuality>,
    /// Number of rows assessed
    pub row_count: usize,
    /// Number of columns assessed
    pub column_count: usize,
    /// Reference time used for timeliness
    pub assessed_at: DateTime<Utc>,
}

impl QualityReport {
    /// Looks up the detail for one column.
    pub fn column(&self, name: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    /// Number of columns where at least one metric fell back.
    pub fn degraded_columns(&self) -> usize {
        self.columns.iter().filter(|c| c.is_degraded()).count()
    }

    /// Returns true if any column metric fell back.
    pub fn is_degraded(&self) -> bool {
        self.degraded_columns() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        let names: Vec<&str> = QualityMetric::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(
            names,
            vec![
                "completeness",
                "consistency",
                "accuracy",
                "timeliness",
                "validity",
                "uniqueness"
            ]
        );
        assert_eq!(QualityMetric::Accuracy.to_string(), "accuracy");
    }

    #[test]
    fn test_metric_scores_get_set() {
        let mut scores = MetricScores::default();
        assert_eq!(scores.get(QualityMetric::Validity), 100.0);

        scores.set(QualityMetric::Validity, 42.0);
        assert_eq!(scores.validity, 42.0);
    }

    #[test]
    fn test_mean_of_scores() {
        let mut a = MetricScores::uniform(100.0);
        a.set(QualityMetric::Consistency, 80.0);
        let b = MetricScores::uniform(90.0);

        let mean = MetricScores::mean_of(&[a, b]).unwrap();
        assert_eq!(mean.completeness, 95.0);
        assert_eq!(mean.consistency, 85.0);
        assert!(MetricScores::mean_of(&[]).is_none());
    }

    #[test]
    fn test_report_degraded_columns() {
        let report = QualityReport {
            overall_score: 90.0,
            metrics: MetricScores::default(),
            columns: vec![
                ColumnQuality {
                    column_name: "a".into(),
                    kind: ColumnKind::Float,
                    scores: MetricScores::default(),
                    failed_metrics: vec![QualityMetric::Consistency],
                },
                ColumnQuality {
                    column_name: "b".into(),
                    kind: ColumnKind::Text,
                    scores: MetricScores::default(),
                    failed_metrics: vec![],
                },
            ],
            row_count: 3,
            column_count: 2,
            assessed_at: Utc::now(),
        };

        assert_eq!(report.degraded_columns(), 1);
        assert!(report.is_degraded());
        assert!(report.column("b").is_some_and(|c| !c.is_degraded()));
    }

    #[test]
    fn test_report_serializes_metric_names_lowercase() {
        let column = ColumnQuality {
            column_name: "price".into(),
            kind: ColumnKind::Float,
            scores: MetricScores::default(),
            failed_metrics: vec![QualityMetric::Accuracy],
        };
        let json = serde_json::to_value(&column).unwrap();
        assert_eq!(json["failed_metrics"][0], "accuracy");
        assert_eq!(json["kind"], "float");
    }
}
