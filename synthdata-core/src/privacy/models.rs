//! Noise injection result and audit models.
//!
//! Like the quality report, the audit report carries parameters, counts and
//! column names only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Table;

/// Noise mechanism applied to a column or a table.
///
/// Ordered from strongest to weakest protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseMechanism {
    /// Calibrated Laplace noise with clipping and rounding
    Laplace,
    /// Fixed-fraction Gaussian fallback
    Gaussian,
    /// No noise could be applied
    Unmodified,
}

impl fmt::Display for NoiseMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseMechanism::Laplace => write!(f, "laplace"),
            NoiseMechanism::Gaussian => write!(f, "gaussian"),
            NoiseMechanism::Unmodified => write!(f, "unmodified"),
        }
    }
}

/// Noise applied to one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNoise {
    /// Column name
    pub column_name: String,
    /// Mechanism applied
    pub mechanism: NoiseMechanism,
    /// Observed range used as sensitivity (Laplace only)
    pub sensitivity: Option<f64>,
    /// Laplace scale `b` or Gaussian standard deviation
    pub scale: f64,
    /// Number of noised cells pulled back inside the clip bounds
    pub clipped_count: usize,
    /// Whether cells were rounded back to integers
    pub rounded: bool,
}

impl ColumnNoise {
    pub(crate) fn unmodified(column_name: &str) -> Self {
        Self {
            column_name: column_name.to_string(),
            mechanism: NoiseMechanism::Unmodified,
            sensitivity: None,
            scale: 0.0,
            clipped_count: 0,
            rounded: false,
        }
    }
}

/// Audit record for one noise injection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivacyReport {
    /// Epsilon requested
    pub epsilon: f64,
    /// Delta recorded
    pub delta: f64,
    /// Weakest mechanism applied to any numeric column
    pub mechanism: NoiseMechanism,
    /// True when any numeric column missed the calibrated mechanism
    pub degraded: bool,
    /// Per numeric column detail, in table order
    pub columns: Vec<ColumnNoise>,
    /// Why the calibrated mechanism failed, one `; `-separated entry per
    /// failing column
    pub fallback_reason: Option<String>,
    /// When the noise was applied
    pub protected_at: DateTime<Utc>,
}

impl PrivacyReport {
    /// Names of numeric columns that were left without noise.
    pub fn unmodified_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.mechanism == NoiseMechanism::Unmodified)
            .map(|c| c.column_name.as_str())
            .collect()
    }
}

/// A noised table together with its audit report.
#[derive(Debug, Clone)]
pub struct ProtectedTable {
    /// Table with noised numeric columns
    pub table: Table,
    /// What was done to produce it
    pub report: PrivacyReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mechanism_display_and_serde() {
        assert_eq!(NoiseMechanism::Gaussian.to_string(), "gaussian");
        assert_eq!(
            serde_json::to_value(NoiseMechanism::Unmodified).unwrap(),
            "unmodified"
        );
    }

    #[test]
    fn test_unmodified_columns() {
        let mut laplace = ColumnNoise::unmodified("age");
        laplace.mechanism = NoiseMechanism::Laplace;

        let report = PrivacyReport {
            epsilon: 1.0,
            delta: 1e-5,
            mechanism: NoiseMechanism::Gaussian,
            degraded: true,
            columns: vec![laplace, ColumnNoise::unmodified("score")],
            fallback_reason: Some("sensitivity is zero".into()),
            protected_at: Utc::now(),
        };

        assert_eq!(report.unmodified_columns(), vec!["score"]);
    }

    #[test]
    fn test_mechanism_ordering() {
        assert!(NoiseMechanism::Laplace < NoiseMechanism::Gaussian);
        assert!(NoiseMechanism::Gaussian < NoiseMechanism::Unmodified);
    }
}
