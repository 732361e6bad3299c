//! Error types for table construction, quality scoring and noise injection.
//!
//! The two public contracts (`score_quality` and `inject_privacy_noise`)
//! never surface these errors: they fail open with a degraded result. The
//! fallible building blocks underneath return [`Result`] so callers that want
//! to distinguish a real score from a fallback can do so.

use thiserror::Error;

/// Main error type for synthdata operations.
///
/// # Privacy
/// Error messages name columns and counts only. Cell values are never
/// included in error output.
#[derive(Debug, Error)]
pub enum SynthError {
    /// Input could not be turned into a well-formed table
    #[error("Invalid table: {message}")]
    InvalidTable { message: String },

    /// Table has no columns, so no metric can be averaged
    #[error("Table has no columns to analyze")]
    EmptyTable,

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A single sub-metric could not be computed for a column
    #[error("Metric '{metric}' failed for column '{column}': {reason}")]
    Metric {
        metric: String,
        column: String,
        reason: String,
    },

    /// The calibrated noise mechanism could not be applied to a column
    #[error("Privacy mechanism failed for column '{column}': {reason}")]
    Privacy { column: String, reason: String },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with SynthError
pub type Result<T> = std::result::Result<T, SynthError>;

impl SynthError {
    /// Creates an invalid table error
    pub fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable {
            message: message.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a metric failure for one column
    pub fn metric(
        metric: impl Into<String>,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Metric {
            metric: metric.into(),
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Creates a privacy mechanism failure for one column
    pub fn privacy(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Privacy {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = SynthError::configuration("epsilon must be positive");
        assert!(error.to_string().contains("epsilon must be positive"));

        let error = SynthError::invalid_table("column 'age' has 3 rows, expected 5");
        assert!(error.to_string().starts_with("Invalid table"));
    }

    #[test]
    fn test_metric_error_names_column_and_metric() {
        let error = SynthError::metric("consistency", "salary", "non-finite quartiles");
        let message = error.to_string();
        assert!(message.contains("consistency"));
        assert!(message.contains("salary"));
        assert!(message.contains("non-finite quartiles"));
    }

    #[test]
    fn test_privacy_error_message() {
        let error = SynthError::privacy("score", "sensitivity is zero");
        assert_eq!(
            error.to_string(),
            "Privacy mechanism failed for column 'score': sensitivity is zero"
        );
    }

    #[test]
    fn test_serialization_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = SynthError::serialization("parsing table", source);
        assert!(std::error::Error::source(&error).is_some());
    }
}
