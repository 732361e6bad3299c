//! Quality scoring configuration.
//!
//! This module provides the metric weights and the tunable constants used by
//! the individual sub-metrics. Defaults reproduce the production scoring
//! table; every knob is an explicit parameter rather than ambient state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::QualityMetric;

/// Score returned when the composite score cannot be computed at all.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Relative weight of each sub-metric in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricWeights {
    /// Completeness weight
    pub completeness: f64,
    /// Consistency weight
    pub consistency: f64,
    /// Accuracy weight
    pub accuracy: f64,
    /// Timeliness weight
    pub timeliness: f64,
    /// Validity weight
    pub validity: f64,
    /// Uniqueness adjustment weight
    pub uniqueness: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            completeness: 0.20,
            consistency: 0.20,
            accuracy: 0.20,
            timeliness: 0.15,
            validity: 0.15,
            uniqueness: 0.10,
        }
    }
}

impl MetricWeights {
    /// Returns the weight of one metric.
    pub fn weight(&self, metric: QualityMetric) -> f64 {
        match metric {
            QualityMetric::Completeness => self.completeness,
            QualityMetric::Consistency => self.consistency,
            QualityMetric::Accuracy => self.accuracy,
            QualityMetric::Timeliness => self.timeliness,
            QualityMetric::Validity => self.validity,
            QualityMetric::Uniqueness => self.uniqueness,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        QualityMetric::ALL.iter().map(|m| self.weight(*m)).sum()
    }
}

/// Mapping from the distinct-value ratio to the uniqueness score.
///
/// Near-constant columns and near-key columns are both penalized; anything
/// in between scores 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniquenessBands {
    /// Ratios strictly below this are near-constant
    pub low_ratio: f64,
    /// Score for near-constant columns
    pub low_score: f64,
    /// Ratios strictly above this are near-key
    pub high_ratio: f64,
    /// Score for near-key columns
    pub high_score: f64,
}

impl Default for UniquenessBands {
    fn default() -> Self {
        Self {
            low_ratio: 0.01,
            low_score: 50.0,
            high_ratio: 0.95,
            high_score: 80.0,
        }
    }
}

impl UniquenessBands {
    /// Maps a distinct-value ratio (0.0-1.0) to a score.
    pub fn score(&self, ratio: f64) -> f64 {
        if ratio < self.low_ratio {
            self.low_score
        } else if ratio > self.high_ratio {
            self.high_score
        } else {
            100.0
        }
    }
}

/// Quality scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Sub-metric weights
    pub weights: MetricWeights,
    /// Uniqueness score bands
    pub uniqueness: UniquenessBands,
    /// Tukey fence multiplier for numeric outliers
    pub outlier_iqr_multiplier: f64,
    /// Standard deviations around the mean accepted as plausible when no
    /// domain range is known for a numeric column
    pub accuracy_sigma: f64,
    /// Age window, in days, within which a timestamp counts as timely
    pub timeliness_window_days: u32,
    /// Maximum valid text length in characters
    pub max_text_length: usize,
    /// Score returned when the composite score cannot be computed
    pub fallback_score: f64,
}

/// Validation errors for quality configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("weight for {metric} must be finite and non-negative, got {value}")]
    InvalidWeight { metric: QualityMetric, value: f64 },
    #[error("metric weights must sum to a positive value")]
    ZeroWeights,
    #[error("uniqueness ratios must satisfy 0.0 <= low <= high <= 1.0, got {low}..{high}")]
    InvalidUniquenessBands { low: f64, high: f64 },
    #[error("outlier_iqr_multiplier must be finite and non-negative, got {0}")]
    InvalidOutlierMultiplier(f64),
    #[error("accuracy_sigma must be finite and non-negative, got {0}")]
    InvalidAccuracySigma(f64),
    #[error("fallback_score must be between 0.0 and 100.0, got {0}")]
    InvalidFallbackScore(f64),
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            uniqueness: UniquenessBands::default(),
            outlier_iqr_multiplier: 1.5,
            accuracy_sigma: 3.0,
            // Five years
            timeliness_window_days: 5 * 365,
            max_text_length: 255,
            fallback_score: NEUTRAL_SCORE,
        }
    }
}

impl QualityConfig {
    /// Creates a new quality config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set metric weights.
    pub fn with_weights(mut self, weights: MetricWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Builder method to set uniqueness bands.
    pub fn with_uniqueness_bands(mut self, bands: UniquenessBands) -> Self {
        self.uniqueness = bands;
        self
    }

    /// Builder method to set the Tukey fence multiplier.
    pub fn with_outlier_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.outlier_iqr_multiplier = multiplier;
        self
    }

    /// Builder method to set the plausibility window in standard deviations.
    pub fn with_accuracy_sigma(mut self, sigma: f64) -> Self {
        self.accuracy_sigma = sigma;
        self
    }

    /// Builder method to set the timeliness window.
    pub fn with_timeliness_window_days(mut self, days: u32) -> Self {
        self.timeliness_window_days = days;
        self
    }

    /// Builder method to set the maximum valid text length.
    pub fn with_max_text_length(mut self, length: usize) -> Self {
        self.max_text_length = length;
        self
    }

    /// Builder method to set the fallback score.
    pub fn with_fallback_score(mut self, score: f64) -> Self {
        if !(0.0..=100.0).contains(&score) {
            tracing::warn!("fallback_score {} clamped to valid range [0.0, 100.0]", score);
        }
        self.fallback_score = score.clamp(0.0, 100.0);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for metric in QualityMetric::ALL {
            let value = self.weights.weight(metric);
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigValidationError::InvalidWeight { metric, value });
            }
        }
        if self.weights.total() <= 0.0 {
            return Err(ConfigValidationError::ZeroWeights);
        }

        let bands = &self.uniqueness;
        if !(0.0..=1.0).contains(&bands.low_ratio)
            || !(0.0..=1.0).contains(&bands.high_ratio)
            || bands.low_ratio > bands.high_ratio
        {
            return Err(ConfigValidationError::InvalidUniquenessBands {
                low: bands.low_ratio,
                high: bands.high_ratio,
            });
        }

        if !self.outlier_iqr_multiplier.is_finite() || self.outlier_iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidOutlierMultiplier(
                self.outlier_iqr_multiplier,
            ));
        }
        if !self.accuracy_sigma.is_finite() || self.accuracy_sigma < 0.0 {
            return Err(ConfigValidationError::InvalidAccuracySigma(
                self.accuracy_sigma,
            ));
        }
        if !(0.0..=100.0).contains(&self.fallback_score) {
            return Err(ConfigValidationError::InvalidFallbackScore(
                self.fallback_score,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = MetricWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-12);
        assert_eq!(weights.weight(QualityMetric::Timeliness), 0.15);
    }

    #[test]
    fn test_uniqueness_bands() {
        let bands = UniquenessBands::default();
        assert_eq!(bands.score(0.005), 50.0);
        assert_eq!(bands.score(0.01), 100.0);
        assert_eq!(bands.score(0.5), 100.0);
        assert_eq!(bands.score(0.95), 100.0);
        assert_eq!(bands.score(1.0), 80.0);
    }

    #[test]
    fn test_quality_config_default() {
        let config = QualityConfig::default();
        assert_eq!(config.outlier_iqr_multiplier, 1.5);
        assert_eq!(config.accuracy_sigma, 3.0);
        assert_eq!(config.timeliness_window_days, 1825);
        assert_eq!(config.max_text_length, 255);
        assert_eq!(config.fallback_score, NEUTRAL_SCORE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quality_config_builder() {
        let config = QualityConfig::new()
            .with_outlier_iqr_multiplier(3.0)
            .with_accuracy_sigma(2.0)
            .with_timeliness_window_days(365)
            .with_max_text_length(64);

        assert_eq!(config.outlier_iqr_multiplier, 3.0);
        assert_eq!(config.accuracy_sigma, 2.0);
        assert_eq!(config.timeliness_window_days, 365);
        assert_eq!(config.max_text_length, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fallback_score_clamping() {
        let config = QualityConfig::new().with_fallback_score(150.0);
        assert_eq!(config.fallback_score, 100.0);
    }

    #[test]
    fn test_validate_negative_weight() {
        let config = QualityConfig::new().with_weights(MetricWeights {
            accuracy: -0.1,
            ..MetricWeights::default()
        });
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidWeight {
                metric: QualityMetric::Accuracy,
                value: -0.1
            })
        );
    }

    #[test]
    fn test_validate_zero_weights() {
        let config = QualityConfig::new().with_weights(MetricWeights {
            completeness: 0.0,
            consistency: 0.0,
            accuracy: 0.0,
            timeliness: 0.0,
            validity: 0.0,
            uniqueness: 0.0,
        });
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroWeights));
    }

    #[test]
    fn test_validate_inverted_bands() {
        let config = QualityConfig::new().with_uniqueness_bands(UniquenessBands {
            low_ratio: 0.9,
            high_ratio: 0.1,
            ..UniquenessBands::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidUniquenessBands { .. })
        ));
    }

    #[test]
    fn test_validate_non_finite_multiplier() {
        let config = QualityConfig::new().with_outlier_iqr_multiplier(f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidOutlierMultiplier(_))
        ));
    }

    #[test]
    fn test_quality_config_serde_roundtrip() {
        let config = QualityConfig::new()
            .with_accuracy_sigma(2.5)
            .with_weights(MetricWeights {
                uniqueness: 0.0,
                ..MetricWeights::default()
            });

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: QualityConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.accuracy_sigma, 2.5);
        assert_eq!(deserialized.weights, config.weights);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: QualityConfig = serde_json::from_str(r#"{"max_text_length": 100}"#).unwrap();
        assert_eq!(config.max_text_length, 100);
        assert_eq!(config.weights, MetricWeights::default());
    }
}
