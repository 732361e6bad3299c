//! Noise injection configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default privacy budget.
pub const DEFAULT_EPSILON: f64 = 1.0;

/// Noise injection configuration.
///
/// `delta` is recorded in reports for audit. The Laplace mechanism itself
/// only spends `epsilon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    /// Privacy budget; smaller means more noise
    pub epsilon: f64,
    /// Failure probability recorded alongside epsilon
    pub delta: f64,
    /// Seed for reproducible noise; OS entropy when absent
    pub seed: Option<u64>,
    /// Lower clip bound as a multiple of the observed minimum
    pub clip_lower_factor: f64,
    /// Upper clip bound as a multiple of the observed maximum
    pub clip_upper_factor: f64,
    /// Fallback Gaussian standard deviation as a fraction of the column's
    pub fallback_std_fraction: f64,
}

/// Validation errors for privacy configuration.
#[derive(Debug, Error, PartialEq)]
pub enum PrivacyConfigError {
    #[error("epsilon must be finite and greater than 0.0, got {0}")]
    InvalidEpsilon(f64),
    #[error("delta must be in [0.0, 1.0), got {0}")]
    InvalidDelta(f64),
    #[error("clip factors must be finite, got {lower} and {upper}")]
    InvalidClipFactors { lower: f64, upper: f64 },
    #[error("fallback_std_fraction must be finite and non-negative, got {0}")]
    InvalidFallbackFraction(f64),
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            delta: 1e-5,
            seed: None,
            clip_lower_factor: 0.9,
            clip_upper_factor: 1.1,
            fallback_std_fraction: 0.05,
        }
    }
}

impl PrivacyConfig {
    /// Creates a new privacy config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set epsilon.
    ///
    /// Not clamped: an unusable epsilon makes the calibrated mechanism fail
    /// and the injector fall back, which is reported.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Builder method to set delta.
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    /// Builder method to set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method to set both clip factors.
    pub fn with_clip_factors(mut self, lower: f64, upper: f64) -> Self {
        self.clip_lower_factor = lower;
        self.clip_upper_factor = upper;
        self
    }

    /// Builder method to set the fallback noise fraction.
    pub fn with_fallback_std_fraction(mut self, fraction: f64) -> Self {
        if fraction < 0.0 {
            tracing::warn!(
                "fallback_std_fraction {} clamped to minimum 0.0",
                fraction
            );
        }
        self.fallback_std_fraction = fraction.max(0.0);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), PrivacyConfigError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(PrivacyConfigError::InvalidEpsilon(self.epsilon));
        }
        if !(0.0..1.0).contains(&self.delta) {
            return Err(PrivacyConfigError::InvalidDelta(self.delta));
        }
        if !self.clip_lower_factor.is_finite() || !self.clip_upper_factor.is_finite() {
            return Err(PrivacyConfigError::InvalidClipFactors {
                lower: self.clip_lower_factor,
                upper: self.clip_upper_factor,
            });
        }
        if !self.fallback_std_fraction.is_finite() || self.fallback_std_fraction < 0.0 {
            return Err(PrivacyConfigError::InvalidFallbackFraction(
                self.fallback_std_fraction,
            ));
        }
        Ok(())
    }
}
