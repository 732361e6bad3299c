//! Core library for synthetic data quality scoring and privacy protection.
//!
//! This crate provides the tabular data model and the two post-generation
//! services a synthetic data pipeline runs before release:
//! - [`quality`]: a 0-100 quality score built from six sub-metrics
//! - [`privacy`]: Laplace noise injection with a Gaussian fallback
//!
//! # Contracts
//! [`score_quality`] and [`inject_privacy_noise`] never fail. When scoring
//! is impossible the score is 50; when calibrated noise is impossible the
//! fallback noise is applied. The underlying [`quality::QualityAnalyzer`]
//! and [`privacy::NoiseInjector`] expose the fallible paths and full
//! reports for callers that need to tell the difference.
//!
//! # Privacy
//! Quality reports, privacy reports, log events and errors carry column
//! names, counts and parameters only, never cell values.

pub mod error;
pub mod logging;
pub mod models;
pub mod privacy;
pub mod quality;
pub mod stats;

// Re-export commonly used types
pub use error::{Result, SynthError};
pub use models::{Column, ColumnKind, Table, Value};
pub use privacy::{NoiseInjector, PrivacyConfig, PrivacyReport, ProtectedTable, inject_privacy_noise};
pub use quality::{QualityAnalyzer, QualityConfig, QualityReport, score_quality};
