//! Data quality assessment module.
//!
//! This module scores a table on six sub-metrics, averaged across columns
//! and combined with fixed weights into a composite score between 0 and 100:
//! - **Completeness**: share of non-null cells
//! - **Consistency**: Tukey-fence outliers, or dominance of one value
//! - **Accuracy**: plausible numeric ranges and recognized text formats
//! - **Timeliness**: recency of timestamps
//! - **Validity**: integral integers and bounded text length
//! - **Uniqueness**: adjustment for near-constant and key-like columns
//!
//! # Privacy
//! Reports contain scores, counts and column names only, never cell values.
//!
//! # Example
//! ```rust
//! use synthdata_core::models::{Column, Table};
//! use synthdata_core::quality::{QualityAnalyzer, QualityConfig};
//!
//! let table = Table::new(vec![Column::from_values("age", vec![25_i64, 30, 35])])?;
//! let analyzer = QualityAnalyzer::new(QualityConfig::default());
//! let report = analyzer.assess(&table)?;
//! println!("Quality score: {:.1}", report.overall_score);
//! # Ok::<(), synthdata_core::SynthError>(())
//! ```

mod accuracy;
mod analyzer;
mod completeness;
mod config;
mod consistency;
mod models;
mod patterns;
mod timeliness;
mod uniqueness;
mod validity;

// Re-export public API
pub use analyzer::{QualityAnalyzer, score_quality};
pub use config::{
    ConfigValidationError, MetricWeights, NEUTRAL_SCORE, QualityConfig, UniquenessBands,
};
pub use models::{ColumnQuality, MetricScores, QualityMetric, QualityReport};
pub use patterns::{NumericDomain, TextFormat};
