//! Privacy noise injection module.
//!
//! Perturbs the numeric columns of a table before release:
//! - **Laplace**: scale `(max - min) / epsilon` per column, clipped to
//!   `[min * 0.9, max * 1.1]`, integer columns rounded back to integers
//! - **Gaussian fallback**: `Normal(0, 0.05 * stddev)` for each numeric
//!   column where the calibrated path fails; columns the fallback cannot
//!   perturb are left unmodified and reported
//!
//! # Privacy
//! Sensitivity is the observed range of the data being protected, and the
//! clip and round steps trade privacy accounting for utility. This is
//! approximate protection, not a proven epsilon-DP guarantee.
//!
//! # Example
//! ```rust
//! use synthdata_core::models::{Column, Table};
//! use synthdata_core::privacy::inject_privacy_noise;
//!
//! let table = Table::new(vec![
//!     Column::from_values("salary", vec![48_000_i64, 52_000, 61_000]),
//!     Column::from_values("team", vec!["red", "blue", "red"]),
//! ])?;
//!
//! let noised = inject_privacy_noise(&table, 1.0);
//! assert_eq!(noised.column_names(), vec!["salary", "team"]);
//! # Ok::<(), synthdata_core::SynthError>(())
//! ```

mod config;
mod injector;
mod laplace;
mod models;

// Re-export public API
pub use config::{DEFAULT_EPSILON, PrivacyConfig, PrivacyConfigError};
pub use injector::{NoiseInjector, inject_privacy_noise};
pub use laplace::LaplaceNoise;
pub use models::{ColumnNoise, NoiseMechanism, PrivacyReport, ProtectedTable};
