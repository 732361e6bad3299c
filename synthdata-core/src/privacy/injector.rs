//! Noise injector facade.
//!
//! The calibrated path adds Laplace noise scaled to each numeric column's
//! observed range, clips to a band around that range and rounds integer
//! columns. A numeric column where it fails gets the Gaussian fallback;
//! the other numeric columns keep their calibrated noise.

use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use tracing::{debug, info, warn};

use crate::error::{Result, SynthError};
use crate::models::{Column, ColumnKind, Table, Value};
use crate::stats::{NumericSummary, mean_and_std};

use super::config::PrivacyConfig;
use super::laplace::LaplaceNoise;
use super::models::{ColumnNoise, NoiseMechanism, PrivacyReport, ProtectedTable};

/// Noised replacement for each column, in table order.
type NoisedColumns = (Vec<Arc<Column>>, Vec<ColumnNoise>);

/// Adds privacy noise to the numeric columns of a table.
///
/// The injector never mutates its input. Non-numeric columns of the output
/// are the same `Arc`s as the input's.
///
/// # Example
///
/// ```rust
/// use synthdata_core::models::{Column, Table};
/// use synthdata_core::privacy::{NoiseInjector, PrivacyConfig};
///
/// let table = Table::new(vec![Column::from_values("age", vec![25_i64, 30, 35, 40])])?;
/// let injector = NoiseInjector::new(PrivacyConfig::new().with_epsilon(1.0).with_seed(7));
///
/// let protected = injector.protect(&table);
/// assert_eq!(protected.table.row_count(), 4);
/// assert!(!protected.report.degraded);
/// # Ok::<(), synthdata_core::SynthError>(())
/// ```
///
/// # Privacy
/// Sensitivity is taken from the observed data and the output is clipped
/// and rounded, so the result is approximate protection, not a formal
/// epsilon-differential-privacy guarantee.
#[derive(Debug, Clone)]
pub struct NoiseInjector {
    config: PrivacyConfig,
}

impl NoiseInjector {
    /// Creates a new injector with the given configuration.
    pub fn new(config: PrivacyConfig) -> Self {
        Self { config }
    }

    /// Creates a new injector with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PrivacyConfig::default())
    }

    /// Returns a reference to the injector configuration.
    pub fn config(&self) -> &PrivacyConfig {
        &self.config
    }

    /// Adds noise to every numeric column, never failing.
    ///
    /// Each numeric column where the calibrated mechanism fails falls back
    /// to Gaussian noise on its own. A column where even the fallback fails,
    /// or where it would add no noise, is left unmodified and listed in the
    /// report.
    pub fn protect(&self, table: &Table) -> ProtectedTable {
        let mut rng = self.rng();
        let mut columns = Vec::with_capacity(table.column_count());
        let mut details = Vec::new();
        let mut failures = Vec::new();

        for column in table.columns() {
            if !column.kind().is_numeric() {
                columns.push(Arc::clone(column));
                continue;
            }
            let (noised, detail) = match self.laplace_column(column, &mut rng) {
                Ok((noised, detail)) => (Arc::new(noised), detail),
                Err(e) => {
                    warn!(
                        column = column.name(),
                        "Calibrated noise failed, falling back to Gaussian noise: {}", e
                    );
                    failures.push(e.to_string());
                    self.fallback_column(column, &mut rng)
                }
            };
            columns.push(noised);
            details.push(detail);
        }

        let fallback_reason = (!failures.is_empty()).then(|| failures.join("; "));
        let protected = ProtectedTable {
            table: table.with_columns(columns),
            report: self.report(details, fallback_reason),
        };
        log_report(&protected.report);
        protected
    }

    /// Adds calibrated Laplace noise, or fails.
    ///
    /// Validates the configuration first and never falls back.
    pub fn protect_strict(&self, table: &Table) -> Result<ProtectedTable> {
        self.config
            .validate()
            .map_err(|e| SynthError::configuration(e.to_string()))?;

        let mut rng = self.rng();
        let (columns, details) = self.laplace_columns(table, &mut rng)?;

        let protected = ProtectedTable {
            table: table.with_columns(columns),
            report: self.report(details, None),
        };
        log_report(&protected.report);
        Ok(protected)
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn report(&self, columns: Vec<ColumnNoise>, fallback_reason: Option<String>) -> PrivacyReport {
        let mechanism = columns
            .iter()
            .map(|c| c.mechanism)
            .max()
            .unwrap_or(NoiseMechanism::Laplace);
        PrivacyReport {
            epsilon: self.config.epsilon,
            delta: self.config.delta,
            mechanism,
            degraded: mechanism != NoiseMechanism::Laplace,
            columns,
            fallback_reason,
            protected_at: Utc::now(),
        }
    }

    /// Calibrated path over the whole table; the first failing column aborts.
    ///
    /// Used by [`NoiseInjector::protect_strict`].
    fn laplace_columns(&self, table: &Table, rng: &mut StdRng) -> Result<NoisedColumns> {
        let mut columns = Vec::with_capacity(table.column_count());
        let mut details = Vec::new();

        for column in table.columns() {
            if !column.kind().is_numeric() {
                columns.push(Arc::clone(column));
                continue;
            }
            let (noised, detail) = self.laplace_column(column, rng)?;
            columns.push(Arc::new(noised));
            details.push(detail);
        }

        Ok((columns, details))
    }

    fn laplace_column(&self, column: &Column, rng: &mut StdRng) -> Result<(Column, ColumnNoise)> {
        let epsilon = self.config.epsilon;
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(SynthError::privacy(
                column.name(),
                format!("epsilon must be finite and positive, got {epsilon}"),
            ));
        }

        let values = column.numeric_values();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SynthError::privacy(
                column.name(),
                "column contains non-finite values",
            ));
        }
        let summary = NumericSummary::from_values(&values)
            .ok_or_else(|| SynthError::privacy(column.name(), "column has no numeric values"))?;

        let sensitivity = summary.range();
        let noise = LaplaceNoise::new(sensitivity / epsilon).ok_or_else(|| {
            SynthError::privacy(
                column.name(),
                format!("sensitivity {sensitivity} gives no usable noise scale"),
            )
        })?;

        let (lower, upper) = self.clip_bounds(&summary).ok_or_else(|| {
            SynthError::privacy(column.name(), "clip bounds are not finite")
        })?;

        let rounded = column.kind() == ColumnKind::Integer;
        let mut clipped_count = 0;
        let mut noised = Vec::with_capacity(column.len());

        for value in column.values() {
            let Some(x) = value.as_f64() else {
                noised.push(value.clone());
                continue;
            };
            let perturbed = x + noise.sample(rng);
            let clipped = perturbed.clamp(lower, upper);
            if clipped != perturbed {
                clipped_count += 1;
            }
            noised.push(if rounded {
                // Saturating cast; clip bounds keep the value near the data
                Value::Int(clipped.round() as i64)
            } else {
                Value::Float(clipped)
            });
        }

        debug!(
            column = column.name(),
            sensitivity,
            scale = noise.scale(),
            clipped_count,
            "Applied Laplace noise"
        );

        Ok((
            column.with_values(noised),
            ColumnNoise {
                column_name: column.name().to_string(),
                mechanism: NoiseMechanism::Laplace,
                sensitivity: Some(sensitivity),
                scale: noise.scale(),
                clipped_count,
                rounded,
            },
        ))
    }

    /// `[min * lower_factor, max * upper_factor]`, reordered when the
    /// factors invert the band (negative data).
    fn clip_bounds(&self, summary: &NumericSummary) -> Option<(f64, f64)> {
        let a = summary.min * self.config.clip_lower_factor;
        let b = summary.max * self.config.clip_upper_factor;
        (a.is_finite() && b.is_finite()).then(|| (a.min(b), a.max(b)))
    }

    /// Gaussian fallback for one column; on failure the column is shared
    /// unmodified.
    fn fallback_column(&self, column: &Arc<Column>, rng: &mut StdRng) -> (Arc<Column>, ColumnNoise) {
        match self.gaussian_column(column, rng) {
            Ok((noised, detail)) => (Arc::new(noised), detail),
            Err(e) => {
                warn!(
                    column = column.name(),
                    "Fallback noise failed, column left unmodified: {}", e
                );
                (Arc::clone(column), ColumnNoise::unmodified(column.name()))
            }
        }
    }

    /// Adds `Normal(0, fraction * stddev)` without clipping or rounding.
    ///
    /// The output cells are floats, so the column kind is re-inferred.
    fn gaussian_column(&self, column: &Column, rng: &mut StdRng) -> Result<(Column, ColumnNoise)> {
        let values = column.numeric_values();
        let (_, std_dev) = mean_and_std(&values);
        let scale = self.config.fallback_std_fraction * std_dev;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SynthError::privacy(
                column.name(),
                format!("fallback noise scale {scale} adds no usable noise"),
            ));
        }

        let normal = Normal::new(0.0, scale)
            .map_err(|e| SynthError::privacy(column.name(), format!("Gaussian noise: {e}")))?;

        let noised: Vec<Value> = column
            .values()
            .iter()
            .map(|value| match value.as_f64() {
                Some(x) => Value::Float(x + normal.sample(&mut *rng)),
                None => value.clone(),
            })
            .collect();

        Ok((
            Column::new(column.name(), noised),
            ColumnNoise {
                column_name: column.name().to_string(),
                mechanism: NoiseMechanism::Gaussian,
                sensitivity: None,
                scale,
                clipped_count: 0,
                rounded: false,
            },
        ))
    }
}

fn log_report(report: &PrivacyReport) {
    info!(
        epsilon = report.epsilon,
        delta = report.delta,
        mechanism = %report.mechanism,
        degraded = report.degraded,
        columns = report.columns.len(),
        unmodified = report.unmodified_columns().len(),
        "Privacy noise applied"
    );
}

/// Adds privacy noise with the given epsilon and default settings.
///
/// Always returns a table with the same column names, order and row count.
pub fn inject_privacy_noise(table: &Table, epsilon: f64) -> Table {
    NoiseInjector::new(PrivacyConfig::new().with_epsilon(epsilon))
        .protect(table)
        .table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injector(epsilon: f64) -> NoiseInjector {
        NoiseInjector::new(PrivacyConfig::new().with_epsilon(epsilon).with_seed(42))
    }

    fn people() -> Table {
        Table::new(vec![
            Column::from_values("age", vec![25_i64, 30, 35, 40, 45, 50]),
            Column::from_values("income", vec![41_000.5, 52_300.0, 61_250.25, 48_000.0, 75_500.0, 58_900.0]),
            Column::from_values("name", vec!["a", "b", "c", "d", "e", "f"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_laplace_preserves_shape() {
        let table = people();
        let protected = injector(1.0).protect(&table);

        assert_eq!(protected.table.column_names(), table.column_names());
        assert_eq!(protected.table.row_count(), table.row_count());
        assert!(!protected.report.degraded);
        assert_eq!(protected.report.mechanism, NoiseMechanism::Laplace);
        assert_eq!(protected.report.columns.len(), 2);
    }

    #[test]
    fn test_non_numeric_columns_are_shared() {
        let table = people();
        let protected = injector(1.0).protect(&table);

        assert!(Arc::ptr_eq(
            table.column("name").unwrap(),
            protected.table.column("name").unwrap()
        ));
        assert!(!Arc::ptr_eq(
            table.column("age").unwrap(),
            protected.table.column("age").unwrap()
        ));
    }

    #[test]
    fn test_integer_columns_stay_integer() {
        let protected = injector(0.5).protect(&people());
        let age = protected.table.column("age").unwrap();

        assert_eq!(age.kind(), ColumnKind::Integer);
        assert!(age.values().iter().all(|v| matches!(v, Value::Int(_))));
        assert!(protected.report.columns[0].rounded);
        assert!(!protected.report.columns[1].rounded);
    }

    #[test]
    fn test_values_are_clipped() {
        let protected = injector(0.01).protect(&people());
        let age = protected.table.column("age").unwrap();

        // [25 * 0.9, 50 * 1.1], then rounded
        for value in age.numeric_values() {
            assert!((22.0..=55.0).contains(&value), "{value} escaped the clip band");
        }
        assert!(protected.report.columns[0].clipped_count > 0);
    }

    #[test]
    fn test_clip_bounds_reordered_for_negative_data() {
        let table = Table::new(vec![Column::from_values(
            "delta",
            vec![-10.0, -8.0, -6.0, -4.0],
        )])
        .unwrap();

        let protected = injector(0.01).protect(&table);
        assert!(!protected.report.degraded);

        // min * 0.9 = -9.0 and max * 1.1 = -4.4
        for value in protected.table.column("delta").unwrap().numeric_values() {
            assert!((-9.0..=-4.4).contains(&value));
        }
    }

    #[test]
    fn test_scale_follows_epsilon() {
        let report = injector(2.0).protect(&people()).report;
        let age = &report.columns[0];

        assert_eq!(age.sensitivity, Some(25.0));
        assert_eq!(age.scale, 12.5);
    }

    #[test]
    fn test_nulls_pass_through() {
        let table = Table::new(vec![Column::new(
            "score",
            vec![Value::Int(10), Value::Null, Value::Int(20), Value::Int(30)],
        )])
        .unwrap();

        let protected = injector(1.0).protect(&table);
        assert!(protected.table.column("score").unwrap().values()[1].is_null());
    }

    #[test]
    fn test_zero_variance_uses_fallback() {
        let table = Table::new(vec![
            Column::from_values("constant", vec![5_i64, 5, 5, 5]),
            Column::from_values("varied", vec![1.0, 2.0, 3.0, 4.0]),
        ])
        .unwrap();

        let protected = injector(1.0).protect(&table);
        let report = &protected.report;

        assert!(report.degraded);
        assert!(report.fallback_reason.as_deref().is_some_and(|r| r.contains("constant")));
        assert_eq!(protected.table.column_names(), vec!["constant", "varied"]);
        assert_eq!(protected.table.row_count(), 4);

        // Zero standard deviation leaves nothing for the fallback to add
        assert_eq!(report.columns[0].mechanism, NoiseMechanism::Unmodified);
        assert_eq!(report.unmodified_columns(), vec!["constant"]);
        assert_eq!(report.mechanism, NoiseMechanism::Unmodified);
        assert!(Arc::ptr_eq(
            table.column("constant").unwrap(),
            protected.table.column("constant").unwrap()
        ));

        assert_eq!(report.columns[1].mechanism, NoiseMechanism::Laplace);
    }

    #[test]
    fn test_constant_column_does_not_downgrade_healthy_columns() {
        let table = Table::new(vec![
            Column::from_values("version", vec![1_i64; 6]),
            Column::from_values("age", vec![25_i64, 30, 35, 40, 45, 50]),
        ])
        .unwrap();

        let protected = NoiseInjector::new(PrivacyConfig::new().with_epsilon(1.0).with_seed(3))
            .protect(&table);

        let age = protected.table.column("age").unwrap();
        assert_eq!(age.kind(), ColumnKind::Integer);
        assert!(age.values().iter().all(|v| matches!(v, Value::Int(_))));

        let age_noise = &protected.report.columns[1];
        assert_eq!(age_noise.column_name, "age");
        assert_eq!(age_noise.mechanism, NoiseMechanism::Laplace);
        assert_eq!(age_noise.scale, 25.0);
        assert!(age_noise.rounded);

        assert_eq!(protected.report.unmodified_columns(), vec!["version"]);
        assert_eq!(
            protected.table.column("version").unwrap().values(),
            vec![Value::Int(1); 6].as_slice()
        );
    }

    #[test]
    fn test_invalid_epsilon_uses_fallback() {
        for epsilon in [0.0, -1.0, f64::NAN] {
            let protected = injector(epsilon).protect(&people());
            let report = &protected.report;

            assert!(report.degraded);
            assert_eq!(report.mechanism, NoiseMechanism::Gaussian);
            assert!(report
                .columns
                .iter()
                .all(|c| c.mechanism == NoiseMechanism::Gaussian && c.scale > 0.0));
            assert_eq!(protected.table.row_count(), 6);
            // Fallback cells are floats, so the kind is re-inferred
            assert_eq!(protected.table.column("age").unwrap().kind(), ColumnKind::Float);
        }
    }

    #[test]
    fn test_non_finite_values_leave_column_unmodified() {
        let table = Table::new(vec![Column::from_values(
            "reading",
            vec![1.0, f64::INFINITY, 3.0],
        )])
        .unwrap();

        let protected = injector(1.0).protect(&table);

        assert!(protected.report.degraded);
        assert_eq!(protected.report.unmodified_columns(), vec!["reading"]);
        assert!(Arc::ptr_eq(
            table.column("reading").unwrap(),
            protected.table.column("reading").unwrap()
        ));
    }

    #[test]
    fn test_protect_strict_errors_instead_of_falling_back() {
        let table = Table::new(vec![Column::from_values("constant", vec![1_i64, 1, 1])]).unwrap();

        assert!(matches!(
            injector(1.0).protect_strict(&table),
            Err(SynthError::Privacy { .. })
        ));
        assert!(matches!(
            injector(-1.0).protect_strict(&people()),
            Err(SynthError::Configuration { .. })
        ));
        assert!(injector(1.0).protect_strict(&people()).is_ok());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = injector(1.0).protect(&people());
        let b = injector(1.0).protect(&people());
        assert_eq!(
            a.table.column("income").unwrap().values(),
            b.table.column("income").unwrap().values()
        );
    }

    #[test]
    fn test_table_without_numeric_columns() {
        let table = Table::new(vec![Column::from_values("name", vec!["a", "b"])]).unwrap();
        let protected = injector(1.0).protect(&table);

        assert!(!protected.report.degraded);
        assert!(protected.report.columns.is_empty());
        assert!(Arc::ptr_eq(&table.columns()[0], &protected.table.columns()[0]));
    }

    #[test]
    fn test_inject_privacy_noise() {
        let table = people();
        let noised = inject_privacy_noise(&table, 1.0);
        assert_eq!(noised.column_names(), table.column_names());
        assert_eq!(noised.row_count(), table.row_count());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let table = people();
        let before: Vec<Value> = table.column("income").unwrap().values().to_vec();
        let _ = injector(1.0).protect(&table);
        assert_eq!(table.column("income").unwrap().values(), before.as_slice());
    }
}
