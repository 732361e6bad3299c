//! Laplace noise distribution.

use rand::Rng;
use rand_distr::{Distribution, Exp1};

/// Zero-centred Laplace distribution with scale `b`.
///
/// Sampled as `b * (E1 - E2)` with `E1`, `E2` independent standard
/// exponential draws. Variance is `2 * b^2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaplaceNoise {
    scale: f64,
}

impl LaplaceNoise {
    /// Creates the distribution, or `None` unless `scale` is finite and
    /// positive.
    pub fn new(scale: f64) -> Option<Self> {
        (scale.is_finite() && scale > 0.0).then_some(Self { scale })
    }

    /// Scale parameter `b`.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Distribution<f64> for LaplaceNoise {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let a: f64 = Exp1.sample(rng);
        let b: f64 = Exp1.sample(rng);
        self.scale * (a - b)
    }
}
