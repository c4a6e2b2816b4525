//! Stochastic axis placeholders: parameterized random generators.
//!
//! Each distribution owns a seeded ChaCha8 RNG, so a tree containing
//! distributions replays identical draws for identical seeds. Gaussian
//! sampling uses the Box-Muller transform and Gamma sampling uses the
//! Marsaglia-Tsang method, both over the raw RNG; this keeps the
//! dependency surface to `rand` + `rand_chacha`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A stochastic generator usable as one sampling axis of a parameter
/// space.
///
/// Equality compares distribution parameters only, never RNG state:
/// two generators with the same shape are the same axis even after one
/// of them has drawn samples.
#[derive(Clone, Debug, PartialEq)]
pub enum Distribution {
    /// Gaussian with mean and standard deviation.
    Normal(NormalDist),
    /// Uniform over the half-open interval `[min, max)`.
    Uniform(UniformDist),
    /// Gamma with shape and scale.
    Gamma(GammaDist),
}

impl Distribution {
    /// Draw `n` independent samples, advancing the owned RNG.
    pub fn next(&mut self, n: usize) -> Vec<f64> {
        match self {
            Self::Normal(d) => d.next(n),
            Self::Uniform(d) => d.next(n),
            Self::Gamma(d) => d.next(n),
        }
    }

    /// Re-parameterize from the moments of a raw sample set.
    pub fn from_stats(&mut self, samples: &[f64]) {
        match self {
            Self::Normal(d) => d.from_stats(samples),
            Self::Uniform(d) => d.from_stats(samples),
            Self::Gamma(d) => d.from_stats(samples),
        }
    }

    /// The distribution mean implied by the current parameters.
    pub fn mean(&self) -> f64 {
        match self {
            Self::Normal(d) => d.mean,
            Self::Uniform(d) => (d.min + d.max) / 2.0,
            Self::Gamma(d) => d.shape * d.scale,
        }
    }

    /// The standard deviation implied by the current parameters.
    pub fn std(&self) -> f64 {
        match self {
            Self::Normal(d) => d.std,
            Self::Uniform(d) => (d.max - d.min) / 12f64.sqrt(),
            Self::Gamma(d) => d.shape.sqrt() * d.scale,
        }
    }
}

/// Gaussian distribution, `N(mean, std^2)`.
#[derive(Clone, Debug)]
pub struct NormalDist {
    /// Distribution mean.
    pub mean: f64,
    /// Standard deviation.
    pub std: f64,
    rng: ChaCha8Rng,
}

impl NormalDist {
    /// Create a Gaussian generator seeded from the host RNG.
    pub fn new(mean: f64, std: f64) -> Self {
        Self::with_seed(mean, std, rand::rng().random())
    }

    /// Create a Gaussian generator with a fixed seed.
    pub fn with_seed(mean: f64, std: f64, seed: u64) -> Self {
        Self {
            mean,
            std,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fit mean and (population) standard deviation from raw samples.
    pub fn from_stats(&mut self, samples: &[f64]) {
        let (mean, std) = moments(samples);
        self.mean = mean;
        self.std = std;
    }

    /// Draw `n` independent samples.
    pub fn next(&mut self, n: usize) -> Vec<f64> {
        (0..n)
            .map(|_| self.mean + self.std * standard_normal(&mut self.rng))
            .collect()
    }
}

impl Default for NormalDist {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl PartialEq for NormalDist {
    fn eq(&self, other: &Self) -> bool {
        self.mean == other.mean && self.std == other.std
    }
}

/// Uniform distribution over `[min, max)`.
#[derive(Clone, Debug)]
pub struct UniformDist {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
    rng: ChaCha8Rng,
}

impl UniformDist {
    /// Create a uniform generator seeded from the host RNG.
    pub fn new(min: f64, max: f64) -> Self {
        Self::with_seed(min, max, rand::rng().random())
    }

    /// Create a uniform generator with a fixed seed.
    pub fn with_seed(min: f64, max: f64, seed: u64) -> Self {
        Self {
            min,
            max,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Fit the support from raw samples: `[min(samples), max(samples))`.
    pub fn from_stats(&mut self, samples: &[f64]) {
        self.min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        self.max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    }

    /// Draw `n` independent samples.
    pub fn next(&mut self, n: usize) -> Vec<f64> {
        (0..n)
            .map(|_| self.min + (self.max - self.min) * self.rng.random::<f64>())
            .collect()
    }
}

impl Default for UniformDist {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl PartialEq for UniformDist {
    fn eq(&self, other: &Self) -> bool {
        self.min == other.min && self.max == other.max
    }
}

/// Gamma distribution with shape `k` and scale `theta`.
#[derive(Clone, Debug)]
pub struct GammaDist {
    /// Shape parameter, `k > 0`.
    pub shape: f64,
    /// Scale parameter, `theta > 0`.
    pub scale: f64,
    rng: ChaCha8Rng,
}

impl GammaDist {
    /// Create a gamma generator from shape and scale, seeded from the
    /// host RNG.
    pub fn new(shape: f64, scale: f64) -> Self {
        Self::with_seed(shape, scale, rand::rng().random())
    }

    /// Create a gamma generator with a fixed seed.
    pub fn with_seed(shape: f64, scale: f64, seed: u64) -> Self {
        Self {
            shape,
            scale,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create a gamma generator from its first two moments:
    /// `shape = (mean/std)^2`, `scale = std^2/mean`.
    pub fn from_mean_std(mean: f64, std: f64) -> Self {
        Self::new((mean / std).powi(2), std.powi(2) / mean)
    }

    /// Fit shape and scale from the moments of raw samples.
    pub fn from_stats(&mut self, samples: &[f64]) {
        let (mean, std) = moments(samples);
        self.shape = (mean / std).powi(2);
        self.scale = std.powi(2) / mean;
    }

    /// Draw `n` independent samples.
    pub fn next(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.sample()).collect()
    }

    /// One Marsaglia-Tsang draw, scaled by theta.
    fn sample(&mut self) -> f64 {
        // Shape < 1 is boosted to shape + 1 and corrected by u^(1/k).
        let boost = if self.shape < 1.0 {
            let u: f64 = self.rng.random();
            u.powf(1.0 / self.shape)
        } else {
            1.0
        };
        let k = if self.shape < 1.0 {
            self.shape + 1.0
        } else {
            self.shape
        };

        let d = k - 1.0 / 3.0;
        let c = 1.0 / (3.0 * d.sqrt());
        loop {
            let x = standard_normal(&mut self.rng);
            let v = (1.0 + c * x).powi(3);
            if v <= 0.0 {
                continue;
            }
            let u: f64 = self.rng.random();
            if u.ln() < 0.5 * x * x + d - d * v + d * v.ln() {
                return boost * d * v * self.scale;
            }
        }
    }
}

impl Default for GammaDist {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl PartialEq for GammaDist {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.scale == other.scale
    }
}

/// Generate a standard normal sample using the Box-Muller transform.
fn standard_normal(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Mean and population standard deviation of a sample set.
fn moments(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_from_stats_matches_sample_moments() {
        let mut d = NormalDist::default();
        d.from_stats(&[1.0, 2.0, 3.0]);
        assert_eq!(d.mean, 2.0);
        let expected_std = (2.0f64 / 3.0).sqrt();
        assert!((d.std - expected_std).abs() < 1e-12);
    }

    #[test]
    fn gamma_from_mean_std_round_trips_moments() {
        let d = GammaDist::from_mean_std(2.0, 0.5);
        let dist = Distribution::Gamma(d);
        assert!((dist.mean() - 2.0).abs() < 1e-12);
        assert!((dist.std() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn uniform_samples_stay_in_fitted_support() {
        let mut d = UniformDist::with_seed(0.0, 1.0, 7);
        let samples: Vec<f64> = (-5..5).map(f64::from).collect();
        d.from_stats(&samples);
        assert_eq!(d.min, -5.0);
        assert_eq!(d.max, 4.0);
        let out = d.next(100);
        assert_eq!(out.len(), 100);
        assert!(out.iter().all(|&x| (-5.0..4.0).contains(&x)));
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let mut a = NormalDist::with_seed(0.0, 1.0, 99);
        let mut b = NormalDist::with_seed(0.0, 1.0, 99);
        assert_eq!(a.next(16), b.next(16));
    }

    #[test]
    fn gamma_sampling_tracks_parameters() {
        let mut d = GammaDist::with_seed(16.0, 0.125, 3);
        let draws = d.next(4000);
        assert!(draws.iter().all(|&x| x > 0.0));
        let (mean, std) = moments(&draws);
        // mean = 2.0, std = 0.5; loose tolerance for 4000 draws
        assert!((mean - 2.0).abs() < 0.05, "mean drifted: {mean}");
        assert!((std - 0.5).abs() < 0.05, "std drifted: {std}");
    }

    #[test]
    fn gamma_shape_below_one_is_supported() {
        let mut d = GammaDist::with_seed(0.5, 2.0, 11);
        let draws = d.next(2000);
        assert!(draws.iter().all(|&x| x > 0.0));
        let (mean, _) = moments(&draws);
        assert!((mean - 1.0).abs() < 0.15, "mean drifted: {mean}");
    }

    #[test]
    fn equality_ignores_rng_state() {
        let mut a = UniformDist::with_seed(0.0, 1.0, 1);
        let b = UniformDist::with_seed(0.0, 1.0, 2);
        a.next(10);
        assert_eq!(a, b);
    }
}
