//! Synthetic data with a planted sparse principal direction.
//!
//! The generator builds
//!
//! - a signal vector `s` whose first `floor(sparsity * p)` entries are one,
//! - the covariance `S = alpha * s sᵀ + beta * I`,
//! - a noise matrix `Z` (n × p) with i.i.d. standard normal entries,
//! - the observed data `X = Z S`.
//!
//! Only `Z` is random; everything else is a deterministic function of the
//! configuration.

use nalgebra::{DMatrix, DVector};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;
use spca_core::{
    error::{ModelError, Result},
    types::Scalar,
};

/// Parameters of the synthetic problem.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    /// Number of features (p)
    pub features: usize,
    /// Number of samples (n)
    pub samples: usize,
    /// Weight of the planted rank-one signal
    pub alpha: f64,
    /// Weight of the isotropic part
    pub beta: f64,
    /// Fraction of features in the support of the signal
    pub sparsity: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            features: 50,
            samples: 30,
            alpha: 0.8,
            beta: 0.2,
            sparsity: 0.3,
        }
    }
}

impl SyntheticConfig {
    /// Creates a configuration with the default mix and sparsity.
    pub fn new(features: usize, samples: usize) -> Self {
        Self {
            features,
            samples,
            ..Self::default()
        }
    }

    /// Sets the signal and noise weights.
    pub fn with_mix(mut self, alpha: f64, beta: f64) -> Self {
        self.alpha = alpha;
        self.beta = beta;
        self
    }

    /// Sets the support fraction.
    pub fn with_sparsity(mut self, sparsity: f64) -> Self {
        self.sparsity = sparsity;
        self
    }

    /// Number of active (one) entries in the signal vector.
    pub fn support_size(&self) -> usize {
        let active = (self.features as f64 * self.sparsity).floor();
        (active.max(0.0) as usize).min(self.features)
    }

    /// Checks dimensions and mixing weights.
    pub fn validate(&self) -> Result<()> {
        if self.features == 0 {
            return Err(ModelError::invalid_parameter("feature count must be positive"));
        }
        if self.samples == 0 {
            return Err(ModelError::invalid_parameter("sample count must be positive"));
        }
        if !(0.0..=1.0).contains(&self.sparsity) {
            return Err(ModelError::invalid_parameter(format!(
                "sparsity must lie in [0, 1], got {}",
                self.sparsity
            )));
        }
        if !self.alpha.is_finite() || !self.beta.is_finite() {
            return Err(ModelError::invalid_parameter(format!(
                "alpha and beta must be finite, got alpha = {}, beta = {}",
                self.alpha, self.beta
            )));
        }
        Ok(())
    }

    /// Generates the problem from a seed.
    pub fn generate<T: Scalar>(&self, seed: u64) -> Result<SyntheticData<T>> {
        self.generate_with(&mut StdRng::seed_from_u64(seed))
    }

    /// Generates the problem drawing the noise from `rng`.
    pub fn generate_with<T: Scalar, R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SyntheticData<T>> {
        self.validate()?;

        let p = self.features;
        let n = self.samples;
        let active = self.support_size();

        let signal = DVector::from_fn(p, |i, _| if i < active { T::one() } else { T::zero() });

        let alpha = <T as Scalar>::from_f64(self.alpha);
        let beta = <T as Scalar>::from_f64(self.beta);
        let covariance = &signal * signal.transpose() * alpha + DMatrix::identity(p, p) * beta;

        let noise = DMatrix::from_fn(n, p, |_, _| {
            let val: f64 = rng.sample(StandardNormal);
            <T as Scalar>::from_f64(val)
        });
        let data = &noise * &covariance;

        log::debug!(
            "Generated synthetic problem: p = {}, n = {}, support = {}",
            p,
            n,
            active
        );

        Ok(SyntheticData {
            signal,
            covariance,
            noise,
            data,
        })
    }
}

/// The generated problem. Immutable for the whole experiment.
#[derive(Debug, Clone)]
pub struct SyntheticData<T: Scalar> {
    /// Ground-truth sparse indicator vector (length p)
    pub signal: DVector<T>,
    /// Covariance `alpha * s sᵀ + beta * I` (p × p)
    pub covariance: DMatrix<T>,
    /// Standard normal noise (n × p)
    pub noise: DMatrix<T>,
    /// Observed data `Z S` (n × p)
    pub data: DMatrix<T>,
}

impl<T: Scalar> SyntheticData<T> {
    /// Number of features (p).
    pub fn features(&self) -> usize {
        self.data.ncols()
    }

    /// Number of samples (n).
    pub fn samples(&self) -> usize {
        self.data.nrows()
    }

    /// Indices where the signal is non-zero.
    pub fn support(&self) -> Vec<usize> {
        self.signal
            .iter()
            .enumerate()
            .filter(|(_, &x)| x != T::zero())
            .map(|(i, _)| i)
            .collect()
    }
}
