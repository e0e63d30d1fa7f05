//! Experiment configuration.
//!
//! An [`ExperimentConfig`] describes one sweep: the synthetic problem, the
//! methods to run and their step size, epoch budget and log interval. It can
//! be built in code, loaded from JSON, or assembled by the `spca-sweep`
//! command line. Every field has a default, so a JSON file only needs the
//! values it changes:
//!
//! ```json
//! {
//!   "features": 100,
//!   "methods": ["direct_product", "power_iteration"],
//!   "overrides": { "direct_product": { "step_size": 5e-5, "epochs": 20000, "log_every": 2000 } }
//! }
//! ```

use crate::error::{ExperimentError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use spca_core::error::ModelError;
use spca_models::{FactorizationVariant, SyntheticConfig};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A recovery method of the sweep.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Method {
    /// Gradient descent on `‖X − u (v⊙w)ᵀ‖²`
    DirectProduct,
    /// Gradient descent on `‖X − X u (v⊙w)ᵀ‖²`
    ProjectedProduct,
    /// Gradient descent on `‖X − u (v⊙v − w⊙w)ᵀ‖²`
    DirectDifferenceOfSquares,
    /// Gradient descent on `‖X − X u (v⊙v − w⊙w)ᵀ‖²`
    ProjectedDifferenceOfSquares,
    /// Projected ascent on `(u⊙v)ᵀ S (u⊙v)` with `‖u⊙v‖ = 1`
    PowerIteration,
}

impl Method {
    /// All methods in sweep order.
    pub const ALL: [Method; 5] = [
        Self::DirectProduct,
        Self::ProjectedProduct,
        Self::DirectDifferenceOfSquares,
        Self::ProjectedDifferenceOfSquares,
        Self::PowerIteration,
    ];

    /// The factorization objective behind this method, if any.
    pub fn variant(&self) -> Option<FactorizationVariant> {
        match self {
            Self::DirectProduct => Some(FactorizationVariant::DirectProduct),
            Self::ProjectedProduct => Some(FactorizationVariant::ProjectedProduct),
            Self::DirectDifferenceOfSquares => {
                Some(FactorizationVariant::DirectDifferenceOfSquares)
            }
            Self::ProjectedDifferenceOfSquares => {
                Some(FactorizationVariant::ProjectedDifferenceOfSquares)
            }
            Self::PowerIteration => None,
        }
    }

    /// Short name used in logs and plot file names.
    pub fn name(&self) -> &'static str {
        match self.variant() {
            Some(variant) => variant.name(),
            None => "power_iteration",
        }
    }

    /// Position in [`Method::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::DirectProduct => 0,
            Self::ProjectedProduct => 1,
            Self::DirectDifferenceOfSquares => 2,
            Self::ProjectedDifferenceOfSquares => 3,
            Self::PowerIteration => 4,
        }
    }

    /// Whether the method maximizes its objective.
    pub fn is_ascent(&self) -> bool {
        matches!(self, Self::PowerIteration)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Step size, iteration budget and log interval of one method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodSettings {
    /// Constant step size
    pub step_size: f64,
    /// Number of iterations
    pub epochs: usize,
    /// Log the objective every this many iterations (0 disables)
    pub log_every: usize,
}

impl MethodSettings {
    /// Default settings for `method`.
    ///
    /// The projected objectives multiply the data matrix in twice, so their
    /// gradients are larger and they get a smaller step with more epochs.
    pub fn defaults_for(method: Method) -> Self {
        match method {
            Method::DirectProduct | Method::DirectDifferenceOfSquares => Self {
                step_size: 1e-4,
                epochs: 10_000,
                log_every: 1_000,
            },
            Method::ProjectedProduct | Method::ProjectedDifferenceOfSquares => Self {
                step_size: 1e-6,
                epochs: 20_000,
                log_every: 1_000,
            },
            Method::PowerIteration => Self {
                step_size: 1e-2,
                epochs: 2_000,
                log_every: 100,
            },
        }
    }

    /// Rejects non-positive or non-finite step sizes.
    pub fn validate(&self) -> Result<()> {
        if !(self.step_size > 0.0) || !self.step_size.is_finite() {
            return Err(ModelError::invalid_parameter(format!(
                "step size must be positive and finite, got {}",
                self.step_size
            ))
            .into());
        }
        Ok(())
    }
}

/// Full description of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Number of features (p)
    pub features: usize,
    /// Number of samples (n)
    pub samples: usize,
    /// Weight of the planted signal in the covariance
    pub alpha: f64,
    /// Weight of the identity in the covariance
    pub beta: f64,
    /// Fraction of features in the support
    pub sparsity: f64,
    /// Seed for the data; method initializations derive from it
    pub seed: u64,
    /// Methods to run, in order
    pub methods: Vec<Method>,
    /// Per-method settings replacing the defaults
    pub overrides: BTreeMap<Method, MethodSettings>,
    /// Directory receiving the plots
    pub output_dir: PathBuf,
    /// Whether to draw plots at all
    pub plots: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        let synthetic = SyntheticConfig::default();
        Self {
            features: synthetic.features,
            samples: synthetic.samples,
            alpha: synthetic.alpha,
            beta: synthetic.beta,
            sparsity: synthetic.sparsity,
            seed: 0,
            methods: Method::ALL.to_vec(),
            overrides: BTreeMap::new(),
            output_dir: PathBuf::from("plots"),
            plots: true,
        }
    }
}

impl ExperimentConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(ExperimentError::from)
    }

    /// Sets the problem dimensions.
    pub fn with_dimensions(mut self, features: usize, samples: usize) -> Self {
        self.features = features;
        self.samples = samples;
        self
    }

    /// Sets the data seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Restricts the sweep to `methods`.
    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    /// Replaces the settings of one method.
    pub fn with_settings(mut self, method: Method, settings: MethodSettings) -> Self {
        self.overrides.insert(method, settings);
        self
    }

    /// Effective settings of `method`.
    pub fn settings(&self, method: Method) -> MethodSettings {
        self.overrides
            .get(&method)
            .copied()
            .unwrap_or_else(|| MethodSettings::defaults_for(method))
    }

    /// Seed of the random initialization of `method`.
    ///
    /// Each method gets its own stream, so running a subset of methods
    /// reproduces the same initializations as the full sweep.
    pub fn init_seed(&self, method: Method) -> u64 {
        self.seed.wrapping_add(1 + method.index() as u64)
    }

    /// The synthetic problem description.
    pub fn synthetic(&self) -> SyntheticConfig {
        SyntheticConfig::new(self.features, self.samples)
            .with_mix(self.alpha, self.beta)
            .with_sparsity(self.sparsity)
    }

    /// Checks the problem description and every selected method's settings.
    pub fn validate(&self) -> Result<()> {
        self.synthetic().validate()?;
        if self.methods.is_empty() {
            return Err(ModelError::invalid_parameter("no methods selected").into());
        }
        for &method in &self.methods {
            self.settings(method).validate()?;
        }
        Ok(())
    }
}
