//! # spca
//!
//! Sparse principal component recovery through Hadamard-factorized gradient
//! descent.
//!
//! A synthetic data matrix `X = Z S` is generated from a spiked covariance
//! `S = alpha * s sᵀ + beta * I` whose leading direction `s` is sparse. Five
//! methods then try to recover `s` from a random start:
//!
//! - gradient descent on four rank-one factorizations of `X`, where the
//!   loading is `v⊙w` or `v⊙v − w⊙w` and the scores are `u` or `X u`,
//! - projected gradient ascent on `(u⊙v)ᵀ S (u⊙v)` with `‖u⊙v‖ = 1`.
//!
//! Every iteration records the sine of the angle between the recovered
//! vector and `s`, and the recovered vector's L1 norm.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spca::prelude::*;
//!
//! let config = ExperimentConfig::new().with_methods(vec![Method::DirectProduct]);
//! let experiment = Experiment::new(config).unwrap();
//! for report in experiment.run().unwrap() {
//!     println!("{}", report);
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - `spca-core`: scalar trait, errors, parameter layout, optimizer types
//! - `spca-models`: synthetic data, objectives and recovery metrics
//! - `spca-optim`: gradient descent and projected gradient ascent
//! - this crate: experiment configuration, the sweep runner and plotting

pub mod config;
pub mod error;
pub mod experiment;
pub mod plot;

pub use nalgebra;

// Re-export core functionality
pub use spca_core::{
    callback, constraint, cost_function, layout, optimizer, types, ModelError, OptimizerError,
};

// Re-export models
pub use spca_models::{
    cosine_similarity, l1_norm, sine_error, FactorizationObjective, FactorizationVariant,
    HadamardParametrization, HadamardRayleighQuotient, LoadingFactor, Recovery, RecoveryTrace,
    RecoveryTracker, SyntheticConfig, SyntheticData,
};

// Re-export optimizers
pub use spca_optim::{
    GradientDescent, GradientDescentConfig, ProjectedAscentConfig, ProjectedGradientAscent,
};

pub use config::{ExperimentConfig, Method, MethodSettings};
pub use error::{ExperimentError, Result};
pub use experiment::{Experiment, MethodReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ExperimentConfig, Method, MethodSettings};
    pub use crate::error::{ExperimentError, Result};
    pub use crate::experiment::{Experiment, MethodReport};
    pub use crate::plot::plot_report;
    pub use spca_core::prelude::*;
    pub use spca_models::{
        FactorizationObjective, FactorizationVariant, HadamardRayleighQuotient, RecoveryTrace,
        RecoveryTracker, SyntheticConfig, SyntheticData,
    };
    pub use spca_optim::{GradientDescent, ProjectedGradientAscent};
}
