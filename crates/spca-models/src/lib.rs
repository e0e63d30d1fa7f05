//! Objectives, synthetic data and recovery metrics for sparse PCA.
//!
//! # Available Models
//!
//! - **Synthetic data**: planted sparse direction in a spiked covariance
//! - **Factorization objectives**: four rank-one Hadamard factorizations of `X`
//! - **Hadamard Rayleigh quotient**: `(u⊙v)ᵀ S (u⊙v)` on `‖u⊙v‖ = 1`
//! - **Metrics**: sine error and L1 norm of the recovered component
//!
//! # Example
//!
//! ```rust
//! use spca_models::{FactorizationObjective, FactorizationVariant, SyntheticConfig};
//! use spca_core::cost_function::CostFunction;
//!
//! let problem = SyntheticConfig::new(20, 10).generate::<f64>(42).unwrap();
//! let objective =
//!     FactorizationObjective::new(&problem.data, FactorizationVariant::DirectProduct).unwrap();
//! assert_eq!(objective.layout().total_len(), 10 + 20 + 20);
//! ```

pub mod data;
pub mod factorization;
pub mod metrics;
pub mod rayleigh;

pub use data::{SyntheticConfig, SyntheticData};
pub use factorization::{
    FactorizationObjective, FactorizationVariant, HadamardParametrization, LoadingFactor,
};
pub use metrics::{cosine_similarity, l1_norm, sine_error, Recovery, RecoveryTrace, RecoveryTracker};
pub use rayleigh::HadamardRayleighQuotient;
