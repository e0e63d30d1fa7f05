//! Fixed-step optimizers for sparse component recovery.
//!
//! # Available Optimizers
//!
//! - **Gradient Descent**: constant step, fixed epoch budget; the shared
//!   training loop of all factorization objectives
//! - **Projected Gradient Ascent**: constant step followed by a projection
//!   onto the constraint set; the constrained power iteration
//!
//! # Examples
//!
//! ```rust
//! use spca_core::{callback::NoOpCallback, cost_function::CostFunction, optimizer::StoppingCriterion};
//! use spca_models::{FactorizationObjective, FactorizationVariant, SyntheticConfig};
//! use spca_optim::GradientDescent;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let problem = SyntheticConfig::new(10, 8).generate::<f64>(0).unwrap();
//! let objective =
//!     FactorizationObjective::new(&problem.data, FactorizationVariant::DirectProduct).unwrap();
//! let start = objective.layout().random_point(&mut StdRng::seed_from_u64(1));
//!
//! let mut optimizer = GradientDescent::with_step_size(1e-3);
//! let criterion = StoppingCriterion::new().with_max_iterations(100).with_log_interval(0);
//! let result = optimizer.optimize(&objective, &start, &criterion, &mut NoOpCallback).unwrap();
//! assert_eq!(result.iterations, 100);
//! ```

pub mod gradient_descent;
pub mod projected_ascent;

pub use gradient_descent::{GradientDescent, GradientDescentConfig};
pub use projected_ascent::{ProjectedAscentConfig, ProjectedGradientAscent};

// Re-export commonly used items from core
pub use spca_core::optimizer::{OptimizationResult, StoppingCriterion, TerminationReason};
