//! Core traits and types for sparse principal component recovery.
//!
//! This crate provides the pieces shared by the objectives in `spca-models`
//! and the optimization loops in `spca-optim`.
//!
//! # Modules
//!
//! - [`callback`]: Hooks invoked after every iteration
//! - [`constraint`]: Projection onto a feasible set
//! - [`cost_function`]: Objective interface and derivative checking
//! - [`error`]: Error types for model evaluation and optimization
//! - [`layout`]: Named parameter blocks inside a flat vector
//! - [`optimizer`]: Iteration budget, iteration state and run results
//! - [`types`]: Scalar trait and matrix aliases

pub mod callback;
pub mod constraint;
pub mod cost_function;
pub mod error;
pub mod layout;
pub mod optimizer;
pub mod types;

// Re-export commonly used items at the crate root
pub use error::{ModelError, OptimizerError, OptimizerResult, Result};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use spca_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::callback::{CallbackPair, NoOpCallback, OptimizationCallback, TargetValueCallback};
    pub use crate::constraint::Projection;
    pub use crate::cost_function::{CostFunction, DerivativeChecker, GradientCheck, QuadraticCost};
    pub use crate::error::{ModelError, OptimizerError, OptimizerResult, Result};
    pub use crate::layout::{ParameterBlock, ParameterLayout};
    pub use crate::optimizer::{
        IterationState, OptimizationResult, StoppingCriterion, TerminationReason,
    };
    pub use crate::types::{DMatrix, DVector, Scalar};
}
