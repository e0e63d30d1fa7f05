//! Core optimizer types shared by the descent and ascent loops.
//!
//! Both loops run for a fixed iteration budget with a fixed step size. The
//! types here describe that budget ([`StoppingCriterion`]), the per-iteration
//! state handed to callbacks ([`IterationState`]) and the outcome of a run
//! ([`OptimizationResult`]).
//!
//! # Example
//!
//! ```rust
//! use spca_core::optimizer::StoppingCriterion;
//!
//! let criterion = StoppingCriterion::new()
//!     .with_max_iterations(10_000)
//!     .with_log_interval(1_000);
//! assert_eq!(criterion.max_iterations, 10_000);
//! ```

use crate::types::{DVector, Scalar};
use std::time::Duration;

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult<T: Scalar> {
    /// The final flat parameter vector
    pub point: DVector<T>,

    /// The objective value at the final point
    pub value: T,

    /// Objective value recorded at the start of every iteration, before the update
    pub value_history: Vec<T>,

    /// Norm of the last gradient that was applied
    pub gradient_norm: Option<T>,

    /// Number of updates performed
    pub iterations: usize,

    /// Total optimization time
    pub duration: Duration,

    /// Reason for termination
    pub termination_reason: TerminationReason,
}

impl<T: Scalar> OptimizationResult<T> {
    /// Creates a new optimization result.
    pub fn new(
        point: DVector<T>,
        value: T,
        iterations: usize,
        duration: Duration,
        termination_reason: TerminationReason,
    ) -> Self {
        Self {
            point,
            value,
            value_history: Vec::new(),
            gradient_norm: None,
            iterations,
            duration,
            termination_reason,
        }
    }

    /// Attaches the per-iteration objective history.
    pub fn with_value_history(mut self, history: Vec<T>) -> Self {
        self.value_history = history;
        self
    }

    /// Sets the norm of the last applied gradient.
    pub fn with_gradient_norm(mut self, norm: T) -> Self {
        self.gradient_norm = Some(norm);
        self
    }

    /// Objective value before the first update, if any update ran.
    pub fn initial_value(&self) -> Option<T> {
        self.value_history.first().copied()
    }

    /// Whether the full iteration budget was consumed.
    pub fn completed(&self) -> bool {
        self.termination_reason == TerminationReason::MaxIterations
    }
}

/// Reasons for optimization termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Iteration budget exhausted
    MaxIterations,
    /// The objective became NaN or infinite
    NumericalError,
    /// A callback asked to stop early
    CallbackRequest,
}

/// Fixed iteration budget and logging cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoppingCriterion {
    /// Number of updates to perform
    pub max_iterations: usize,

    /// Emit a progress line every this many iterations (0 disables)
    pub log_interval: usize,
}

impl Default for StoppingCriterion {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            log_interval: 100,
        }
    }
}

impl StoppingCriterion {
    /// Creates a new stopping criterion with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of iterations.
    pub fn with_max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Sets the progress logging interval.
    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval;
        self
    }

    /// Whether iteration `iteration` should emit a progress line.
    pub fn should_log(&self, iteration: usize) -> bool {
        self.log_interval != 0 && iteration % self.log_interval == 0
    }
}

/// Snapshot handed to callbacks after each update.
#[derive(Debug, Clone)]
pub struct IterationState<'a, T: Scalar> {
    /// Zero-based index of the iteration that just finished
    pub iteration: usize,

    /// Point after the update
    pub point: &'a DVector<T>,

    /// Objective value at the point the update started from
    pub value: T,

    /// Norm of the applied gradient
    pub gradient_norm: T,
}
