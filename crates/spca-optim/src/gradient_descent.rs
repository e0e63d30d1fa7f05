//! Fixed-step gradient descent.
//!
//! This is the training loop shared by every factorization objective. Each
//! iteration performs
//!
//! 1. a forward pass and closed-form gradient at the current point,
//! 2. the update `x ← x − step_size · ∇f(x)`,
//! 3. the callback hook (metric recording, early stopping).
//!
//! There is no line search and no convergence test: the loop runs for the
//! configured number of epochs unless the loss stops being finite or a
//! callback asks to stop.

use log::{info, warn};
use num_traits::Float;
use spca_core::{
    callback::OptimizationCallback,
    cost_function::CostFunction,
    error::{OptimizerError, OptimizerResult},
    optimizer::{IterationState, OptimizationResult, StoppingCriterion, TerminationReason},
    types::{DVector, Scalar},
};
use std::time::Instant;

/// Configuration for the gradient descent optimizer.
#[derive(Debug, Clone)]
pub struct GradientDescentConfig<T: Scalar> {
    /// Constant step size
    pub step_size: T,
}

impl<T: Scalar> Default for GradientDescentConfig<T> {
    fn default() -> Self {
        Self {
            step_size: <T as Scalar>::from_f64(1e-4),
        }
    }
}

impl<T: Scalar> GradientDescentConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the constant step size.
    pub fn with_step_size(mut self, step_size: T) -> Self {
        self.step_size = step_size;
        self
    }

    /// Rejects non-positive or non-finite step sizes.
    pub fn validate(&self) -> OptimizerResult<()> {
        validate_step_size(self.step_size)
    }
}

pub(crate) fn validate_step_size<T: Scalar>(step_size: T) -> OptimizerResult<()> {
    if !(step_size > T::zero()) || !<T as Float>::is_finite(step_size) {
        return Err(OptimizerError::invalid_configuration(
            "step size must be positive and finite",
            "step_size",
            step_size.to_string(),
        ));
    }
    Ok(())
}

/// Plain gradient descent with a constant step size.
///
/// # Examples
///
/// ```rust
/// use spca_core::{
///     callback::NoOpCallback, cost_function::QuadraticCost, optimizer::StoppingCriterion,
///     types::DVector,
/// };
/// use spca_optim::{GradientDescent, GradientDescentConfig};
///
/// let cost = QuadraticCost::new(DVector::from_vec(vec![1.0, -1.0]));
/// let mut optimizer = GradientDescent::new(GradientDescentConfig::new().with_step_size(0.1));
/// let criterion = StoppingCriterion::new().with_max_iterations(200).with_log_interval(0);
///
/// let result = optimizer
///     .optimize(&cost, &DVector::zeros(2), &criterion, &mut NoOpCallback)
///     .unwrap();
/// assert!(result.value < 1e-8);
/// ```
#[derive(Debug, Clone)]
pub struct GradientDescent<T: Scalar> {
    config: GradientDescentConfig<T>,
}

impl<T: Scalar> GradientDescent<T> {
    /// Creates a new optimizer with the given configuration.
    pub fn new(config: GradientDescentConfig<T>) -> Self {
        Self { config }
    }

    /// Creates an optimizer with a constant step size.
    pub fn with_step_size(step_size: T) -> Self {
        Self::new(GradientDescentConfig::new().with_step_size(step_size))
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &GradientDescentConfig<T> {
        &self.config
    }

    /// Human-readable name of the algorithm.
    pub fn name(&self) -> &str {
        "Gradient Descent"
    }

    /// Minimizes `cost_fn` starting from `initial_point`.
    ///
    /// The returned history holds the loss at the start of every epoch,
    /// i.e. before that epoch's update, so `value_history[0]` is the loss
    /// at the initial point.
    pub fn optimize<C, B>(
        &mut self,
        cost_fn: &C,
        initial_point: &DVector<T>,
        criterion: &StoppingCriterion,
        callback: &mut B,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        C: CostFunction<T> + ?Sized,
        B: OptimizationCallback<T> + ?Sized,
    {
        self.config.validate()?;
        cost_fn.layout().validate(initial_point)?;

        let start_time = Instant::now();
        let step_size = self.config.step_size;
        let mut point = initial_point.clone();
        let mut history = Vec::with_capacity(criterion.max_iterations);
        let mut gradient_norm = None;
        let mut termination = TerminationReason::MaxIterations;

        callback.on_optimization_start()?;

        for epoch in 0..criterion.max_iterations {
            let (loss, gradient) = cost_fn.cost_and_gradient(&point)?;

            if !<T as Float>::is_finite(loss) {
                warn!("Epoch {}: loss = {}, stopping", epoch, loss);
                termination = TerminationReason::NumericalError;
                break;
            }
            if criterion.should_log(epoch) {
                info!("Epoch {}: loss = {}", epoch, loss);
            }
            history.push(loss);

            // x ← x − η ∇f(x)
            point.axpy(-step_size, &gradient, T::one());

            let norm = gradient.norm();
            gradient_norm = Some(norm);

            let state = IterationState {
                iteration: epoch,
                point: &point,
                value: loss,
                gradient_norm: norm,
            };
            if !callback.on_iteration_end(&state)? {
                termination = TerminationReason::CallbackRequest;
                break;
            }
        }

        let iterations = history.len();
        let value = cost_fn.cost(&point)?;
        callback.on_optimization_end(iterations, value)?;

        let mut result = OptimizationResult::new(
            point,
            value,
            iterations,
            start_time.elapsed(),
            termination,
        )
        .with_value_history(history);
        if let Some(norm) = gradient_norm {
            result = result.with_gradient_norm(norm);
        }
        Ok(result)
    }
}
