//! Projected gradient ascent (constrained power iteration).
//!
//! Maximizes an objective over a constraint set by alternating an
//! unconstrained ascent step with a projection back onto the set:
//!
//! ```text
//! x̃ = x + step_size · ∇f(x)
//! x ← P(x̃)
//! ```
//!
//! For the Hadamard Rayleigh quotient the gradient step updates `u` and `v`
//! simultaneously from the same point:
//!
//! ```text
//! u ← u + step_size · v⊙g,   v ← v + step_size · u⊙g,   g = (S + Sᵀ)(u⊙v)
//! ```
//!
//! where both right-hand sides use the pre-step `u` and `v`. Updating `v` from
//! the already stepped `u` would differ by a term of order `step_size²`. `P`
//! then rescales both factors so that `‖u⊙v‖ = 1`. The initial point is
//! projected before the first iteration, so every recorded iterate is
//! feasible. Callbacks observe the point after the step and the projection.

use crate::gradient_descent::validate_step_size;
use log::{info, warn};
use num_traits::Float;
use spca_core::{
    callback::OptimizationCallback,
    constraint::Projection,
    cost_function::CostFunction,
    error::{OptimizerError, OptimizerResult},
    optimizer::{IterationState, OptimizationResult, StoppingCriterion, TerminationReason},
    types::{DVector, Scalar},
};
use std::time::Instant;

/// Configuration for projected gradient ascent.
#[derive(Debug, Clone)]
pub struct ProjectedAscentConfig<T: Scalar> {
    /// Constant step size
    pub step_size: T,
}

impl<T: Scalar> Default for ProjectedAscentConfig<T> {
    fn default() -> Self {
        Self {
            step_size: <T as Scalar>::from_f64(1e-2),
        }
    }
}

impl<T: Scalar> ProjectedAscentConfig<T> {
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

/// Projected gradient ascent with a constant step size.
#[derive(Debug, Clone)]
pub struct ProjectedGradientAscent<T: Scalar> {
    config: ProjectedAscentConfig<T>,
}

impl<T: Scalar> ProjectedGradientAscent<T> {
    /// Creates a new optimizer with the given configuration.
    pub fn new(config: ProjectedAscentConfig<T>) -> Self {
        Self { config }
    }

    /// Creates an optimizer with a constant step size.
    pub fn with_step_size(step_size: T) -> Self {
        Self::new(ProjectedAscentConfig::new().with_step_size(step_size))
    }

    /// Returns the optimizer configuration.
    pub fn config(&self) -> &ProjectedAscentConfig<T> {
        &self.config
    }

    /// Human-readable name of the algorithm.
    pub fn name(&self) -> &str {
        "Projected Gradient Ascent"
    }

    /// Maximizes `objective` over its constraint set starting from `initial_point`.
    ///
    /// `value_history[i]` is the objective at the (feasible) point iteration
    /// `i` started from.
    pub fn maximize<C, B>(
        &mut self,
        objective: &C,
        initial_point: &DVector<T>,
        criterion: &StoppingCriterion,
        callback: &mut B,
    ) -> OptimizerResult<OptimizationResult<T>>
    where
        C: CostFunction<T> + Projection<T> + ?Sized,
        B: OptimizationCallback<T> + ?Sized,
    {
        self.config.validate()?;
        objective.layout().validate(initial_point)?;

        let start_time = Instant::now();
        let step_size = self.config.step_size;
        let mut point = objective
            .project(initial_point)
            .map_err(|err| OptimizerError::numerical_breakdown(0, err.to_string()))?;
        let mut history = Vec::with_capacity(criterion.max_iterations);
        let mut gradient_norm = None;
        let mut termination = TerminationReason::MaxIterations;

        callback.on_optimization_start()?;

        for iteration in 0..criterion.max_iterations {
            let (value, gradient) = objective.cost_and_gradient(&point)?;

            if !<T as Float>::is_finite(value) {
                warn!("Epoch {}: objective = {}, stopping", iteration, value);
                termination = TerminationReason::NumericalError;
                break;
            }
            if criterion.should_log(iteration) {
                info!("Epoch {}: objective = {}", iteration, value);
            }
            history.push(value);

            let mut stepped = point.clone();
            stepped.axpy(step_size, &gradient, T::one());
            point = objective
                .project(&stepped)
                .map_err(|err| OptimizerError::numerical_breakdown(iteration, err.to_string()))?;

            let norm = gradient.norm();
            gradient_norm = Some(norm);

            let state = IterationState {
                iteration,
                point: &point,
                value,
                gradient_norm: norm,
            };
            if !callback.on_iteration_end(&state)? {
                termination = TerminationReason::CallbackRequest;
                break;
            }
        }

        let iterations = history.len();
        let value = objective.cost(&point)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spca_core::{
        callback::NoOpCallback, error::Result, layout::ParameterLayout, types::DMatrix,
    };

    /// Rayleigh quotient `xᵀ A x` on the unit sphere.
    #[derive(Debug)]
    struct SphereRayleigh {
        a: DMatrix<f64>,
        layout: ParameterLayout,
    }

    impl SphereRayleigh {
        fn new(a: DMatrix<f64>) -> Self {
            let layout = ParameterLayout::new().with_block("x", a.nrows());
            Self { a, layout }
        }
    }

    impl CostFunction<f64> for SphereRayleigh {
        fn layout(&self) -> &ParameterLayout {
            &self.layout
        }

        fn cost(&self, point: &DVector<f64>) -> Result<f64> {
            Ok(point.dot(&(&self.a * point)))
        }

        fn cost_and_gradient(&self, point: &DVector<f64>) -> Result<(f64, DVector<f64>)> {
            let ax = &self.a * point;
            Ok((point.dot(&ax), ax * 2.0))
        }
    }

    impl Projection<f64> for SphereRayleigh {
        fn project(&self, point: &DVector<f64>) -> Result<DVector<f64>> {
            Ok(point.normalize())
        }

        fn is_feasible(&self, point: &DVector<f64>, tolerance: f64) -> Result<bool> {
            Ok((point.norm() - 1.0).abs() <= tolerance)
        }
    }

    #[test]
    fn test_finds_leading_eigenvector() {
        let a = DMatrix::from_diagonal(&DVector::from_vec(vec![1.0, 3.0, 2.0]));
        let objective = SphereRayleigh::new(a);
        let mut optimizer = ProjectedGradientAscent::with_step_size(0.1);
        let criterion = StoppingCriterion::new()
            .with_max_iterations(300)
            .with_log_interval(0);

        let start = DVector::from_vec(vec![1.0, 1.0, 1.0]);
        let result = optimizer
            .maximize(&objective, &start, &criterion, &mut NoOpCallback)
            .unwrap();

        assert_relative_eq!(result.value, 3.0, epsilon = 1e-8);
        assert_relative_eq!(result.point[1].abs(), 1.0, epsilon = 1e-6);
        assert!(objective.is_feasible(&result.point, 1e-12).unwrap());
    }

    #[test]
    fn test_objective_history_is_monotone() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let objective = SphereRayleigh::new(a);
        let mut optimizer = ProjectedGradientAscent::with_step_size(0.05);
        let criterion = StoppingCriterion::new().with_max_iterations(50);

        let result = optimizer
            .maximize(
                &objective,
                &DVector::from_vec(vec![1.0, 0.0]),
                &criterion,
                &mut NoOpCallback,
            )
            .unwrap();

        for pair in result.value_history.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-12);
        }
    }

    #[test]
    fn test_degenerate_start_stops() {
        let objective = SphereRayleigh::new(DMatrix::identity(2, 2));
        let mut optimizer = ProjectedGradientAscent::with_step_size(0.1);
        let zero = DVector::zeros(2);

        // Normalizing the zero vector yields NaN, which the loop reports.
        let result = optimizer
            .maximize(&objective, &zero, &StoppingCriterion::new(), &mut NoOpCallback)
            .unwrap();
        assert_eq!(result.termination_reason, TerminationReason::NumericalError);
    }

    /// Keeps a copy of every point handed to the callback.
    #[derive(Default)]
    struct PointRecorder {
        points: Vec<DVector<f64>>,
    }

    impl OptimizationCallback<f64> for PointRecorder {
        fn on_iteration_end(&mut self, state: &IterationState<'_, f64>) -> Result<bool> {
            self.points.push(state.point.clone());
            Ok(true)
        }
    }

    #[test]
    fn test_callback_sees_projected_step() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let objective = SphereRayleigh::new(a.clone());
        let mut optimizer = ProjectedGradientAscent::with_step_size(0.25);
        let criterion = StoppingCriterion::new().with_max_iterations(1);
        let mut recorder = PointRecorder::default();

        let start = DVector::from_vec(vec![0.6, 0.8]);
        let result = optimizer
            .maximize(&objective, &start, &criterion, &mut recorder)
            .unwrap();

        let expected = (&start + (&a * &start) * 0.5).normalize();
        assert_eq!(recorder.points.len(), 1);
        assert_relative_eq!(recorder.points[0], expected, epsilon = 1e-12);
        assert_relative_eq!(result.point, expected, epsilon = 1e-12);
        assert!((&recorder.points[0] - &start).norm() > 1e-3);
    }

    #[test]
    fn test_config_validation() {
        assert!(ProjectedAscentConfig::<f64>::new().validate().is_ok());
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ProjectedAscentConfig::new().with_step_size(bad).validate(),
                Err(OptimizerError::InvalidConfiguration { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_bad_step() {
        let objective = SphereRayleigh::new(DMatrix::identity(2, 2));
        let mut optimizer = ProjectedGradientAscent::with_step_size(-1.0);
        let err = optimizer
            .maximize(
                &objective,
                &DVector::from_vec(vec![1.0, 0.0]),
                &StoppingCriterion::new(),
                &mut NoOpCallback,
            )
            .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));
    }
}
