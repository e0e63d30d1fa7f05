//! Integration tests running the optimizers on the sparse PCA objectives.

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};
use spca_core::{
    callback::{CallbackPair, NoOpCallback, OptimizationCallback},
    constraint::Projection,
    cost_function::CostFunction,
    error::Result,
    optimizer::{IterationState, StoppingCriterion, TerminationReason},
    types::{DMatrix, DVector},
};
use spca_models::{
    l1_norm, sine_error, FactorizationObjective, FactorizationVariant, HadamardRayleighQuotient,
    Recovery, RecoveryTracker, SyntheticConfig,
};
use spca_optim::{GradientDescent, ProjectedGradientAscent};

/// Records the largest violation of `‖u⊙v‖ = 1` seen after any update.
struct ConstraintMonitor<'a> {
    objective: &'a HadamardRayleighQuotient<'a, f64>,
    max_violation: f64,
    checked: usize,
}

impl OptimizationCallback<f64> for ConstraintMonitor<'_> {
    fn on_iteration_end(&mut self, state: &IterationState<'_, f64>) -> Result<bool> {
        let norm = self.objective.product_norm(state.point)?;
        self.max_violation = self.max_violation.max((norm - 1.0).abs());
        self.checked += 1;
        Ok(true)
    }
}

#[test]
fn direct_product_loss_decreases_on_default_scenario() {
    let config = SyntheticConfig::new(50, 30).with_mix(0.8, 0.2).with_sparsity(0.3);
    let problem = config.generate::<f64>(0).unwrap();
    let objective =
        FactorizationObjective::new(&problem.data, FactorizationVariant::DirectProduct).unwrap();
    let start = objective
        .layout()
        .random_point(&mut StdRng::seed_from_u64(1));

    let mut optimizer = GradientDescent::with_step_size(1e-4);
    let criterion = StoppingCriterion::new()
        .with_max_iterations(10_000)
        .with_log_interval(1_000);
    let result = optimizer
        .optimize(&objective, &start, &criterion, &mut NoOpCallback)
        .unwrap();

    assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
    assert_eq!(result.value_history.len(), 10_000);
    let initial = result.initial_value().unwrap();
    assert!(
        result.value < initial,
        "final loss {} should be below initial loss {}",
        result.value,
        initial
    );
}

#[test]
fn every_variant_descends_over_a_long_window() {
    let problem = SyntheticConfig::new(10, 8).generate::<f64>(3).unwrap();

    for variant in FactorizationVariant::ALL {
        let objective = FactorizationObjective::new(&problem.data, variant).unwrap();
        let start = objective
            .layout()
            .random_point(&mut StdRng::seed_from_u64(17));
        let step = match variant {
            FactorizationVariant::DirectProduct
            | FactorizationVariant::DirectDifferenceOfSquares => 1e-4,
            FactorizationVariant::ProjectedProduct
            | FactorizationVariant::ProjectedDifferenceOfSquares => 1e-5,
        };

        let mut optimizer = GradientDescent::with_step_size(step);
        let criterion = StoppingCriterion::new()
            .with_max_iterations(2_000)
            .with_log_interval(0);
        let mut tracker = RecoveryTracker::new(&objective, &problem.signal);
        let result = optimizer
            .optimize(&objective, &start, &criterion, &mut tracker)
            .unwrap();

        let history = &result.value_history;
        assert_eq!(history.len(), 2_000, "{}", variant);
        assert!(
            result.value < history[0],
            "{}: final loss {} not below initial {}",
            variant,
            result.value,
            history[0]
        );

        let decreasing = history.windows(2).filter(|w| w[1] <= w[0]).count();
        assert!(
            decreasing as f64 >= 0.9 * (history.len() - 1) as f64,
            "{}: only {} of {} steps decreased the loss",
            variant,
            decreasing,
            history.len() - 1
        );

        let trace = tracker.into_trace();
        assert_eq!(trace.len(), 2_000);
        assert!(trace
            .sine_errors
            .iter()
            .all(|s| s.is_nan() || (0.0..=1.0).contains(s)));
    }
}

#[test]
fn projected_ascent_keeps_hadamard_product_on_sphere() {
    let problem = SyntheticConfig::new(20, 10).generate::<f64>(5).unwrap();
    let objective = HadamardRayleighQuotient::new(&problem.covariance).unwrap();
    let start = objective
        .layout()
        .random_point(&mut StdRng::seed_from_u64(9));

    let mut monitor = ConstraintMonitor {
        objective: &objective,
        max_violation: 0.0,
        checked: 0,
    };
    let tracker = RecoveryTracker::new(&objective, &problem.signal);
    let mut callbacks = CallbackPair::new(&mut monitor, tracker);

    let mut optimizer = ProjectedGradientAscent::with_step_size(1e-2);
    let criterion = StoppingCriterion::new()
        .with_max_iterations(2_000)
        .with_log_interval(100);
    let result = optimizer
        .maximize(&objective, &start, &criterion, &mut callbacks)
        .unwrap();

    let trace = callbacks.second.into_trace();
    assert_eq!(monitor.checked, 2_000);
    assert!(
        monitor.max_violation < 1e-10,
        "constraint violated by {}",
        monitor.max_violation
    );
    assert!(objective.is_feasible(&result.point, 1e-10).unwrap());

    assert_eq!(result.termination_reason, TerminationReason::MaxIterations);
    assert_eq!(result.iterations, 2_000);

    // On the unit sphere the objective lies between the extreme eigenvalues
    // of S, beta and alpha * |support| + beta.
    let upper = 0.8 * problem.support().len() as f64 + 0.2;
    for &value in &result.value_history {
        assert!(value >= 0.2 - 1e-9 && value <= upper + 1e-9, "objective {}", value);
    }

    assert_eq!(trace.len(), 2_000);
    assert!(trace
        .sine_errors
        .iter()
        .all(|s| (0.0..=1.0).contains(s)));
}

#[test]
fn tracker_records_metrics_of_the_updated_point() {
    let problem = SyntheticConfig::new(10, 8).generate::<f64>(2).unwrap();
    let objective =
        FactorizationObjective::new(&problem.data, FactorizationVariant::DirectProduct).unwrap();
    let start = objective
        .layout()
        .random_point(&mut StdRng::seed_from_u64(4));
    let step = 1e-2;

    let mut optimizer = GradientDescent::with_step_size(step);
    let criterion = StoppingCriterion::new().with_max_iterations(1);
    let mut tracker = RecoveryTracker::new(&objective, &problem.signal);
    let result = optimizer
        .optimize(&objective, &start, &criterion, &mut tracker)
        .unwrap();
    let trace = tracker.into_trace();

    let updated = &start - objective.gradient(&start).unwrap() * step;
    assert_relative_eq!(result.point, updated, epsilon = 1e-12);

    let recovered = objective.recovered(&updated).unwrap();
    assert_eq!(trace.len(), 1);
    assert_relative_eq!(trace.l1_norms[0], l1_norm(&recovered), epsilon = 1e-12);
    assert_relative_eq!(
        trace.sine_errors[0],
        sine_error(&recovered, &problem.signal).unwrap(),
        epsilon = 1e-12
    );

    let before = l1_norm(&objective.recovered(&start).unwrap());
    assert!((trace.l1_norms[0] - before).abs() > 1e-9);
}

#[test]
fn hadamard_factors_step_from_the_same_point() {
    let s = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
    let objective = HadamardRayleighQuotient::new(&s).unwrap();
    let step = 0.1;

    // u = (1, 1), v = (0.6, 0.8) already satisfies ‖u⊙v‖ = 1.
    let u = DVector::from_vec(vec![1.0, 1.0]);
    let v = DVector::from_vec(vec![0.6, 0.8]);
    let start = objective.layout().join(&[u.clone(), v.clone()]).unwrap();

    let mut optimizer = ProjectedGradientAscent::with_step_size(step);
    let criterion = StoppingCriterion::new().with_max_iterations(1);
    let signal = DVector::from_vec(vec![1.0, 1.0]);
    let mut tracker = RecoveryTracker::new(&objective, &signal);
    let result = optimizer
        .maximize(&objective, &start, &criterion, &mut tracker)
        .unwrap();

    let g = (&s + s.transpose()) * u.component_mul(&v);
    let stepped_u: DVector<f64> = &u + v.component_mul(&g) * step;
    let stepped_v: DVector<f64> = &v + u.component_mul(&g) * step;
    let scale = stepped_u.component_mul(&stepped_v).norm().sqrt();
    let expected = objective
        .layout()
        .join(&[stepped_u.clone() / scale, stepped_v / scale])
        .unwrap();
    assert_relative_eq!(result.point, expected, epsilon = 1e-12);

    // Stepping v from the already updated u lands somewhere else.
    let sequential_v = &v + stepped_u.component_mul(&g) * step;
    let sequential_scale = stepped_u.component_mul(&sequential_v).norm().sqrt();
    let sequential = objective
        .layout()
        .join(&[&stepped_u / sequential_scale, sequential_v / sequential_scale])
        .unwrap();
    assert!((&result.point - &sequential).norm() > 1e-3);

    // The tracker saw the projected point, not the start.
    let trace = tracker.into_trace();
    assert_relative_eq!(
        trace.l1_norms[0],
        l1_norm(&objective.product(&result.point).unwrap()),
        epsilon = 1e-12
    );
}
