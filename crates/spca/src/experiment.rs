//! The five-method recovery sweep.
//!
//! An [`Experiment`] generates the synthetic problem once and then runs each
//! selected method from a fresh random initialization, recording the
//! objective and the recovery metrics of every iteration.

use crate::config::{ExperimentConfig, Method};
use crate::error::Result;
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use spca_core::{cost_function::CostFunction, optimizer::StoppingCriterion};
use spca_models::{
    FactorizationObjective, HadamardRayleighQuotient, RecoveryTrace, RecoveryTracker,
    SyntheticData,
};
use spca_optim::{GradientDescent, OptimizationResult, ProjectedGradientAscent, TerminationReason};
use std::fmt;
use std::time::Duration;

/// Outcome of one method.
#[derive(Debug, Clone)]
pub struct MethodReport {
    /// Method that produced this report
    pub method: Method,
    /// Loss (or objective, for ascent) at the start of every iteration
    pub objective_history: Vec<f64>,
    /// Loss (or objective) at the final point
    pub final_objective: f64,
    /// Recovery metrics after every update
    pub trace: RecoveryTrace,
    /// Number of completed iterations
    pub iterations: usize,
    /// Why the run stopped
    pub termination_reason: TerminationReason,
    /// Wall-clock time of the optimization loop
    pub duration: Duration,
}

impl MethodReport {
    fn from_run(method: Method, result: OptimizationResult<f64>, trace: RecoveryTrace) -> Self {
        Self {
            method,
            objective_history: result.value_history,
            final_objective: result.value,
            trace,
            iterations: result.iterations,
            termination_reason: result.termination_reason,
            duration: result.duration,
        }
    }

    /// Sine error after the last update.
    pub fn final_sine_error(&self) -> Option<f64> {
        self.trace.final_sine_error()
    }

    /// L1 norm of the recovered vector after the last update.
    pub fn final_l1_norm(&self) -> Option<f64> {
        self.trace.final_l1_norm()
    }

    /// Objective before the first update.
    pub fn initial_objective(&self) -> Option<f64> {
        self.objective_history.first().copied()
    }
}

impl fmt::Display for MethodReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quantity = if self.method.is_ascent() {
            "objective"
        } else {
            "loss"
        };
        write!(
            f,
            "{}: final {} = {:.6}, sine error = {:.6}, L1 norm = {:.6} ({} iterations, {:?})",
            self.method,
            quantity,
            self.final_objective,
            self.final_sine_error().unwrap_or(f64::NAN),
            self.final_l1_norm().unwrap_or(f64::NAN),
            self.iterations,
            self.termination_reason,
        )
    }
}

/// A generated problem together with the sweep that runs on it.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
    problem: SyntheticData<f64>,
}

impl Experiment {
    /// Validates `config` and generates its synthetic problem.
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        let problem = config.synthetic().generate(config.seed)?;
        info!(
            "Synthetic problem: p = {}, n = {}, support = {}, seed = {}",
            problem.features(),
            problem.samples(),
            problem.support().len(),
            config.seed
        );
        Ok(Self { config, problem })
    }

    /// The configuration this experiment runs.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// The generated problem shared by all methods.
    pub fn problem(&self) -> &SyntheticData<f64> {
        &self.problem
    }

    /// Runs one method from its own random initialization.
    pub fn run_method(&self, method: Method) -> Result<MethodReport> {
        let settings = self.config.settings(method);
        let criterion = StoppingCriterion::new()
            .with_max_iterations(settings.epochs)
            .with_log_interval(settings.log_every);
        let mut rng = StdRng::seed_from_u64(self.config.init_seed(method));

        match method.variant() {
            Some(variant) => {
                info!("Running {} on {}", method, variant.formula());
                let objective = FactorizationObjective::new(&self.problem.data, variant)?;
                let start = objective.layout().random_point(&mut rng);
                let mut tracker = RecoveryTracker::new(&objective, &self.problem.signal);

                let mut optimizer = GradientDescent::with_step_size(settings.step_size);
                let result = optimizer.optimize(&objective, &start, &criterion, &mut tracker)?;
                Ok(MethodReport::from_run(method, result, tracker.into_trace()))
            }
            None => {
                info!("Running {} on (u*v)^T S (u*v), ||u*v|| = 1", method);
                let objective = HadamardRayleighQuotient::new(&self.problem.covariance)?;
                let start = objective.layout().random_point(&mut rng);
                let mut tracker = RecoveryTracker::new(&objective, &self.problem.signal);

                let mut optimizer = ProjectedGradientAscent::with_step_size(settings.step_size);
                let result = optimizer.maximize(&objective, &start, &criterion, &mut tracker)?;
                Ok(MethodReport::from_run(method, result, tracker.into_trace()))
            }
        }
    }

    /// Runs every configured method in order.
    pub fn run(&self) -> Result<Vec<MethodReport>> {
        self.config
            .methods
            .iter()
            .map(|&method| self.run_method(method))
            .collect()
    }
}
