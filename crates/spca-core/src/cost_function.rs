//! Cost function interface for the optimization loops.
//!
//! Objectives expose their value and a closed-form Euclidean gradient over a
//! flat parameter vector whose structure is described by a
//! [`ParameterLayout`]. Every call returns a freshly allocated gradient, so
//! no gradient state is carried between iterations.
//!
//! A central finite-difference fallback and a [`DerivativeChecker`] are
//! provided to validate analytic gradients.

use crate::{
    error::{ModelError, Result},
    layout::ParameterLayout,
    types::{DVector, Scalar},
};
use num_traits::Float;
use std::fmt::Debug;

/// Trait for differentiable objectives over a flat parameter vector.
pub trait CostFunction<T: Scalar>: Debug {
    /// Layout of the parameter vector this objective expects.
    fn layout(&self) -> &ParameterLayout;

    /// Evaluates the objective at `point`.
    fn cost(&self, point: &DVector<T>) -> Result<T>;

    /// Evaluates the objective and its Euclidean gradient at `point`.
    ///
    /// # Default Implementation
    ///
    /// Uses central finite differences if not overridden.
    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        let cost = self.cost(point)?;
        let gradient = self.gradient_fd(point)?;
        Ok((cost, gradient))
    }

    /// Computes only the gradient at `point`.
    fn gradient(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.cost_and_gradient(point).map(|(_, grad)| grad)
    }

    /// Approximates the gradient with central differences.
    fn gradient_fd(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.layout().validate(point)?;

        let h = T::FD_STEP;
        let two = <T as Scalar>::from_f64(2.0);
        let mut gradient = DVector::zeros(point.len());
        let mut probe = point.clone();

        for i in 0..point.len() {
            let original = probe[i];
            let step = h * <T as Float>::max(T::one(), <T as Float>::abs(original));

            probe[i] = original + step;
            let f_plus = self.cost(&probe)?;
            probe[i] = original - step;
            let f_minus = self.cost(&probe)?;
            probe[i] = original;

            gradient[i] = (f_plus - f_minus) / (two * step);
        }

        Ok(gradient)
    }
}

/// Result of comparing an analytic gradient against finite differences.
#[derive(Debug, Clone)]
pub struct GradientCheck<T> {
    /// Largest absolute deviation over all coordinates
    pub max_abs_error: T,
    /// Largest deviation scaled by `max(1, |analytic|)`
    pub max_rel_error: T,
    /// Coordinate where the largest relative deviation occurs
    pub worst_index: usize,
}

impl<T: Scalar> GradientCheck<T> {
    /// Whether the relative deviation is below `tolerance`.
    pub fn passes(&self, tolerance: T) -> bool {
        self.max_rel_error <= tolerance
    }
}

/// Validates analytic gradients against central finite differences.
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivativeChecker;

impl DerivativeChecker {
    /// Compares `cost_and_gradient` with `gradient_fd` at `point`.
    pub fn check_gradient<T, C>(cost_fn: &C, point: &DVector<T>) -> Result<GradientCheck<T>>
    where
        T: Scalar,
        C: CostFunction<T> + ?Sized,
    {
        let (_, analytic) = cost_fn.cost_and_gradient(point)?;
        let numeric = cost_fn.gradient_fd(point)?;

        if analytic.len() != numeric.len() {
            return Err(ModelError::dimension_mismatch(numeric.len(), analytic.len()));
        }

        let mut check = GradientCheck {
            max_abs_error: T::zero(),
            max_rel_error: T::zero(),
            worst_index: 0,
        };

        for (i, (&a, &n)) in analytic.iter().zip(numeric.iter()).enumerate() {
            let abs_err = <T as Float>::abs(a - n);
            let rel_err = abs_err / <T as Float>::max(T::one(), <T as Float>::abs(a));
            if abs_err > check.max_abs_error {
                check.max_abs_error = abs_err;
            }
            if rel_err > check.max_rel_error {
                check.max_rel_error = rel_err;
                check.worst_index = i;
            }
        }

        Ok(check)
    }
}

/// A simple quadratic objective `f(x) = 0.5 * ||x - target||^2`, used in tests.
#[derive(Debug, Clone)]
pub struct QuadraticCost<T: Scalar> {
    layout: ParameterLayout,
    target: DVector<T>,
}

impl<T: Scalar> QuadraticCost<T> {
    /// Creates a quadratic centred at `target`.
    pub fn new(target: DVector<T>) -> Self {
        let layout = ParameterLayout::new().with_block("x", target.len());
        Self { layout, target }
    }
}

impl<T: Scalar> CostFunction<T> for QuadraticCost<T> {
    fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    fn cost(&self, point: &DVector<T>) -> Result<T> {
        self.layout.validate(point)?;
        let diff = point - &self.target;
        Ok(diff.dot(&diff) * <T as Scalar>::from_f64(0.5))
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        self.layout.validate(point)?;
        let diff = point - &self.target;
        let cost = diff.dot(&diff) * <T as Scalar>::from_f64(0.5);
        Ok((cost, diff))
    }
}
