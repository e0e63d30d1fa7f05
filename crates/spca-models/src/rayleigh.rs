//! Rayleigh quotient of a Hadamard-parametrized unit vector.
//!
//! The objective is
//!
//! ```text
//! f(u, v) = (u⊙v)ᵀ S (u⊙v)     subject to ‖u⊙v‖ = 1
//! ```
//!
//! and is maximized by projected gradient ascent in `spca-optim`. With
//! `z = u⊙v` and `g = (S + Sᵀ) z` the Euclidean gradient is `(v⊙g, u⊙g)`.
//! The constraint is restored by dividing both factors by `sqrt(‖u⊙v‖)`,
//! which leaves the direction of `u⊙v` unchanged.

use crate::metrics::Recovery;
use nalgebra::{DMatrix, DVector};
use num_traits::Float;
use spca_core::{
    constraint::Projection,
    cost_function::CostFunction,
    error::{ModelError, Result},
    layout::ParameterLayout,
    types::Scalar,
};

/// `(u⊙v)ᵀ S (u⊙v)` over a flat `[u; v]` parameter vector.
#[derive(Debug, Clone)]
pub struct HadamardRayleighQuotient<'a, T: Scalar> {
    covariance: &'a DMatrix<T>,
    symmetrized: DMatrix<T>,
    layout: ParameterLayout,
}

impl<'a, T: Scalar> HadamardRayleighQuotient<'a, T> {
    /// Creates the objective for a square matrix `S`.
    pub fn new(covariance: &'a DMatrix<T>) -> Result<Self> {
        let (rows, cols) = covariance.shape();
        if rows != cols || rows == 0 {
            return Err(ModelError::dimension_mismatch(
                "non-empty square matrix",
                format!("({}, {})", rows, cols),
            ));
        }

        let symmetrized = covariance + covariance.transpose();
        let layout = ParameterLayout::new()
            .with_block("u", rows)
            .with_block("v", rows);

        Ok(Self {
            covariance,
            symmetrized,
            layout,
        })
    }

    /// Dimension of each factor.
    pub fn dimension(&self) -> usize {
        self.covariance.nrows()
    }

    /// The Hadamard product `u⊙v`.
    pub fn product(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.layout.validate(point)?;
        Ok(self
            .layout
            .view(point, 0)
            .component_mul(&self.layout.view(point, 1)))
    }

    /// `‖u⊙v‖`.
    pub fn product_norm(&self, point: &DVector<T>) -> Result<T> {
        Ok(self.product(point)?.norm())
    }

    /// Rescales `u` and `v` by `1 / sqrt(‖u⊙v‖)` so that `‖u⊙v‖ = 1`.
    pub fn normalize(&self, point: &DVector<T>) -> Result<DVector<T>> {
        let norm = self.product_norm(point)?;
        if norm <= T::zero() || !<T as Float>::is_finite(norm) {
            return Err(ModelError::numerical_error(format!(
                "cannot renormalize: ||u*v|| = {}",
                norm
            )));
        }
        Ok(point / <T as Float>::sqrt(norm))
    }
}

impl<T: Scalar> Projection<T> for HadamardRayleighQuotient<'_, T> {
    fn project(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.normalize(point)
    }

    fn is_feasible(&self, point: &DVector<T>, tolerance: T) -> Result<bool> {
        let norm = self.product_norm(point)?;
        Ok(<T as Float>::abs(norm - T::one()) <= tolerance)
    }
}

impl<T: Scalar> CostFunction<T> for HadamardRayleighQuotient<'_, T> {
    fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    fn cost(&self, point: &DVector<T>) -> Result<T> {
        let z = self.product(point)?;
        Ok(z.dot(&(self.covariance * &z)))
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        let z = self.product(point)?;
        let value = z.dot(&(self.covariance * &z));
        let g = &self.symmetrized * &z;

        let u = self.layout.view(point, 0);
        let v = self.layout.view(point, 1);
        let gradient = self
            .layout
            .join(&[v.component_mul(&g), u.component_mul(&g)])?;
        Ok((value, gradient))
    }
}

impl<T: Scalar> Recovery<T> for HadamardRayleighQuotient<'_, T> {
    fn recovered(&self, point: &DVector<T>) -> Result<DVector<T>> {
        self.product(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spca_core::cost_function::DerivativeChecker;

    fn covariance() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 3, &[2.0, 1.0, 0.0, 1.0, 2.0, 0.0, 0.0, 0.0, 0.5])
    }

    #[test]
    fn test_objective_value() {
        let s = covariance();
        let objective = HadamardRayleighQuotient::new(&s).unwrap();
        let point = DVector::from_vec(vec![1.0, 1.0, 0.0, 1.0, 0.0, 0.0]);
        // z = e1, zᵀ S z = S[0,0]
        assert_relative_eq!(objective.cost(&point).unwrap(), 2.0);
    }

    #[test]
    fn test_gradient_matches_finite_differences() {
        let s = DMatrix::from_row_slice(3, 3, &[2.0, 0.3, 0.0, 1.0, 2.0, -0.4, 0.2, 0.0, 0.5]);
        let objective = HadamardRayleighQuotient::new(&s).unwrap();
        let point = DVector::from_vec(vec![0.4, -1.2, 0.7, 1.1, 0.3, -0.8]);

        let check = DerivativeChecker::check_gradient(&objective, &point).unwrap();
        assert!(check.passes(1e-6), "relative error {}", check.max_rel_error);
    }

    #[test]
    fn test_normalize_restores_constraint() {
        let s = covariance();
        let objective = HadamardRayleighQuotient::new(&s).unwrap();
        let point = DVector::from_vec(vec![3.0, -1.0, 2.0, 0.5, 4.0, 1.0]);

        let normalized = objective.normalize(&point).unwrap();
        assert_relative_eq!(objective.product_norm(&normalized).unwrap(), 1.0, epsilon = 1e-12);
        assert!(objective.is_feasible(&normalized, 1e-10).unwrap());

        let before = objective.product(&point).unwrap().normalize();
        let after = objective.product(&normalized).unwrap();
        assert_relative_eq!(before, after, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_product_is_rejected() {
        let s = covariance();
        let objective = HadamardRayleighQuotient::new(&s).unwrap();
        let point = DVector::from_vec(vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0]);
        assert!(matches!(
            objective.normalize(&point),
            Err(ModelError::NumericalError { .. })
        ));
    }

    #[test]
    fn test_non_square_is_rejected() {
        let s = DMatrix::<f64>::zeros(2, 3);
        assert!(HadamardRayleighQuotient::new(&s).is_err());
    }
}
