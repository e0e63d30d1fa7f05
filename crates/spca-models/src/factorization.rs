//! Rank-one factorization objectives with a Hadamard-parametrized loading.
//!
//! All four objectives measure the squared Frobenius residual
//!
//! ```text
//! L(u, v, w) = ‖X − a bᵀ‖²
//! ```
//!
//! between the data `X` (n × p) and a rank-one reconstruction, where
//!
//! - the score vector `a` is either `u` itself (u ∈ Rⁿ, [`LoadingFactor::Direct`])
//!   or the projection `X u` (u ∈ Rᵖ, [`LoadingFactor::Projected`]),
//! - the component `b` is either `v ⊙ w` ([`HadamardParametrization::Product`])
//!   or `v ⊙ v − w ⊙ w` ([`HadamardParametrization::DifferenceOfSquares`]).
//!
//! # Gradients
//!
//! With `R = X − a bᵀ`:
//!
//! ```text
//! ∂L/∂a = −2 R b            ∂L/∂b = −2 Rᵀ a
//! direct:     ∂L/∂u = ∂L/∂a
//! projected:  ∂L/∂u = Xᵀ ∂L/∂a
//! product:    ∂L/∂v = ∂L/∂b ⊙ w,    ∂L/∂w = ∂L/∂b ⊙ v
//! diff. sq.:  ∂L/∂v = 2 ∂L/∂b ⊙ v,  ∂L/∂w = −2 ∂L/∂b ⊙ w
//! ```

use crate::metrics::Recovery;
use nalgebra::{DMatrix, DVector};
use spca_core::{
    cost_function::CostFunction,
    error::{ModelError, Result},
    layout::ParameterLayout,
    types::Scalar,
};
use std::fmt;

/// How the score vector of the reconstruction is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingFactor {
    /// The score vector is a free parameter of length n.
    Direct,
    /// The score vector is `X u` with u of length p.
    Projected,
}

/// How the recovered component is built from `v` and `w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HadamardParametrization {
    /// `v ⊙ w`
    Product,
    /// `v ⊙ v − w ⊙ w`
    DifferenceOfSquares,
}

impl HadamardParametrization {
    /// Combines the two factors into the recovered component.
    pub fn combine<T: Scalar>(&self, v: &DVector<T>, w: &DVector<T>) -> DVector<T> {
        match self {
            Self::Product => v.component_mul(w),
            Self::DifferenceOfSquares => v.component_mul(v) - w.component_mul(w),
        }
    }

    /// Chain rule from `∂L/∂b` to `(∂L/∂v, ∂L/∂w)`.
    pub fn backpropagate<T: Scalar>(
        &self,
        grad_b: &DVector<T>,
        v: &DVector<T>,
        w: &DVector<T>,
    ) -> (DVector<T>, DVector<T>) {
        match self {
            Self::Product => (grad_b.component_mul(w), grad_b.component_mul(v)),
            Self::DifferenceOfSquares => {
                let two = <T as Scalar>::from_f64(2.0);
                (grad_b.component_mul(v) * two, -(grad_b.component_mul(w) * two))
            }
        }
    }
}

/// The four factorization objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorizationVariant {
    /// `‖X − u (v⊙w)ᵀ‖²`
    DirectProduct,
    /// `‖X − X u (v⊙w)ᵀ‖²`
    ProjectedProduct,
    /// `‖X − u (v⊙v − w⊙w)ᵀ‖²`
    DirectDifferenceOfSquares,
    /// `‖X − X u (v⊙v − w⊙w)ᵀ‖²`
    ProjectedDifferenceOfSquares,
}

impl FactorizationVariant {
    /// All variants in their canonical order.
    pub const ALL: [FactorizationVariant; 4] = [
        Self::DirectProduct,
        Self::ProjectedProduct,
        Self::DirectDifferenceOfSquares,
        Self::ProjectedDifferenceOfSquares,
    ];

    /// Score-vector construction of this variant.
    pub fn loading(&self) -> LoadingFactor {
        match self {
            Self::DirectProduct | Self::DirectDifferenceOfSquares => LoadingFactor::Direct,
            Self::ProjectedProduct | Self::ProjectedDifferenceOfSquares => LoadingFactor::Projected,
        }
    }

    /// Component parametrization of this variant.
    pub fn parametrization(&self) -> HadamardParametrization {
        match self {
            Self::DirectProduct | Self::ProjectedProduct => HadamardParametrization::Product,
            Self::DirectDifferenceOfSquares | Self::ProjectedDifferenceOfSquares => {
                HadamardParametrization::DifferenceOfSquares
            }
        }
    }

    /// Short machine-friendly name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DirectProduct => "direct_product",
            Self::ProjectedProduct => "projected_product",
            Self::DirectDifferenceOfSquares => "direct_difference_of_squares",
            Self::ProjectedDifferenceOfSquares => "projected_difference_of_squares",
        }
    }

    /// Human-readable objective formula.
    pub fn formula(&self) -> &'static str {
        match self {
            Self::DirectProduct => "||X - u (v*w)^T||^2",
            Self::ProjectedProduct => "||X - X u (v*w)^T||^2",
            Self::DirectDifferenceOfSquares => "||X - u (v*v - w*w)^T||^2",
            Self::ProjectedDifferenceOfSquares => "||X - X u (v*v - w*w)^T||^2",
        }
    }
}

impl fmt::Display for FactorizationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Squared Frobenius residual of a rank-one Hadamard factorization of `X`.
#[derive(Debug, Clone)]
pub struct FactorizationObjective<'a, T: Scalar> {
    data: &'a DMatrix<T>,
    loading: LoadingFactor,
    parametrization: HadamardParametrization,
    layout: ParameterLayout,
}

/// Factors sliced out of a flat parameter vector.
struct Factors<T: Scalar> {
    u: DVector<T>,
    v: DVector<T>,
    w: DVector<T>,
}

impl<'a, T: Scalar> FactorizationObjective<'a, T> {
    /// Creates the objective for `variant` over the data matrix `X` (n × p).
    pub fn new(data: &'a DMatrix<T>, variant: FactorizationVariant) -> Result<Self> {
        Self::with_parts(data, variant.loading(), variant.parametrization())
    }

    /// Creates the objective from its two independent choices.
    pub fn with_parts(
        data: &'a DMatrix<T>,
        loading: LoadingFactor,
        parametrization: HadamardParametrization,
    ) -> Result<Self> {
        let (n, p) = data.shape();
        if n == 0 || p == 0 {
            return Err(ModelError::dimension_mismatch(
                "non-empty data matrix",
                format!("({}, {})", n, p),
            ));
        }

        let u_len = match loading {
            LoadingFactor::Direct => n,
            LoadingFactor::Projected => p,
        };
        let layout = ParameterLayout::new()
            .with_block("u", u_len)
            .with_block("v", p)
            .with_block("w", p);

        Ok(Self {
            data,
            loading,
            parametrization,
            layout,
        })
    }

    /// Score-vector construction.
    pub fn loading(&self) -> LoadingFactor {
        self.loading
    }

    /// Component parametrization.
    pub fn parametrization(&self) -> HadamardParametrization {
        self.parametrization
    }

    fn factors(&self, point: &DVector<T>) -> Result<Factors<T>> {
        self.layout.validate(point)?;
        Ok(Factors {
            u: self.layout.view(point, 0).into_owned(),
            v: self.layout.view(point, 1).into_owned(),
            w: self.layout.view(point, 2).into_owned(),
        })
    }

    fn scores(&self, u: &DVector<T>) -> DVector<T> {
        match self.loading {
            LoadingFactor::Direct => u.clone(),
            LoadingFactor::Projected => self.data * u,
        }
    }

    /// Rank-one reconstruction `a bᵀ` at `point`.
    pub fn reconstruction(&self, point: &DVector<T>) -> Result<DMatrix<T>> {
        let Factors { u, v, w } = self.factors(point)?;
        let a = self.scores(&u);
        let b = self.parametrization.combine(&v, &w);
        Ok(&a * b.transpose())
    }
}

impl<T: Scalar> CostFunction<T> for FactorizationObjective<'_, T> {
    fn layout(&self) -> &ParameterLayout {
        &self.layout
    }

    fn cost(&self, point: &DVector<T>) -> Result<T> {
        let residual = self.data - self.reconstruction(point)?;
        Ok(residual.norm_squared())
    }

    fn cost_and_gradient(&self, point: &DVector<T>) -> Result<(T, DVector<T>)> {
        let Factors { u, v, w } = self.factors(point)?;
        let a = self.scores(&u);
        let b = self.parametrization.combine(&v, &w);

        let residual = self.data - &a * b.transpose();
        let cost = residual.norm_squared();

        let minus_two = <T as Scalar>::from_f64(-2.0);
        let grad_a = (&residual * &b) * minus_two;
        let grad_b = (residual.transpose() * &a) * minus_two;

        let grad_u = match self.loading {
            LoadingFactor::Direct => grad_a,
            LoadingFactor::Projected => self.data.transpose() * grad_a,
        };
        let (grad_v, grad_w) = self.parametrization.backpropagate(&grad_b, &v, &w);

        let gradient = self.layout.join(&[grad_u, grad_v, grad_w])?;
        Ok((cost, gradient))
    }
}

impl<T: Scalar> Recovery<T> for FactorizationObjective<'_, T> {
    fn recovered(&self, point: &DVector<T>) -> Result<DVector<T>> {
        let Factors { v, w, .. } = self.factors(point)?;
        Ok(self.parametrization.combine(&v, &w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use spca_core::cost_function::DerivativeChecker;

    fn small_data() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 2, &[1.0, 2.0, -1.0, 0.5, 0.0, 3.0])
    }

    #[test]
    fn test_layout_depends_on_loading() {
        let x = small_data();
        let direct = FactorizationObjective::new(&x, FactorizationVariant::DirectProduct).unwrap();
        let projected =
            FactorizationObjective::new(&x, FactorizationVariant::ProjectedProduct).unwrap();

        assert_eq!(direct.layout().total_len(), 3 + 2 + 2);
        assert_eq!(projected.layout().total_len(), 2 + 2 + 2);
    }

    #[test]
    fn test_cost_at_known_point() {
        let x = small_data();
        let objective =
            FactorizationObjective::new(&x, FactorizationVariant::DirectProduct).unwrap();

        // u = 0 leaves the whole data as residual
        let point = DVector::from_vec(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]);
        assert_relative_eq!(objective.cost(&point).unwrap(), x.norm_squared());

        // u = first column, v ⊙ w = e1 removes the first column
        let point = DVector::from_vec(vec![1.0, -1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_relative_eq!(objective.cost(&point).unwrap(), 4.0 + 0.25 + 9.0);
    }

    #[test]
    fn test_difference_of_squares_component() {
        let v = DVector::from_vec(vec![2.0, 1.0]);
        let w = DVector::from_vec(vec![1.0, 3.0]);
        let b = HadamardParametrization::DifferenceOfSquares.combine(&v, &w);
        assert_eq!(b.as_slice(), &[3.0, -8.0]);

        let b = HadamardParametrization::Product.combine(&v, &w);
        assert_eq!(b.as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        let x = small_data();
        for variant in FactorizationVariant::ALL {
            let objective = FactorizationObjective::new(&x, variant).unwrap();
            let len = objective.layout().total_len();
            let point = DVector::from_fn(len, |i, _| 0.3 * (i as f64 + 1.0).sin() + 0.1);

            let check = DerivativeChecker::check_gradient(&objective, &point).unwrap();
            assert!(
                check.passes(1e-5),
                "{}: relative error {} at index {}",
                variant,
                check.max_rel_error,
                check.worst_index
            );
        }
    }

    #[test]
    fn test_recovered_vector() {
        let x = small_data();
        let objective =
            FactorizationObjective::new(&x, FactorizationVariant::ProjectedDifferenceOfSquares)
                .unwrap();
        let point = DVector::from_vec(vec![0.0, 0.0, 2.0, 1.0, 1.0, 3.0]);
        let recovered = objective.recovered(&point).unwrap();
        assert_eq!(recovered.as_slice(), &[3.0, -8.0]);
    }

    #[test]
    fn test_wrong_point_length() {
        let x = small_data();
        let objective =
            FactorizationObjective::new(&x, FactorizationVariant::DirectProduct).unwrap();
        let point = DVector::zeros(6);
        assert!(matches!(
            objective.cost(&point),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }
}
