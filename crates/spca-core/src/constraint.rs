//! Feasible-set projections for constrained optimization.
//!
//! A [`Projection`] maps an arbitrary parameter vector back onto the
//! constraint set after an unconstrained step, in the spirit of a
//! retraction onto a manifold.

use crate::{
    error::Result,
    types::{DVector, Scalar},
};

/// Constraint set with a projection operator.
pub trait Projection<T: Scalar> {
    /// Maps `point` onto the constraint set.
    fn project(&self, point: &DVector<T>) -> Result<DVector<T>>;

    /// Whether `point` satisfies the constraint within `tolerance`.
    fn is_feasible(&self, point: &DVector<T>, tolerance: T) -> Result<bool>;
}
