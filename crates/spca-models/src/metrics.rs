//! Recovery-quality metrics for an estimated sparse component.
//!
//! Two scalars are tracked per iteration:
//!
//! - the sine error `sqrt(1 − cos²)` between the recovered vector and the
//!   ground-truth signal, invariant to sign and scale;
//! - the L1 norm of the recovered vector.

use nalgebra::DVector;
use num_traits::Float;
use spca_core::{
    callback::OptimizationCallback,
    error::{ModelError, Result},
    optimizer::IterationState,
    types::Scalar,
};

/// Objectives whose parameters determine a candidate sparse component.
pub trait Recovery<T: Scalar> {
    /// Builds the recovered vector from a flat parameter vector.
    fn recovered(&self, point: &DVector<T>) -> Result<DVector<T>>;
}

/// Cosine of the angle between `recovered` and `signal`.
///
/// Returns [`ModelError::UndefinedMetric`] if either vector has zero norm or
/// the lengths differ.
pub fn cosine_similarity<T: Scalar>(recovered: &DVector<T>, signal: &DVector<T>) -> Result<T> {
    if recovered.len() != signal.len() {
        return Err(ModelError::dimension_mismatch(signal.len(), recovered.len()));
    }

    let recovered_norm = recovered.norm();
    let signal_norm = signal.norm();
    if recovered_norm == T::zero() || !<T as Float>::is_finite(recovered_norm) {
        return Err(ModelError::undefined_metric(format!(
            "recovered vector has norm {}",
            recovered_norm
        )));
    }
    if signal_norm == T::zero() {
        return Err(ModelError::undefined_metric("signal vector has zero norm"));
    }

    Ok(recovered.dot(signal) / (recovered_norm * signal_norm))
}

/// Sine of the angle between `recovered` and `signal`, in `[0, 1]`.
pub fn sine_error<T: Scalar>(recovered: &DVector<T>, signal: &DVector<T>) -> Result<T> {
    let cos = cosine_similarity(recovered, signal)?;
    let cos_sq = <T as Float>::min(cos * cos, T::one());
    Ok(<T as Float>::sqrt(T::one() - cos_sq))
}

/// Sum of absolute entries.
pub fn l1_norm<T: Scalar>(vector: &DVector<T>) -> T {
    vector
        .iter()
        .fold(T::zero(), |acc, &x| acc + <T as Float>::abs(x))
}

/// Append-only metric sequences, one entry per iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecoveryTrace {
    /// Sine error after each iteration (`NaN` where undefined)
    pub sine_errors: Vec<f64>,
    /// L1 norm of the recovered vector after each iteration
    pub l1_norms: Vec<f64>,
}

impl RecoveryTrace {
    /// Creates an empty trace with room for `capacity` iterations.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sine_errors: Vec::with_capacity(capacity),
            l1_norms: Vec::with_capacity(capacity),
        }
    }

    /// Number of recorded iterations.
    pub fn len(&self) -> usize {
        self.sine_errors.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.sine_errors.is_empty()
    }

    /// Records the metrics of one recovered vector.
    pub fn record<T: Scalar>(&mut self, recovered: &DVector<T>, signal: &DVector<T>) {
        let sine = match sine_error(recovered, signal) {
            Ok(value) => value.to_f64(),
            Err(err) => {
                log::warn!("iteration {}: {}", self.len(), err);
                f64::NAN
            }
        };
        self.sine_errors.push(sine);
        self.l1_norms.push(l1_norm(recovered).to_f64());
    }

    /// Last recorded sine error.
    pub fn final_sine_error(&self) -> Option<f64> {
        self.sine_errors.last().copied()
    }

    /// Last recorded L1 norm.
    pub fn final_l1_norm(&self) -> Option<f64> {
        self.l1_norms.last().copied()
    }
}

/// Callback that records recovery metrics after every update.
#[derive(Debug)]
pub struct RecoveryTracker<'a, T: Scalar, R: ?Sized> {
    recovery: &'a R,
    signal: &'a DVector<T>,
    trace: RecoveryTrace,
}

impl<'a, T: Scalar, R: Recovery<T> + ?Sized> RecoveryTracker<'a, T, R> {
    /// Tracks the component produced by `recovery` against `signal`.
    pub fn new(recovery: &'a R, signal: &'a DVector<T>) -> Self {
        Self {
            recovery,
            signal,
            trace: RecoveryTrace::default(),
        }
    }

    /// Records the metrics of `point` directly.
    pub fn observe(&mut self, point: &DVector<T>) -> Result<()> {
        let recovered = self.recovery.recovered(point)?;
        self.trace.record(&recovered, self.signal);
        Ok(())
    }

    /// Borrow the trace recorded so far.
    pub fn trace(&self) -> &RecoveryTrace {
        &self.trace
    }

    /// Consumes the tracker, returning the trace.
    pub fn into_trace(self) -> RecoveryTrace {
        self.trace
    }
}

impl<T: Scalar, R: Recovery<T> + ?Sized> OptimizationCallback<T> for RecoveryTracker<'_, T, R> {
    fn on_iteration_end(&mut self, state: &IterationState<'_, T>) -> Result<bool> {
        self.observe(state.point)?;
        Ok(true)
    }
}
