//! Callback support for optimization loops.
//!
//! Callbacks observe every iteration. They are used to record recovery
//! metrics, to log progress, and to stop a run early.

use crate::error::Result;
use crate::optimizer::IterationState;
use crate::types::Scalar;

/// Trait for optimization callbacks.
pub trait OptimizationCallback<T: Scalar> {
    /// Called once before the first iteration.
    fn on_optimization_start(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called at the end of each iteration.
    ///
    /// Returns `true` to continue optimization, `false` to stop early.
    fn on_iteration_end(&mut self, state: &IterationState<'_, T>) -> Result<bool> {
        let _ = state;
        Ok(true)
    }

    /// Called once after the last iteration.
    fn on_optimization_end(&mut self, iterations: usize, final_value: T) -> Result<()> {
        let _ = (iterations, final_value);
        Ok(())
    }
}

/// A no-op callback that does nothing.
#[derive(Debug, Default)]
pub struct NoOpCallback;

impl<T: Scalar> OptimizationCallback<T> for NoOpCallback {}

/// Runs two callbacks in sequence; stops when either asks to.
#[derive(Debug)]
pub struct CallbackPair<A, B> {
    /// First callback
    pub first: A,
    /// Second callback
    pub second: B,
}

impl<A, B> CallbackPair<A, B> {
    /// Combines two callbacks.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<T, A, B> OptimizationCallback<T> for CallbackPair<A, B>
where
    T: Scalar,
    A: OptimizationCallback<T>,
    B: OptimizationCallback<T>,
{
    fn on_optimization_start(&mut self) -> Result<()> {
        self.first.on_optimization_start()?;
        self.second.on_optimization_start()
    }

    fn on_iteration_end(&mut self, state: &IterationState<'_, T>) -> Result<bool> {
        let keep_first = self.first.on_iteration_end(state)?;
        let keep_second = self.second.on_iteration_end(state)?;
        Ok(keep_first && keep_second)
    }

    fn on_optimization_end(&mut self, iterations: usize, final_value: T) -> Result<()> {
        self.first.on_optimization_end(iterations, final_value)?;
        self.second.on_optimization_end(iterations, final_value)
    }
}

impl<T: Scalar, C: OptimizationCallback<T> + ?Sized> OptimizationCallback<T> for &mut C {
    fn on_optimization_start(&mut self) -> Result<()> {
        (**self).on_optimization_start()
    }

    fn on_iteration_end(&mut self, state: &IterationState<'_, T>) -> Result<bool> {
        (**self).on_iteration_end(state)
    }

    fn on_optimization_end(&mut self, iterations: usize, final_value: T) -> Result<()> {
        (**self).on_optimization_end(iterations, final_value)
    }
}

/// Stops the run once the objective is at or below a target value.
#[derive(Debug)]
pub struct TargetValueCallback<T> {
    target: T,
}

impl<T: Scalar> TargetValueCallback<T> {
    /// Creates a callback that stops once `value <= target`.
    pub fn new(target: T) -> Self {
        Self { target }
    }
}

impl<T: Scalar> OptimizationCallback<T> for TargetValueCallback<T> {
    fn on_iteration_end(&mut self, state: &IterationState<'_, T>) -> Result<bool> {
        Ok(state.value > self.target)
    }
}
