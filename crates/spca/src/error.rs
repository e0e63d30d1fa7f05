//! Errors raised while running and reporting an experiment.

use spca_core::error::{ModelError, OptimizerError};
use thiserror::Error;

/// Errors that can occur in the experiment runner.
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// Data generation or objective evaluation failed.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// The optimization loop failed.
    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    /// A chart could not be drawn or written.
    #[error("Plotting failed: {0}")]
    Plot(String),

    /// Reading a configuration file or creating the output directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`ExperimentConfig`](crate::config::ExperimentConfig).
    #[error("Invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),
}

impl ExperimentError {
    /// Wraps any displayable plotting backend error.
    pub fn plot<E: std::fmt::Display>(err: E) -> Self {
        Self::Plot(err.to_string())
    }
}

/// Result type for experiment operations.
pub type Result<T> = std::result::Result<T, ExperimentError>;
