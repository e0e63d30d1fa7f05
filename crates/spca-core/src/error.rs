//! Error types for model evaluation and optimization.
//!
//! `ModelError` covers everything that can go wrong while evaluating an
//! objective or a recovery metric. `OptimizerError` covers the optimization
//! loop itself and wraps model errors raised from inside it.

use thiserror::Error;

/// Errors that can occur while evaluating objectives, data and metrics.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// Dimension mismatch between vectors or matrices.
    ///
    /// Raised when a parameter vector does not match its layout or when the
    /// data matrix and covariance disagree on the feature count.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A model parameter is outside its valid range.
    #[error("Invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of why the parameter is invalid
        reason: String,
    },

    /// A recovery metric is undefined for the given vectors.
    ///
    /// The cosine similarity has no value when either vector has zero norm.
    #[error("Recovery metric is undefined: {reason}")]
    UndefinedMetric {
        /// Description of the degenerate input
        reason: String,
    },

    /// Numerical instability detected.
    #[error("Numerical instability detected: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },
}

impl ModelError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an InvalidParameter error with a custom reason.
    pub fn invalid_parameter<S: Into<String>>(reason: S) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Create an UndefinedMetric error with a custom reason.
    pub fn undefined_metric<S: Into<String>>(reason: S) -> Self {
        Self::UndefinedMetric {
            reason: reason.into(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during optimization.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Invalid optimizer configuration.
    ///
    /// This error occurs when the optimizer is configured with invalid
    /// parameters (e.g., a negative or non-finite step size).
    #[error("Invalid optimizer configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// The iterate degenerated and the next step cannot be taken.
    #[error("Numerical breakdown at iteration {iteration}: {reason}")]
    NumericalBreakdown {
        /// Iteration at which the breakdown was detected
        iteration: usize,
        /// Description of the breakdown
        reason: String,
    },

    /// Propagated model error.
    #[error("Model evaluation failed: {0}")]
    Model(#[from] ModelError),
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a NumericalBreakdown error.
    pub fn numerical_breakdown<S: Into<String>>(iteration: usize, reason: S) -> Self {
        Self::NumericalBreakdown {
            iteration,
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce ModelError.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Result type alias for optimizer operations.
pub type OptimizerResult<T> = std::result::Result<T, OptimizerError>;
