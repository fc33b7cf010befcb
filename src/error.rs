//! Error types for the TSP genetic algorithm.
//!
//! Three classes matter to callers:
//!
//! - [`TspError::InvalidInput`]: the problem definition is inconsistent.
//!   Fatal to that problem instance only.
//! - [`TspError::InvalidArgument`]: a configuration value is out of range.
//!   Fatal to that run only.
//! - [`TspError::InternalInvariant`]: a logic defect (non-terminating PMX
//!   resolution, generation construction making no progress). The run is
//!   aborted instead of returning a corrupted tour.

use thiserror::Error;

/// Result type alias for crate operations.
pub type TspResult<T> = Result<T, TspError>;

/// Unified error type for all crate operations.
#[derive(Debug, Error)]
pub enum TspError {
    /// Malformed or inconsistent problem definition.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What is wrong with the input.
        message: String,
    },

    /// Out-of-range configuration value.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Which argument and why.
        message: String,
    },

    /// A broken internal invariant. Never expected in normal operation.
    #[error("internal invariant violated: {message}")]
    InternalInvariant {
        /// Diagnostic context.
        message: String,
    },

    /// Syntax error in a TSPLIB file.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Description of the offending token.
        message: String,
    },

    /// I/O failure while reading instances or writing results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker pool could not be created.
    #[error("worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl TspError {
    /// Shorthand for [`TspError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Shorthand for [`TspError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Shorthand for [`TspError::InternalInvariant`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalInvariant {
            message: message.into(),
        }
    }

    /// Returns `true` for errors that indicate a bug rather than bad data.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InternalInvariant { .. })
    }
}
