//! Error types for the simulation engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur in the simulation engine
///
/// A `NotInitialized` state is unrepresentable here: an [`crate::Engine`]
/// value only exists after `init`, so the lifecycle taxonomy reduces to
/// [`EngineError::NotRunning`] after an explicit shutdown.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Graph layer error
    #[error("Graph error: {source}")]
    Graph {
        #[from]
        /// Source graph error
        source: dsnn_graph::GraphError,
    },

    /// Command issued after shutdown
    #[error("Engine is not running")]
    NotRunning,

    /// Malformed argument to an engine operation
    #[error("Invalid argument {parameter}: {value} (expected {constraint})")]
    InvalidArgument {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },
}

impl EngineError {
    /// Create an invalid-argument error
    pub fn invalid_argument(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}
