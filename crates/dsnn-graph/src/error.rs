//! Error types for the graph data layer

use core::fmt;
use thiserror::Error;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Kind of entity an operation referred to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A neuron record
    Neuron,
    /// A synapse record
    Synapse,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neuron => write!(f, "neuron"),
            Self::Synapse => write!(f, "synapse"),
        }
    }
}

/// Errors that can occur in the graph data layer
#[derive(Error, Debug)]
pub enum GraphError {
    /// Create with an ID that is already live
    #[error("{entity} {id} already exists")]
    DuplicateId {
        /// Kind of entity the ID collided on
        entity: EntityKind,
        /// The colliding ID
        id: u32,
    },

    /// Operate on an ID with no live entity
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity that was looked up
        entity: EntityKind,
        /// The absent ID
        id: u32,
    },

    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Host ran out of memory while growing a store
    #[error("Out of memory while storing {entity} records")]
    AllocationFailure {
        /// Kind of entity being stored
        entity: EntityKind,
    },
}

impl GraphError {
    /// Create a duplicate-ID error
    pub fn duplicate_id(entity: EntityKind, id: u32) -> Self {
        Self::DuplicateId { entity, id }
    }

    /// Create a not-found error
    pub fn not_found(entity: EntityKind, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }

    /// Create an allocation-failure error
    pub fn allocation_failure(entity: EntityKind) -> Self {
        Self::AllocationFailure { entity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GraphError::duplicate_id(EntityKind::Neuron, 3);
        assert!(matches!(err, GraphError::DuplicateId { .. }));

        let err = GraphError::invalid_parameter("refractory_period", "-1.0", ">= 0.0");
        assert!(matches!(err, GraphError::InvalidParameter { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = GraphError::not_found(EntityKind::Synapse, 42);
        let msg = format!("{}", err);
        assert!(msg.contains("synapse 42 not found"));

        let err = GraphError::duplicate_id(EntityKind::Neuron, 7);
        assert!(format!("{}", err).contains("neuron 7 already exists"));
    }
}
