//! Discrete-time spiking neural network simulation engine
//!
//! This crate drives the graph owned by `dsnn-graph` through a
//! synchronous scheduler with deterministic per-step firing and
//! propagation order. Hosts issue commands through the [`Engine`] API,
//! which also surfaces the allocation-instrumentation hook behind
//! `memory_stats`. Execution is single-threaded and cooperative; one
//! `step` runs to completion.

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export essential types from the graph layer
pub use dsnn_graph::{
    Activation, ConnectivityIndex, EntityKind, EntityStore, GraphError, Neuron, NeuronId,
    NeuronKind, NeuronParams, Plasticity, SimTime, Synapse, SynapseId, SynapseKind,
};

// Core modules
pub mod engine;
pub mod error;
pub mod mem;
pub mod scheduler;

// Re-export essential types
pub use engine::{
    Engine, EngineConfig, NeuronOverrides, NeuronParam, NeuronStateView, SynapseOverrides,
};
pub use error::{EngineError, Result};
pub use mem::{MemoryStats, TrackingAlloc};
pub use scheduler::Scheduler;

/// Engine crate version for compatibility checking
pub const ENGINE_VERSION: u32 = 1;

/// Default simulation time step (time-units)
pub const DEFAULT_DT: f32 = 1.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_integration() {
        let engine = Engine::init();
        assert!(engine.is_running());
        assert_eq!(engine.clock(), SimTime::ZERO);
        assert!(EngineConfig::default().validate().is_ok());
        assert!(DEFAULT_DT > 0.0);
    }
}
