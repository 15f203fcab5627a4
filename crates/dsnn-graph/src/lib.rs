//! Graph data layer for the discrete-time SNN simulation engine
//!
//! This crate owns the simulation graph: neuron and synapse records with
//! their per-entity state machines, plus the entity store that enforces
//! ID uniqueness. Spike propagation resolves synapses through the
//! connectivity index instead of scanning. The scheduler and host-facing
//! API live in `dsnn-engine`.

#![deny(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod connectivity;
pub mod error;
pub mod ids;
pub mod neuron;
pub mod store;
pub mod synapse;

// Re-export essential types
pub use connectivity::ConnectivityIndex;
pub use error::{EntityKind, GraphError, Result};
pub use ids::{NeuronId, SimTime, SynapseId};
pub use neuron::{Activation, Neuron, NeuronKind, NeuronParams, LEAK_RATE};
pub use store::EntityStore;
pub use synapse::{Plasticity, Synapse, SynapseKind};

/// Graph crate version for compatibility checking
pub const GRAPH_VERSION: u32 = 1;
