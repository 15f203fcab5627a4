//! Connectivity index: per-neuron outgoing synapse lists and indexed
//! `(pre, post)` resolution
//!
//! Replaces the linear scan over all synapses during propagation with
//! hash lookups; maintained incrementally on every synapse create and
//! delete, and rebuildable from the store after bulk changes.

use crate::{
    ids::{NeuronId, SynapseId},
    synapse::Synapse,
};
use std::collections::HashMap;

/// Index from neurons to their outgoing synapses
///
/// Holds only non-owning IDs derived from the entity store. When
/// several live synapses share a `(pre, post)` pair, resolution returns
/// the earliest-created one.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityIndex {
    /// Outgoing synapse IDs per presynaptic neuron, in creation order
    outgoing: HashMap<NeuronId, Vec<SynapseId>>,
    /// Earliest-created synapse per (pre, post) pair
    by_pair: HashMap<(NeuronId, NeuronId), SynapseId>,
}

impl ConnectivityIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            outgoing: HashMap::new(),
            by_pair: HashMap::new(),
        }
    }

    /// Create with initial capacity
    pub fn with_capacity(neuron_capacity: usize, synapse_capacity: usize) -> Self {
        Self {
            outgoing: HashMap::with_capacity(neuron_capacity),
            by_pair: HashMap::with_capacity(synapse_capacity),
        }
    }

    /// Record a newly created synapse
    pub fn insert(&mut self, synapse: &Synapse) {
        self.outgoing
            .entry(synapse.pre())
            .or_default()
            .push(synapse.id());
        self.by_pair
            .entry((synapse.pre(), synapse.post()))
            .or_insert(synapse.id());
    }

    /// Drop a deleted synapse from the index
    ///
    /// Returns true when the synapse was the `(pre, post)` resolution
    /// winner, in which case the caller must re-bind the pair to the
    /// next earliest-created synapse (the index does not own the
    /// records needed to find it).
    pub fn remove(&mut self, synapse: &Synapse) -> bool {
        if let Some(ids) = self.outgoing.get_mut(&synapse.pre()) {
            ids.retain(|&id| id != synapse.id());
            if ids.is_empty() {
                self.outgoing.remove(&synapse.pre());
            }
        }

        let pair = (synapse.pre(), synapse.post());
        if self.by_pair.get(&pair) == Some(&synapse.id()) {
            self.by_pair.remove(&pair);
            return true;
        }
        false
    }

    /// Re-bind a `(pre, post)` pair after its winner was removed
    pub fn bind_pair(&mut self, pre: NeuronId, post: NeuronId, id: SynapseId) {
        self.by_pair.insert((pre, post), id);
    }

    /// Resolve the synapse carrying signals from `pre` to `post`
    pub fn resolve(&self, pre: NeuronId, post: NeuronId) -> Option<SynapseId> {
        self.by_pair.get(&(pre, post)).copied()
    }

    /// Outgoing synapse IDs of a neuron, in creation order
    pub fn outgoing_of(&self, pre: NeuronId) -> &[SynapseId] {
        self.outgoing.get(&pre).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of indexed (pre, post) pairs
    pub fn pair_count(&self) -> usize {
        self.by_pair.len()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.outgoing.clear();
        self.by_pair.clear();
    }

    /// Rebuild the index from scratch
    ///
    /// `synapses` must be supplied in creation order so pair resolution
    /// keeps its earliest-created tie-break.
    pub fn rebuild<'a>(&mut self, synapses: impl Iterator<Item = &'a Synapse>) {
        self.clear();
        for synapse in synapses {
            self.insert(synapse);
        }
    }
}
