//! Entity store: single owner of all neuron and synapse records
//!
//! IDs are caller-assigned and unique among live entities; lookups are
//! hash-indexed O(1). Creation order is kept in side lists because it is
//! the scheduler's iteration order and the `step` output order.

use crate::{
    connectivity::ConnectivityIndex,
    error::*,
    ids::{NeuronId, SimTime, SynapseId},
    neuron::{Activation, Neuron, NeuronKind, NeuronParams},
    synapse::{Synapse, SynapseKind},
};
use std::collections::HashMap;

/// Owning store for the simulation graph
///
/// Deleting a neuron leaves its synapses in place; they become inert
/// (propagation no-ops on the dangling endpoint). Callers that iterate
/// while mutating must snapshot the ID lists first; the store never
/// hands out iterators that survive a mutation.
#[derive(Debug, Default)]
pub struct EntityStore {
    neurons: HashMap<NeuronId, Neuron>,
    neuron_order: Vec<NeuronId>,
    synapses: HashMap<SynapseId, Synapse>,
    synapse_order: Vec<SynapseId>,
    index: ConnectivityIndex,
}

impl EntityStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial capacity for the expected graph size
    pub fn with_capacity(neuron_capacity: usize, synapse_capacity: usize) -> Self {
        Self {
            neurons: HashMap::with_capacity(neuron_capacity),
            neuron_order: Vec::with_capacity(neuron_capacity),
            synapses: HashMap::with_capacity(synapse_capacity),
            synapse_order: Vec::with_capacity(synapse_capacity),
            index: ConnectivityIndex::with_capacity(neuron_capacity, synapse_capacity),
        }
    }

    /// Create a neuron with default parameters
    pub fn create_neuron(
        &mut self,
        id: NeuronId,
        kind: NeuronKind,
        activation: Activation,
    ) -> Result<NeuronId> {
        self.create_neuron_with_params(id, kind, activation, NeuronParams::default())
    }

    /// Create a neuron with specific parameters
    pub fn create_neuron_with_params(
        &mut self,
        id: NeuronId,
        kind: NeuronKind,
        activation: Activation,
        params: NeuronParams,
    ) -> Result<NeuronId> {
        params.validate()?;
        if self.neurons.contains_key(&id) {
            return Err(GraphError::duplicate_id(EntityKind::Neuron, id.raw()));
        }

        self.neuron_order
            .try_reserve(1)
            .map_err(|_| GraphError::allocation_failure(EntityKind::Neuron))?;
        self.neurons.insert(id, Neuron::new(id, kind, activation, params));
        self.neuron_order.push(id);

        log::debug!("created neuron {}", id);
        Ok(id)
    }

    /// Create a synapse with kind-derived defaults
    ///
    /// The endpoints are not required to resolve to live neurons; a
    /// synapse with a dangling endpoint is inert, never an error.
    pub fn create_synapse(
        &mut self,
        id: SynapseId,
        pre: NeuronId,
        post: NeuronId,
        kind: SynapseKind,
    ) -> Result<SynapseId> {
        if self.synapses.contains_key(&id) {
            return Err(GraphError::duplicate_id(EntityKind::Synapse, id.raw()));
        }

        self.synapse_order
            .try_reserve(1)
            .map_err(|_| GraphError::allocation_failure(EntityKind::Synapse))?;
        let synapse = Synapse::new(id, pre, post, kind);
        self.index.insert(&synapse);
        self.synapses.insert(id, synapse);
        self.synapse_order.push(id);

        log::debug!("created synapse {} from {} to {}", id, pre, post);
        Ok(id)
    }

    /// Delete a neuron
    ///
    /// Synapses referencing the neuron stay live but inert, and other
    /// neurons' outgoing-target lists keep the stale ID; propagation
    /// skips both silently.
    pub fn delete_neuron(&mut self, id: NeuronId) -> Result<()> {
        if self.neurons.remove(&id).is_none() {
            return Err(GraphError::not_found(EntityKind::Neuron, id.raw()));
        }
        self.neuron_order.retain(|&n| n != id);

        log::debug!("deleted neuron {}", id);
        Ok(())
    }

    /// Delete a synapse, keeping the connectivity index consistent
    pub fn delete_synapse(&mut self, id: SynapseId) -> Result<()> {
        let synapse = self
            .synapses
            .remove(&id)
            .ok_or(GraphError::not_found(EntityKind::Synapse, id.raw()))?;
        self.synapse_order.retain(|&s| s != id);

        if self.index.remove(&synapse) {
            // The removed synapse was the (pre, post) winner; re-bind the
            // pair to the next earliest-created synapse, if any.
            let replacement = self
                .synapse_order
                .iter()
                .filter_map(|sid| self.synapses.get(sid))
                .find(|s| s.pre() == synapse.pre() && s.post() == synapse.post())
                .map(Synapse::id);
            if let Some(next) = replacement {
                self.index.bind_pair(synapse.pre(), synapse.post(), next);
            }
        }

        log::debug!("deleted synapse {}", id);
        Ok(())
    }

    /// Read-only neuron lookup
    pub fn find_neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.neurons.get(&id)
    }

    /// Mutable neuron lookup
    pub fn neuron_mut(&mut self, id: NeuronId) -> Option<&mut Neuron> {
        self.neurons.get_mut(&id)
    }

    /// Read-only synapse lookup
    pub fn find_synapse(&self, id: SynapseId) -> Option<&Synapse> {
        self.synapses.get(&id)
    }

    /// Mutable synapse lookup
    pub fn synapse_mut(&mut self, id: SynapseId) -> Option<&mut Synapse> {
        self.synapses.get_mut(&id)
    }

    /// Resolve the synapse carrying signals from `pre` to `post`
    pub fn resolve_synapse(&self, pre: NeuronId, post: NeuronId) -> Option<SynapseId> {
        self.index.resolve(pre, post)
    }

    /// Outgoing synapse IDs of a neuron, in creation order
    pub fn outgoing_synapses(&self, pre: NeuronId) -> &[SynapseId] {
        self.index.outgoing_of(pre)
    }

    /// Live neuron IDs in creation order
    pub fn neuron_ids(&self) -> &[NeuronId] {
        &self.neuron_order
    }

    /// Live synapse IDs in creation order
    pub fn synapse_ids(&self) -> &[SynapseId] {
        &self.synapse_order
    }

    /// Number of live neurons
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of live synapses
    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Mutable iteration over all neurons (order-independent)
    pub fn neurons_mut(&mut self) -> impl Iterator<Item = &mut Neuron> {
        self.neurons.values_mut()
    }

    /// Mutable iteration over all synapses (order-independent)
    pub fn synapses_mut(&mut self) -> impl Iterator<Item = &mut Synapse> {
        self.synapses.values_mut()
    }

    /// Rebuild the connectivity index from the live synapse records
    pub fn rebuild_index(&mut self) {
        let synapses = &self.synapses;
        self.index
            .rebuild(self.synapse_order.iter().filter_map(|id| synapses.get(id)));
    }

    /// Most recent firing time across all neurons, for monotonicity
    /// checks in tests and host diagnostics
    pub fn latest_firing(&self) -> SimTime {
        self.neurons
            .values()
            .map(Neuron::last_fired)
            .fold(SimTime::FAR_PAST, |acc, t| if t > acc { t } else { acc })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_neurons(ids: &[u32]) -> EntityStore {
        let mut store = EntityStore::new();
        for &id in ids {
            store
                .create_neuron(NeuronId::new(id), NeuronKind::Excitatory, Activation::Linear)
                .unwrap();
        }
        store
    }

    #[test]
    fn test_create_and_find() {
        let store = store_with_neurons(&[0, 1, 2]);
        assert_eq!(store.neuron_count(), 3);
        for id in 0..3 {
            assert!(store.find_neuron(NeuronId::new(id)).is_some());
        }
        assert!(store.find_neuron(NeuronId::new(9)).is_none());
    }

    #[test]
    fn test_duplicate_neuron_id_rejected() {
        let mut store = store_with_neurons(&[0]);
        let err = store
            .create_neuron(NeuronId::new(0), NeuronKind::Inhibitory, Activation::Tanh)
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateId { .. }));
        assert_eq!(store.neuron_count(), 1);
    }

    #[test]
    fn test_delete_neuron_then_not_found() {
        let mut store = store_with_neurons(&[0, 1]);
        store.delete_neuron(NeuronId::new(0)).unwrap();
        assert!(store.find_neuron(NeuronId::new(0)).is_none());

        let err = store.delete_neuron(NeuronId::new(0)).unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
    }

    #[test]
    fn test_deleted_id_never_resolves_to_other_neuron() {
        let mut store = store_with_neurons(&[0, 1]);
        store.delete_neuron(NeuronId::new(0)).unwrap();
        // The surviving neuron keeps its own identity
        assert_eq!(store.find_neuron(NeuronId::new(1)).unwrap().id(), NeuronId::new(1));
        assert!(store.find_neuron(NeuronId::new(0)).is_none());
    }

    #[test]
    fn test_creation_order_survives_deletes() {
        let mut store = store_with_neurons(&[5, 3, 8, 1]);
        store.delete_neuron(NeuronId::new(3)).unwrap();
        let order: Vec<u32> = store.neuron_ids().iter().map(|id| id.raw()).collect();
        assert_eq!(order, vec![5, 8, 1]);
    }

    #[test]
    fn test_synapse_with_dangling_endpoints_allowed() {
        let mut store = EntityStore::new();
        // Neither endpoint exists; creation still succeeds
        store
            .create_synapse(
                SynapseId::new(0),
                NeuronId::new(10),
                NeuronId::new(11),
                SynapseKind::Excitatory,
            )
            .unwrap();
        assert_eq!(store.synapse_count(), 1);
        assert_eq!(
            store.resolve_synapse(NeuronId::new(10), NeuronId::new(11)),
            Some(SynapseId::new(0))
        );
    }

    #[test]
    fn test_duplicate_synapse_id_rejected() {
        let mut store = store_with_neurons(&[0, 1]);
        store
            .create_synapse(SynapseId::new(0), NeuronId::new(0), NeuronId::new(1), SynapseKind::Excitatory)
            .unwrap();
        let err = store
            .create_synapse(SynapseId::new(0), NeuronId::new(1), NeuronId::new(0), SynapseKind::Inhibitory)
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateId { .. }));
    }

    #[test]
    fn test_delete_synapse_rebinds_pair() {
        let mut store = store_with_neurons(&[0, 1]);
        store
            .create_synapse(SynapseId::new(0), NeuronId::new(0), NeuronId::new(1), SynapseKind::Excitatory)
            .unwrap();
        store
            .create_synapse(SynapseId::new(1), NeuronId::new(0), NeuronId::new(1), SynapseKind::Inhibitory)
            .unwrap();

        assert_eq!(
            store.resolve_synapse(NeuronId::new(0), NeuronId::new(1)),
            Some(SynapseId::new(0))
        );

        store.delete_synapse(SynapseId::new(0)).unwrap();
        assert_eq!(
            store.resolve_synapse(NeuronId::new(0), NeuronId::new(1)),
            Some(SynapseId::new(1))
        );

        store.delete_synapse(SynapseId::new(1)).unwrap();
        assert_eq!(store.resolve_synapse(NeuronId::new(0), NeuronId::new(1)), None);

        let err = store.delete_synapse(SynapseId::new(1)).unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
    }

    #[test]
    fn test_delete_neuron_leaves_synapses_inert() {
        let mut store = store_with_neurons(&[0, 1]);
        store
            .create_synapse(SynapseId::new(0), NeuronId::new(0), NeuronId::new(1), SynapseKind::Excitatory)
            .unwrap();

        store.delete_neuron(NeuronId::new(1)).unwrap();
        // Synapse survives with a dangling postsynaptic endpoint
        assert_eq!(store.synapse_count(), 1);
        assert_eq!(
            store.resolve_synapse(NeuronId::new(0), NeuronId::new(1)),
            Some(SynapseId::new(0))
        );
    }

    #[test]
    fn test_rebuild_index() {
        let mut store = store_with_neurons(&[0, 1, 2]);
        store
            .create_synapse(SynapseId::new(0), NeuronId::new(0), NeuronId::new(1), SynapseKind::Excitatory)
            .unwrap();
        store
            .create_synapse(SynapseId::new(1), NeuronId::new(1), NeuronId::new(2), SynapseKind::Inhibitory)
            .unwrap();

        store.rebuild_index();
        assert_eq!(
            store.resolve_synapse(NeuronId::new(0), NeuronId::new(1)),
            Some(SynapseId::new(0))
        );
        assert_eq!(
            store.resolve_synapse(NeuronId::new(1), NeuronId::new(2)),
            Some(SynapseId::new(1))
        );
        assert_eq!(store.outgoing_synapses(NeuronId::new(0)), &[SynapseId::new(0)]);
    }

    #[test]
    fn test_latest_firing_tracks_maximum() {
        let mut store = store_with_neurons(&[0, 1]);
        assert_eq!(store.latest_firing(), SimTime::FAR_PAST);

        let n = store.neuron_mut(NeuronId::new(1)).unwrap();
        n.potential = n.params.threshold;
        assert!(n.fire(SimTime::new(4.0)));
        assert_eq!(store.latest_firing(), SimTime::new(4.0));
    }
}
