//! Simulation scheduler: time steps, firing detection, propagation
//!
//! A step is synchronous and runs to completion; the scheduler never
//! fails on a malformed entity (stale synapse endpoint, unknown input
//! target) — it skips and continues. Store-level errors stay with the
//! store.

use dsnn_graph::{EntityStore, NeuronId, SimTime};

/// Drives the simulation clock over an [`EntityStore`]
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    clock: SimTime,
}

impl Scheduler {
    /// Create a scheduler with the clock at zero
    pub fn new() -> Self {
        Self { clock: SimTime::ZERO }
    }

    /// Current simulation time
    pub fn clock(&self) -> SimTime {
        self.clock
    }

    /// Advance the simulation by one step of `dt` time-units
    ///
    /// Phases, in order: apply external inputs, advance the clock,
    /// compute-then-fire every live neuron in creation order, then
    /// propagate every firing through the connectivity index. Signals
    /// land after the receiving neuron's own per-step decay, so they
    /// influence the *next* step's leak.
    ///
    /// Returns the per-neuron activation outputs in creation order.
    /// Deterministic: identical graphs and input sequences produce
    /// bit-identical outputs.
    pub fn step(&mut self, store: &mut EntityStore, inputs: &[(NeuronId, f32)], dt: f32) -> Vec<f32> {
        for &(id, value) in inputs {
            match store.neuron_mut(id) {
                Some(neuron) => neuron.potential += value,
                None => log::debug!("input for unknown neuron {} ignored", id),
            }
        }

        self.clock = self.clock + dt;
        let now = self.clock;

        // Snapshot the iteration order up front; deletes elsewhere can
        // never invalidate a step already in progress.
        let order: Vec<NeuronId> = store.neuron_ids().to_vec();
        let mut outputs = Vec::with_capacity(order.len());
        let mut fired: Vec<NeuronId> = Vec::new();

        for &id in &order {
            if let Some(neuron) = store.neuron_mut(id) {
                outputs.push(neuron.compute(0.0, dt));
                if neuron.fire(now) {
                    fired.push(id);
                }
            }
        }

        for &pre in &fired {
            let targets: Vec<NeuronId> = match store.find_neuron(pre) {
                Some(neuron) => neuron.outgoing().to_vec(),
                None => continue,
            };

            for target in targets {
                let synapse_id = match store.resolve_synapse(pre, target) {
                    Some(id) => id,
                    None => continue,
                };
                let signal = match store.synapse_mut(synapse_id) {
                    Some(synapse) => synapse.activate(1.0, now),
                    None => continue,
                };
                match store.neuron_mut(target) {
                    Some(neuron) => neuron.potential += signal,
                    None => log::debug!("target {} of firing {} is gone, skipped", target, pre),
                }
            }
        }

        outputs
    }

    /// Reset every neuron and synapse and zero the clock
    pub fn reset(&mut self, store: &mut EntityStore) {
        for neuron in store.neurons_mut() {
            neuron.reset();
        }
        for synapse in store.synapses_mut() {
            synapse.reset();
        }
        self.clock = SimTime::ZERO;
        log::info!("simulation reset");
    }
}
