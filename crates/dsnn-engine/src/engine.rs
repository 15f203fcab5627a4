//! Host-facing command API over one simulation instance
//!
//! One [`Engine`] value is one simulation: owning it is holding the
//! handle, and `&mut self` enforces the single-owner execution model. A
//! host that needs concurrent access (command front end plus a metrics
//! poller) must wrap the whole engine in one exclusive lock.

use crate::{
    error::*,
    mem::{self, MemoryStats},
    scheduler::Scheduler,
};
use dsnn_graph::{
    Activation, EntityKind, EntityStore, GraphError, NeuronId, NeuronKind, NeuronParams,
    Plasticity, SimTime, SynapseId, SynapseKind,
};

/// Optional per-neuron parameter overrides at creation
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronOverrides {
    /// Firing threshold (mV)
    pub threshold: Option<f32>,
    /// Resting potential (mV)
    pub rest_potential: Option<f32>,
    /// Refractory period (time-units)
    pub refractory_period: Option<f32>,
}

impl NeuronOverrides {
    fn apply_to(&self, defaults: &NeuronParams) -> std::result::Result<NeuronParams, GraphError> {
        NeuronParams::new(
            self.threshold.unwrap_or(defaults.threshold),
            self.rest_potential.unwrap_or(defaults.rest_potential),
            self.refractory_period.unwrap_or(defaults.refractory_period),
        )
    }
}

/// Optional per-synapse overrides at creation
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynapseOverrides {
    /// Synaptic weight
    pub weight: Option<f32>,
    /// Transmission delay (time-units)
    pub delay: Option<f32>,
}

/// Writable neuron parameter selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeuronParam {
    /// Firing threshold
    Threshold,
    /// Resting potential
    RestPotential,
    /// Refractory period
    RefractoryPeriod,
    /// Membrane potential
    Potential,
}

/// Snapshot of one neuron's observable state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronStateView {
    /// Membrane potential (mV)
    pub potential: f32,
    /// Time of the most recent firing, or the far-past sentinel
    pub last_fired_time: SimTime,
}

/// Engine configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Initial neuron store capacity
    pub neuron_capacity: usize,
    /// Initial synapse store capacity
    pub synapse_capacity: usize,
    /// Default parameters for neurons created without overrides
    pub neuron_defaults: NeuronParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            neuron_capacity: 100,
            synapse_capacity: 500,
            neuron_defaults: NeuronParams::default(),
        }
    }
}

impl EngineConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.neuron_defaults.validate()?;
        Ok(())
    }
}

/// One simulation instance: entity store, connectivity index, scheduler
#[derive(Debug)]
pub struct Engine {
    store: EntityStore,
    scheduler: Scheduler,
    config: EngineConfig,
    running: bool,
}

impl Engine {
    /// Initialize a simulation instance with default configuration
    pub fn init() -> Self {
        Self::from_config(EngineConfig::default())
    }

    /// Initialize a simulation instance with validated configuration
    pub fn init_with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: EngineConfig) -> Self {
        let store = EntityStore::with_capacity(config.neuron_capacity, config.synapse_capacity);
        log::info!("engine initialized");
        Self {
            store,
            scheduler: Scheduler::new(),
            config,
            running: true,
        }
    }

    /// Decline further commands without tearing down state
    ///
    /// Subsequent commands fail with [`EngineError::NotRunning`];
    /// dropping the engine releases everything.
    pub fn shutdown(&mut self) {
        if self.running {
            log::info!("engine shut down");
        }
        self.running = false;
    }

    /// Whether the engine still accepts commands
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn ensure_running(&self) -> Result<()> {
        if self.running {
            Ok(())
        } else {
            Err(EngineError::NotRunning)
        }
    }

    fn ensure_finite(parameter: &str, value: f32) -> Result<()> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(EngineError::invalid_argument(
                parameter,
                value.to_string(),
                "finite",
            ))
        }
    }

    fn ensure_dt(dt: f32) -> Result<()> {
        if dt.is_finite() && dt > 0.0 {
            Ok(())
        } else {
            Err(EngineError::invalid_argument("dt", dt.to_string(), "> 0.0 and finite"))
        }
    }

    /// Create a neuron, applying overrides on top of the configured
    /// defaults
    pub fn create_neuron(
        &mut self,
        id: u32,
        kind: NeuronKind,
        activation: Activation,
        overrides: NeuronOverrides,
    ) -> Result<u32> {
        self.ensure_running()?;
        let params = overrides.apply_to(&self.config.neuron_defaults)?;
        let id = self
            .store
            .create_neuron_with_params(NeuronId::new(id), kind, activation, params)?;
        log::info!("created neuron {}", id);
        Ok(id.raw())
    }

    /// Delete a neuron; its synapses stay live but inert
    pub fn delete_neuron(&mut self, id: u32) -> Result<()> {
        self.ensure_running()?;
        self.store.delete_neuron(NeuronId::new(id))?;
        log::info!("deleted neuron {}", NeuronId::new(id));
        Ok(())
    }

    /// Record an outgoing connection from `source_id` to `target_id`
    ///
    /// Both endpoints must be live. An already-present connection is
    /// a non-error no-op.
    pub fn connect(&mut self, source_id: u32, target_id: u32) -> Result<()> {
        self.ensure_running()?;
        let source = NeuronId::new(source_id);
        let target = NeuronId::new(target_id);

        if self.store.find_neuron(target).is_none() {
            return Err(GraphError::not_found(EntityKind::Neuron, target_id).into());
        }
        match self.store.neuron_mut(source) {
            Some(neuron) => {
                neuron.connect(target);
                Ok(())
            }
            None => Err(GraphError::not_found(EntityKind::Neuron, source_id).into()),
        }
    }

    /// Remove the connection from `source_id` to `target_id`
    ///
    /// Both endpoints must be live. A missing connection is a non-error
    /// no-op.
    pub fn disconnect(&mut self, source_id: u32, target_id: u32) -> Result<()> {
        self.ensure_running()?;
        let source = NeuronId::new(source_id);
        let target = NeuronId::new(target_id);

        if self.store.find_neuron(target).is_none() {
            return Err(GraphError::not_found(EntityKind::Neuron, target_id).into());
        }
        match self.store.neuron_mut(source) {
            Some(neuron) => {
                neuron.disconnect(target);
                Ok(())
            }
            None => Err(GraphError::not_found(EntityKind::Neuron, source_id).into()),
        }
    }

    /// Create a synapse, applying weight/delay overrides on top of the
    /// kind-derived defaults
    ///
    /// The endpoints are not required to resolve; a dangling synapse is
    /// inert.
    pub fn create_synapse(
        &mut self,
        id: u32,
        pre_id: u32,
        post_id: u32,
        kind: SynapseKind,
        overrides: SynapseOverrides,
    ) -> Result<u32> {
        self.ensure_running()?;
        if let Some(weight) = overrides.weight {
            Self::ensure_finite("weight", weight)?;
        }
        if let Some(delay) = overrides.delay {
            Self::ensure_finite("delay", delay)?;
            if delay < 0.0 {
                return Err(EngineError::invalid_argument(
                    "delay",
                    delay.to_string(),
                    ">= 0.0",
                ));
            }
        }

        let id = self.store.create_synapse(
            SynapseId::new(id),
            NeuronId::new(pre_id),
            NeuronId::new(post_id),
            kind,
        )?;
        if let Some(synapse) = self.store.synapse_mut(id) {
            if let Some(weight) = overrides.weight {
                synapse.weight = weight;
            }
            if let Some(delay) = overrides.delay {
                synapse.delay = delay;
            }
        }
        log::info!("created synapse {}", id);
        Ok(id.raw())
    }

    /// Delete a synapse
    pub fn delete_synapse(&mut self, id: u32) -> Result<()> {
        self.ensure_running()?;
        self.store.delete_synapse(SynapseId::new(id))?;
        log::info!("deleted synapse {}", SynapseId::new(id));
        Ok(())
    }

    /// Advance the simulation by one step
    ///
    /// `inputs` maps neuron IDs to added potential; unknown IDs are
    /// ignored. Returns per-neuron activation outputs in creation order.
    pub fn step(&mut self, inputs: &[(u32, f32)], dt: f32) -> Result<Vec<f32>> {
        self.ensure_running()?;
        Self::ensure_dt(dt)?;

        let inputs: Vec<(NeuronId, f32)> = inputs
            .iter()
            .map(|&(id, value)| (NeuronId::new(id), value))
            .collect();
        Ok(self.scheduler.step(&mut self.store, &inputs, dt))
    }

    /// Advance the simulation by `num_steps` steps with no external
    /// inputs and return the resulting simulation time
    pub fn run_steps(&mut self, num_steps: u32, dt: f32) -> Result<SimTime> {
        self.ensure_running()?;
        Self::ensure_dt(dt)?;

        log::info!("running {} steps with dt {}", num_steps, dt);
        for _ in 0..num_steps {
            self.scheduler.step(&mut self.store, &[], dt);
        }
        Ok(self.scheduler.clock())
    }

    /// Reset every neuron and synapse and zero the clock
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_running()?;
        self.scheduler.reset(&mut self.store);
        Ok(())
    }

    /// Read one neuron's observable state
    pub fn get_neuron_state(&self, id: u32) -> Result<NeuronStateView> {
        self.ensure_running()?;
        let neuron = self
            .store
            .find_neuron(NeuronId::new(id))
            .ok_or(GraphError::not_found(EntityKind::Neuron, id))?;
        Ok(NeuronStateView {
            potential: neuron.potential,
            last_fired_time: neuron.last_fired(),
        })
    }

    /// Overwrite one writable neuron parameter
    pub fn set_neuron_param(&mut self, id: u32, param: NeuronParam, value: f32) -> Result<()> {
        self.ensure_running()?;
        Self::ensure_finite("value", value)?;

        let neuron = self
            .store
            .neuron_mut(NeuronId::new(id))
            .ok_or(GraphError::not_found(EntityKind::Neuron, id))?;
        match param {
            NeuronParam::Threshold => neuron.params.threshold = value,
            NeuronParam::RestPotential => neuron.params.rest_potential = value,
            NeuronParam::RefractoryPeriod => neuron.params.refractory_period = value,
            NeuronParam::Potential => neuron.potential = value,
        }
        log::info!("set {:?} of neuron {} to {}", param, NeuronId::new(id), value);
        Ok(())
    }

    /// Select the plasticity rule of one synapse
    ///
    /// Only [`Plasticity::Stdp`] makes `update_synapse_weight` active;
    /// the other rules are carried as inert tags.
    pub fn set_synapse_plasticity(&mut self, id: u32, plasticity: Plasticity) -> Result<()> {
        self.ensure_running()?;
        let synapse = self
            .store
            .synapse_mut(SynapseId::new(id))
            .ok_or(GraphError::not_found(EntityKind::Synapse, id))?;
        synapse.plasticity = plasticity;
        Ok(())
    }

    /// Apply the STDP rule to one synapse for a pre/post spike pairing
    pub fn update_synapse_weight(
        &mut self,
        id: u32,
        pre_spike_time: SimTime,
        post_spike_time: SimTime,
    ) -> Result<()> {
        self.ensure_running()?;
        let synapse = self
            .store
            .synapse_mut(SynapseId::new(id))
            .ok_or(GraphError::not_found(EntityKind::Synapse, id))?;
        synapse.update_weight(pre_spike_time, post_spike_time);
        Ok(())
    }

    /// Read one synapse's current weight
    pub fn synapse_weight(&self, id: u32) -> Result<f32> {
        self.ensure_running()?;
        let synapse = self
            .store
            .find_synapse(SynapseId::new(id))
            .ok_or(GraphError::not_found(EntityKind::Synapse, id))?;
        Ok(synapse.weight)
    }

    /// Tracked allocation counters; zeros when the host has not
    /// installed [`crate::mem::TrackingAlloc`]
    pub fn memory_stats(&self) -> MemoryStats {
        mem::stats()
    }

    /// Number of live neurons
    pub fn neuron_count(&self) -> usize {
        self.store.neuron_count()
    }

    /// Number of live synapses
    pub fn synapse_count(&self) -> usize {
        self.store.synapse_count()
    }

    /// Current simulation time
    pub fn clock(&self) -> SimTime {
        self.scheduler.clock()
    }

    /// Borrow the underlying store for host-side inspection
    pub fn store(&self) -> &EntityStore {
        &self.store
    }
}
