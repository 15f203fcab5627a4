//! Synapse model: weighted, delay-gated edges with optional STDP

use crate::ids::{NeuronId, SimTime, SynapseId};

/// Learning rate for the STDP weight update
pub const STDP_LEARNING_RATE: f32 = 0.01;

/// Time constant of the STDP exponential window (time-units)
pub const STDP_TIME_CONSTANT: f32 = 20.0;

/// Default transmission delay (time-units)
pub const DEFAULT_DELAY: f32 = 1.0;

/// Default weight bounds
pub const DEFAULT_MIN_WEIGHT: f32 = -1.0;
/// Default weight bounds
pub const DEFAULT_MAX_WEIGHT: f32 = 1.0;

/// Synapse kind; fixes the default weight sign and magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SynapseKind {
    /// Default weight +0.5
    Excitatory,
    /// Default weight -0.5
    Inhibitory,
    /// Default weight +0.1
    Modulatory,
}

impl SynapseKind {
    /// Default weight for this kind
    pub const fn default_weight(&self) -> f32 {
        match self {
            Self::Excitatory => 0.5,
            Self::Inhibitory => -0.5,
            Self::Modulatory => 0.1,
        }
    }
}

/// Plasticity rule attached to a synapse
///
/// Only [`Plasticity::Stdp`] is active in the weight update rule; the
/// other variants are carried as inert tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Plasticity {
    /// Fixed weight
    Static,
    /// Spike-timing dependent plasticity
    Stdp,
    /// Hebbian (inert)
    Hebbian,
    /// Homeostatic (inert)
    Homeostatic,
}

/// A synapse record: a weighted, delay-gated edge between two neurons
///
/// The endpoints are held as IDs and may dangle after a neuron is
/// deleted; a dangling synapse is inert, never an error.
#[derive(Debug, Clone)]
pub struct Synapse {
    id: SynapseId,
    pre: NeuronId,
    post: NeuronId,
    kind: SynapseKind,
    /// Plasticity rule
    pub plasticity: Plasticity,
    /// Synaptic weight, kept within `[min_weight, max_weight]`
    pub weight: f32,
    /// Transmission delay (time-units)
    pub delay: f32,
    /// Lower weight bound
    pub min_weight: f32,
    /// Upper weight bound
    pub max_weight: f32,
    last_active: SimTime,
}

impl Synapse {
    /// Create a new synapse with kind-derived default weight
    pub fn new(id: SynapseId, pre: NeuronId, post: NeuronId, kind: SynapseKind) -> Self {
        Self {
            id,
            pre,
            post,
            kind,
            plasticity: Plasticity::Static,
            weight: kind.default_weight(),
            delay: DEFAULT_DELAY,
            min_weight: DEFAULT_MIN_WEIGHT,
            max_weight: DEFAULT_MAX_WEIGHT,
            last_active: SimTime::FAR_PAST,
        }
    }

    /// Get the synapse ID
    pub fn id(&self) -> SynapseId {
        self.id
    }

    /// Presynaptic neuron ID
    pub fn pre(&self) -> NeuronId {
        self.pre
    }

    /// Postsynaptic neuron ID
    pub fn post(&self) -> NeuronId {
        self.post
    }

    /// Get the synapse kind
    pub fn kind(&self) -> SynapseKind {
        self.kind
    }

    /// Time of the most recent delivery, or [`SimTime::FAR_PAST`] if the
    /// synapse has never been activated
    pub fn last_active(&self) -> SimTime {
        self.last_active
    }

    /// Deliver a presynaptic signal through the synapse
    ///
    /// Returns 0 with no state change while a previous signal is still
    /// in flight (`now < last_active + delay`); otherwise records the
    /// activation and returns `input * weight`. A spike arriving inside
    /// the delay window is dropped, not queued.
    pub fn activate(&mut self, input: f32, now: SimTime) -> f32 {
        if now.raw() < self.last_active.raw() + self.delay {
            return 0.0;
        }

        self.last_active = now;
        let output = input * self.weight;
        log::debug!("synapse {} activated at {} with output {:.4}", self.id, now, output);
        output
    }

    /// Apply the STDP rule for one pre/post spike pairing
    ///
    /// No-op unless `plasticity` is [`Plasticity::Stdp`]. A positive
    /// `post - pre` interval potentiates, a negative one depresses, with
    /// exponential falloff over [`STDP_TIME_CONSTANT`]. The weight is
    /// clamped into `[min_weight, max_weight]` afterwards.
    pub fn update_weight(&mut self, pre_spike_time: SimTime, post_spike_time: SimTime) {
        if self.plasticity != Plasticity::Stdp {
            return;
        }

        let dt = post_spike_time.raw() - pre_spike_time.raw();
        let dw = if dt > 0.0 {
            STDP_LEARNING_RATE * (-dt / STDP_TIME_CONSTANT).exp()
        } else {
            -STDP_LEARNING_RATE * (dt / STDP_TIME_CONSTANT).exp()
        };

        self.weight = (self.weight + dw).max(self.min_weight).min(self.max_weight);
        log::debug!("updated synapse {} weight to {:.4}", self.id, self.weight);
    }

    /// Clear the delivery history
    pub fn reset(&mut self) {
        self.last_active = SimTime::FAR_PAST;
        log::debug!("reset synapse {}", self.id);
    }
}
