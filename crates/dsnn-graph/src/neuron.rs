//! Neuron model for the simulation graph

use crate::{
    error::*,
    ids::{NeuronId, SimTime},
};
use smallvec::SmallVec;

/// Fraction of the distance to the rest potential covered by the
/// per-step leak
pub const LEAK_RATE: f32 = 0.1;

/// Neuron kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeuronKind {
    /// Drives downstream potentials up
    Excitatory,
    /// Drives downstream potentials down
    Inhibitory,
}

/// Activation function applied to the membrane potential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Activation {
    /// Identity
    Linear,
    /// `1 / (1 + e^-x)`
    Sigmoid,
    /// `max(x, 0)`
    Relu,
    /// Hyperbolic tangent
    Tanh,
}

impl Activation {
    /// Apply the activation function to a potential value
    pub fn apply(&self, x: f32) -> f32 {
        match self {
            Self::Linear => x,
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::Relu => x.max(0.0),
            Self::Tanh => x.tanh(),
        }
    }
}

/// Tunable per-neuron parameters (mV and time-units)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NeuronParams {
    /// Firing threshold (mV)
    pub threshold: f32,
    /// Resting potential the leak decays toward (mV)
    pub rest_potential: f32,
    /// Minimum time between firings (time-units)
    pub refractory_period: f32,
}

impl Default for NeuronParams {
    fn default() -> Self {
        Self {
            threshold: -55.0,
            rest_potential: -70.0,
            refractory_period: 2.0,
        }
    }
}

impl NeuronParams {
    /// Create new neuron parameters with validation
    pub fn new(threshold: f32, rest_potential: f32, refractory_period: f32) -> Result<Self> {
        if threshold <= rest_potential {
            return Err(GraphError::invalid_parameter(
                "threshold",
                format!("{} (with rest_potential={})", threshold, rest_potential),
                "> rest_potential",
            ));
        }
        if refractory_period < 0.0 {
            return Err(GraphError::invalid_parameter(
                "refractory_period",
                refractory_period.to_string(),
                ">= 0.0",
            ));
        }

        Ok(Self {
            threshold,
            rest_potential,
            refractory_period,
        })
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        Self::new(self.threshold, self.rest_potential, self.refractory_period)?;
        Ok(())
    }
}

/// A neuron record: identity, parameters, and per-step state
#[derive(Debug, Clone)]
pub struct Neuron {
    id: NeuronId,
    kind: NeuronKind,
    activation: Activation,
    /// Tunable parameters
    pub params: NeuronParams,
    /// Membrane potential (mV)
    pub potential: f32,
    last_fired: SimTime,
    outgoing: SmallVec<[NeuronId; 8]>,
}

impl Neuron {
    /// Create a new neuron at rest
    pub fn new(id: NeuronId, kind: NeuronKind, activation: Activation, params: NeuronParams) -> Self {
        let potential = params.rest_potential;
        Self {
            id,
            kind,
            activation,
            params,
            potential,
            last_fired: SimTime::FAR_PAST,
            outgoing: SmallVec::new(),
        }
    }

    /// Get the neuron ID
    pub fn id(&self) -> NeuronId {
        self.id
    }

    /// Get the neuron kind
    pub fn kind(&self) -> NeuronKind {
        self.kind
    }

    /// Get the activation function
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Time of the most recent firing, or [`SimTime::FAR_PAST`] if the
    /// neuron has never fired
    pub fn last_fired(&self) -> SimTime {
        self.last_fired
    }

    /// Outgoing connection targets, in connection order
    pub fn outgoing(&self) -> &[NeuronId] {
        &self.outgoing
    }

    /// Check if the neuron is still inside its refractory window
    pub fn is_refractory(&self, now: SimTime) -> bool {
        now.since(self.last_fired) < self.params.refractory_period
    }

    /// Update the potential for one time step and return the activation
    /// output
    ///
    /// Integrates `external_input * dt`, then leaks toward the rest
    /// potential by [`LEAK_RATE`].
    pub fn compute(&mut self, external_input: f32, dt: f32) -> f32 {
        self.potential += external_input * dt;
        self.potential =
            self.potential * (1.0 - LEAK_RATE) + self.params.rest_potential * LEAK_RATE;
        self.activation.apply(self.potential)
    }

    /// Fire if the potential is at or above threshold and the refractory
    /// window has passed
    ///
    /// Firing records `now` and resets the potential to rest. Returns
    /// whether the neuron fired; a refractory or sub-threshold neuron is
    /// left unmodified.
    pub fn fire(&mut self, now: SimTime) -> bool {
        if self.is_refractory(now) {
            return false;
        }

        if self.potential >= self.params.threshold {
            self.last_fired = now;
            self.potential = self.params.rest_potential;
            log::debug!("neuron {} fired at {}", self.id, now);
            return true;
        }

        false
    }

    /// Restore the potential to rest and clear the firing history
    pub fn reset(&mut self) {
        self.potential = self.params.rest_potential;
        self.last_fired = SimTime::FAR_PAST;
        log::debug!("reset neuron {}", self.id);
    }

    /// Append an outgoing connection target
    ///
    /// Idempotent: an existing connection is reported as a non-error
    /// no-op. Returns whether a new connection was recorded.
    pub fn connect(&mut self, target: NeuronId) -> bool {
        if self.outgoing.contains(&target) {
            log::warn!("connection {} -> {} already exists", self.id, target);
            return false;
        }

        self.outgoing.push(target);
        log::debug!("connected neuron {} to {}", self.id, target);
        true
    }

    /// Remove the first outgoing connection to `target`, compacting the
    /// sequence
    ///
    /// A missing connection is a non-error no-op. Returns whether a
    /// connection was removed.
    pub fn disconnect(&mut self, target: NeuronId) -> bool {
        match self.outgoing.iter().position(|&t| t == target) {
            Some(pos) => {
                self.outgoing.remove(pos);
                log::debug!("disconnected neuron {} from {}", self.id, target);
                true
            }
            None => {
                log::warn!("no connection exists from {} to {}", self.id, target);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neuron(id: u32) -> Neuron {
        Neuron::new(
            NeuronId::new(id),
            NeuronKind::Excitatory,
            Activation::Linear,
            NeuronParams::default(),
        )
    }

    #[test]
    fn test_params_default() {
        let params = NeuronParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.threshold, -55.0);
        assert_eq!(params.rest_potential, -70.0);
        assert_eq!(params.refractory_period, 2.0);
    }

    #[test]
    fn test_params_validation() {
        // Threshold below rest
        assert!(NeuronParams::new(-80.0, -70.0, 2.0).is_err());

        // Negative refractory period
        assert!(NeuronParams::new(-55.0, -70.0, -1.0).is_err());

        // Valid
        assert!(NeuronParams::new(-55.0, -70.0, 0.0).is_ok());
    }

    #[test]
    fn test_new_neuron_at_rest() {
        let n = neuron(0);
        assert_eq!(n.potential, -70.0);
        assert_eq!(n.last_fired(), SimTime::FAR_PAST);
        assert!(n.outgoing().is_empty());
    }

    #[test]
    fn test_activation_functions() {
        assert_eq!(Activation::Linear.apply(-3.0), -3.0);
        assert_eq!(Activation::Relu.apply(-3.0), 0.0);
        assert_eq!(Activation::Relu.apply(2.5), 2.5);
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-6);
        assert!((Activation::Tanh.apply(0.0)).abs() < 1e-6);
    }

    #[test]
    fn test_compute_leaks_toward_rest() {
        let mut n = neuron(0);
        n.potential = -50.0;
        let out = n.compute(0.0, 1.0);
        // -50 * 0.9 + -70 * 0.1 = -52
        assert!((n.potential + 52.0).abs() < 1e-4);
        assert!((out + 52.0).abs() < 1e-4);
    }

    #[test]
    fn test_compute_integrates_input() {
        let mut n = neuron(0);
        n.compute(10.0, 2.0);
        // -70 + 20 = -50, then leak toward -70
        assert!((n.potential + 52.0).abs() < 1e-4);
    }

    #[test]
    fn test_fire_at_threshold() {
        let mut n = neuron(0);
        n.potential = n.params.threshold;
        assert!(n.fire(SimTime::new(1.0)));
        assert_eq!(n.potential, -70.0);
        assert_eq!(n.last_fired(), SimTime::new(1.0));
    }

    #[test]
    fn test_fire_below_threshold_no_mutation() {
        let mut n = neuron(0);
        n.potential = -60.0;
        assert!(!n.fire(SimTime::new(1.0)));
        assert_eq!(n.potential, -60.0);
        assert_eq!(n.last_fired(), SimTime::FAR_PAST);
    }

    #[test]
    fn test_refractory_gates_firing() {
        let mut n = neuron(0);
        n.potential = -50.0;
        assert!(n.fire(SimTime::new(1.0)));

        // Re-raise the potential inside the refractory window
        n.potential = -40.0;
        assert!(!n.fire(SimTime::new(2.5)));
        // No side effect on the raised potential
        assert_eq!(n.potential, -40.0);

        // Outside the window the neuron fires again
        assert!(n.fire(SimTime::new(3.0)));
        assert_eq!(n.last_fired(), SimTime::new(3.0));
    }

    #[test]
    fn test_reset() {
        let mut n = neuron(0);
        n.potential = -50.0;
        n.fire(SimTime::new(1.0));
        n.reset();
        assert_eq!(n.potential, -70.0);
        assert_eq!(n.last_fired(), SimTime::FAR_PAST);
    }

    #[test]
    fn test_connect_is_idempotent() {
        let mut n = neuron(0);
        assert!(n.connect(NeuronId::new(1)));
        assert!(n.connect(NeuronId::new(2)));
        assert!(!n.connect(NeuronId::new(1)));
        assert_eq!(n.outgoing(), &[NeuronId::new(1), NeuronId::new(2)]);
    }

    #[test]
    fn test_disconnect_compacts() {
        let mut n = neuron(0);
        n.connect(NeuronId::new(1));
        n.connect(NeuronId::new(2));
        n.connect(NeuronId::new(3));

        assert!(n.disconnect(NeuronId::new(2)));
        assert_eq!(n.outgoing(), &[NeuronId::new(1), NeuronId::new(3)]);

        // Absent target is a no-op
        assert!(!n.disconnect(NeuronId::new(9)));
        assert_eq!(n.outgoing().len(), 2);
    }
}
