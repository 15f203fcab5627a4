//! ID and simulation-time types for the graph layer

use core::fmt;
use core::ops::Add;

/// Unique identifier for a neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NeuronId(pub u32);

impl NeuronId {
    /// Create a new neuron ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Unique identifier for a synapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SynapseId(pub u32);

impl SynapseId {
    /// Create a new synapse ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SynapseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// Simulation time in abstract time-units
///
/// The engine clock is a monotonically increasing float; per-entity
/// timestamps (`last_fired_time`, `last_active_time`) start at the
/// [`SimTime::FAR_PAST`] sentinel so the first firing or activation is
/// never gated.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SimTime(pub f32);

impl SimTime {
    /// Simulation start
    pub const ZERO: Self = Self(0.0);

    /// Sentinel meaning "never fired/activated"
    pub const FAR_PAST: Self = Self(-1000.0);

    /// Create a new time value
    pub const fn new(t: f32) -> Self {
        Self(t)
    }

    /// Get the raw time value
    pub const fn raw(&self) -> f32 {
        self.0
    }

    /// Elapsed time-units since an earlier instant
    pub fn since(&self, earlier: SimTime) -> f32 {
        self.0 - earlier.0
    }
}

impl Add<f32> for SimTime {
    type Output = SimTime;

    fn add(self, dt: f32) -> SimTime {
        SimTime(self.0 + dt)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Serialize};

    impl Serialize for NeuronId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for NeuronId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let id = u32::deserialize(deserializer)?;
            Ok(NeuronId::new(id))
        }
    }

    impl Serialize for SynapseId {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for SynapseId {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let id = u32::deserialize(deserializer)?;
            Ok(SynapseId::new(id))
        }
    }

    impl Serialize for SimTime {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.0.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for SimTime {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let t = f32::deserialize(deserializer)?;
            Ok(SimTime::new(t))
        }
    }
}
