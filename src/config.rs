//! Run-time configuration of a simulation.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// The knobs an external driver passes to the steppers on every tick.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplier on the pulse transit rate (spiking model) or on the phase clock (feed-forward model).
    pub speed: f64,
    /// Whether random input is injected into the spiking neurons.
    pub noise: bool,
    /// Whether the driver steps the simulation at all.
    pub auto_play: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            speed: 1.0,
            noise: false,
            auto_play: true,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with the specified parameters.
    /// The function returns an error if the speed is negative or not finite.
    pub fn build(speed: f64, noise: bool, auto_play: bool) -> Result<Self, SimError> {
        let config = SimulationConfig {
            speed,
            noise,
            auto_play,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can be fed to the steppers.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "Speed must be finite and non-negative, got {}",
                self.speed
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take their default value.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: SimulationConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
