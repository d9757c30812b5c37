//! The driver of a simulation: owns the current state and calls exactly one stepper per tick.
//!
//! # Example
//! ```rust
//! use rusty_neurosim::config::SimulationConfig;
//! use rusty_neurosim::connection::Edge;
//! use rusty_neurosim::neuron::{Layer, Node};
//! use rusty_neurosim::simulator::{Mode, Simulation};
//! use rusty_neurosim::topology::Topology;
//!
//! let bio = Topology::new(
//!     vec![Node::biological("b1", [0.0, 0.0, 0.0], 0.8, 0.05)],
//!     vec![],
//! );
//! let art = Topology::new(
//!     vec![
//!         Node::artificial("a1", [0.0, 0.0, 0.0], Layer::Input),
//!         Node::artificial("o1", [1.0, 0.0, 0.0], Layer::Output),
//!     ],
//!     vec![Edge::new("ae1", "a1", "o1", 1.0)],
//! );
//!
//! let mut simulation = Simulation::build(bio, art, SimulationConfig::default(), 0).unwrap();
//! assert_eq!(simulation.mode(), Mode::Biological);
//!
//! // Large deltas are clamped
//! simulation.tick(2.0);
//! assert_eq!(simulation.state().time(), rusty_neurosim::MAX_DT);
//!
//! // Switching mode starts over from a fresh state
//! simulation.set_mode(Mode::Artificial);
//! assert_eq!(simulation.state().time(), 0.0);
//! ```
use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::artificial;
use crate::biological::{self, LifParams};
use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::neuron::NodePatch;
use crate::state::SimulationState;
use crate::topology::Topology;
use crate::MAX_DT;

/// The model being simulated.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Biological,
    Artificial,
}

impl FromStr for Mode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "biological" | "bio" => Ok(Mode::Biological),
            "artificial" | "art" => Ok(Mode::Artificial),
            _ => Err(SimError::InvalidParameter(format!("Unknown mode: {}", s))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mode::Biological => write!(f, "biological"),
            Mode::Artificial => write!(f, "artificial"),
        }
    }
}

/// A simulation of one of two networks, one per mode.
#[derive(Debug)]
pub struct Simulation {
    mode: Mode,
    config: SimulationConfig,
    params: LifParams,
    /// Fresh state of the biological topology.
    biological: SimulationState,
    /// Fresh state of the artificial topology.
    artificial: SimulationState,
    state: SimulationState,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Create a simulation in biological mode.
    /// The function returns an error if either topology or the configuration is invalid.
    pub fn build(
        biological: Topology,
        artificial: Topology,
        config: SimulationConfig,
        seed: u64,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let biological = biological.build_state()?;
        let artificial = artificial.build_state()?;
        log::info!(
            "Simulation built: {} biological nodes, {} artificial nodes",
            biological.num_nodes(),
            artificial.num_nodes()
        );

        Ok(Simulation {
            mode: Mode::Biological,
            config,
            params: LifParams::default(),
            state: biological.clone(),
            biological,
            artificial,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Replace the constants of the spiking dynamics, see [`LifParams::build`].
    pub fn with_params(mut self, params: LifParams) -> Self {
        self.params = params;
        self
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the current state.
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &LifParams {
        &self.params
    }

    /// Replace the configuration. The function returns an error if the configuration is invalid.
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<(), SimError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Advance the simulation by `delta` seconds, clamped to [0, MAX_DT].
    /// Returns false, without stepping, if auto-play is disabled.
    pub fn tick(&mut self, delta: f64) -> bool {
        if !self.config.auto_play {
            return false;
        }
        let dt = match delta.is_nan() {
            true => 0.0,
            false => delta.clamp(0.0, MAX_DT),
        };

        let state = std::mem::take(&mut self.state);
        self.state = match self.mode {
            Mode::Biological => {
                biological::step(state, dt, &self.config, &self.params, &mut self.rng)
            }
            Mode::Artificial => artificial::step(state, dt, &self.config),
        };
        true
    }

    /// Switch to another mode. The current state is discarded and the new mode starts from a fresh state.
    /// Switching to the current mode does nothing.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        log::info!("Switching from {} to {} mode", self.mode, mode);
        self.mode = mode;
        self.reset();
    }

    /// Start the current mode over from a fresh state.
    pub fn reset(&mut self) {
        log::info!("Resetting {} simulation at t={:.3}", self.mode, self.state.time());
        self.state = match self.mode {
            Mode::Biological => self.biological.clone(),
            Mode::Artificial => self.artificial.clone(),
        };
    }

    /// Merge the provided fields into a node of the current state (no-op for unknown IDs).
    pub fn update_node(&mut self, id: &str, patch: &NodePatch) -> bool {
        self.state.update_node(id, patch)
    }

    /// Replace the weight of an edge of the current state (no-op for unknown IDs).
    pub fn update_edge(&mut self, id: &str, weight: f64) -> bool {
        self.state.update_edge(id, weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::connection::Edge;
    use crate::neuron::{Layer, Node};
    use crate::PULSE_SPEED;

    fn topologies() -> (Topology, Topology) {
        let bio = Topology::new(
            vec![
                Node::biological("b1", [-2.0, 1.0, 0.0], 0.8, 0.05),
                Node::biological("b2", [0.0, 0.0, 0.0], 1.0, 0.1),
            ],
            vec![Edge::new("e1", "b1", "b2", 0.8)],
        );
        let art = Topology::new(
            vec![
                Node::artificial("a1", [-3.0, 0.0, 0.0], Layer::Input),
                Node::artificial("h1", [0.0, 0.0, 0.0], Layer::Hidden),
                Node::artificial("o1", [3.0, 0.0, 0.0], Layer::Output),
            ],
            vec![
                Edge::new("ae1", "a1", "h1", 0.5),
                Edge::new("ae2", "h1", "o1", 0.6),
            ],
        );
        (bio, art)
    }

    fn simulation() -> Simulation {
        let (bio, art) = topologies();
        Simulation::build(bio, art, SimulationConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Mode::from_str("biological"), Ok(Mode::Biological));
        assert_eq!(Mode::from_str("ART"), Ok(Mode::Artificial));
        assert!(Mode::from_str("quantum").is_err());
        assert_eq!(Mode::Artificial.to_string(), "artificial");
    }

    #[test]
    fn test_build_invalid() {
        let (bio, mut art) = topologies();
        art.edges.push(Edge::new("ae3", "o1", "x9", 1.0));
        assert!(matches!(
            Simulation::build(bio, art, SimulationConfig::default(), 0),
            Err(SimError::DanglingEdge { .. })
        ));

        let (bio, art) = topologies();
        let config = SimulationConfig {
            speed: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::build(bio, art, config, 0),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_tick_clamps_delta() {
        let mut simulation = simulation();
        assert!(simulation.tick(3.0));
        assert_eq!(simulation.state().time(), MAX_DT);
        assert!(simulation.tick(-1.0));
        assert_eq!(simulation.state().time(), MAX_DT);
        assert!(simulation.tick(f64::NAN));
        assert_eq!(simulation.state().time(), MAX_DT);
    }

    #[test]
    fn test_auto_play_off() {
        let mut simulation = simulation();
        let config = SimulationConfig::build(1.0, false, false).unwrap();
        simulation.set_config(config).unwrap();
        assert!(!simulation.tick(0.016));
        assert_eq!(simulation.state().time(), 0.0);
    }

    #[test]
    fn test_set_config_invalid() {
        let mut simulation = simulation();
        let config = SimulationConfig {
            speed: f64::NAN,
            ..Default::default()
        };
        assert!(simulation.set_config(config).is_err());
        assert_eq!(simulation.config(), &SimulationConfig::default());
    }

    #[test]
    fn test_mode_switch_resets() {
        let mut simulation = simulation();
        simulation.update_node(
            "b1",
            &NodePatch {
                value: Some(1.0),
                ..Default::default()
            },
        );
        simulation.tick(0.016);
        assert_eq!(simulation.state().pulses().len(), 1);

        simulation.set_mode(Mode::Artificial);
        assert_eq!(simulation.mode(), Mode::Artificial);
        assert_eq!(simulation.state().time(), 0.0);
        assert!(simulation.state().pulses().is_empty());
        assert!(simulation.state().node("b1").is_none());
        assert!(simulation.state().nodes().iter().all(|node| node.value() == 0.0));

        let (_, art) = topologies();
        let config = SimulationConfig::default();
        let fresh = artificial::step(art.build_state().unwrap(), 0.016, &config);
        simulation.tick(0.016);
        assert_eq!(simulation.state(), &fresh);

        simulation.set_mode(Mode::Biological);
        assert_eq!(simulation.state().time(), 0.0);
        assert_eq!(simulation.state().node("b1").unwrap().value(), 0.0);
    }

    #[test]
    fn test_same_mode_keeps_state() {
        let mut simulation = simulation();
        simulation.tick(0.05);
        simulation.set_mode(Mode::Biological);
        assert_relative_eq!(simulation.state().time(), 0.05);
    }

    #[test]
    fn test_reset_discards_edits() {
        let mut simulation = simulation();
        assert!(simulation.update_edge("e1", -2.0));
        simulation.tick(0.05);
        simulation.reset();
        assert_eq!(simulation.state().time(), 0.0);
        assert_eq!(simulation.state().edge("e1").unwrap().weight(), 0.8);
    }

    #[test]
    fn test_unknown_ids() {
        let mut simulation = simulation();
        let before = simulation.state().clone();
        assert!(!simulation.update_edge("ae1", 1.0));
        assert!(!simulation.update_node(
            "h1",
            &NodePatch {
                value: Some(1.0),
                ..Default::default()
            }
        ));
        assert_eq!(simulation.state(), &before);
    }

    #[test]
    fn test_with_params() {
        let params = LifParams::build(0.5, PULSE_SPEED, -0.4, 0.0).unwrap();
        let mut simulation = simulation().with_params(params.clone());
        assert_eq!(simulation.params(), &params);

        simulation.update_node(
            "b2",
            &NodePatch {
                value: Some(0.6),
                ..Default::default()
            },
        );
        simulation.update_node(
            "b1",
            &NodePatch {
                value: Some(2.0),
                ..Default::default()
            },
        );
        simulation.tick(0.016);
        assert_relative_eq!(simulation.state().node("b2").unwrap().value(), 0.3);
        assert_eq!(simulation.state().node("b1").unwrap().value(), -0.4);

        // The constants survive a reset
        simulation.reset();
        assert_eq!(simulation.params(), &params);
    }

    #[test]
    fn test_seeded_noise() {
        let config = SimulationConfig::build(1.0, true, true).unwrap();
        let run = |seed: u64| {
            let (bio, art) = topologies();
            let mut simulation = Simulation::build(bio, art, config.clone(), seed).unwrap();
            for _ in 0..100 {
                simulation.tick(0.016);
            }
            simulation.state().clone()
        };
        assert_eq!(run(3), run(3));
        assert_ne!(run(3), run(4));
    }
}
