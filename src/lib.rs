//! This crate provides a tick-driven simulation engine for two small neural graph models:
//! a spiking model (leaky integrate-and-fire neurons exchanging traveling pulses) and a
//! layered feed-forward model (perceptron with per-tick forward propagation).
//!
//! # Building a State
//!
//! ```rust
//! use rusty_neurosim::connection::Edge;
//! use rusty_neurosim::neuron::Node;
//! use rusty_neurosim::state::SimulationState;
//!
//! let nodes = vec![
//!     Node::biological("b1", [-2.0, 1.0, 0.0], 0.8, 0.05),
//!     Node::biological("b2", [0.0, 0.0, 0.0], 1.0, 0.1),
//! ];
//! let edges = vec![Edge::new("e1", "b1", "b2", 0.8)];
//!
//! let state = SimulationState::build(nodes, edges).unwrap();
//! assert_eq!(state.num_nodes(), 2);
//! assert_eq!(state.num_edges(), 1);
//! assert_eq!(state.time(), 0.0);
//! ```
//!
//! # Stepping the Spiking Model
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use rusty_neurosim::biological::{self, LifParams};
//! use rusty_neurosim::config::SimulationConfig;
//! use rusty_neurosim::connection::Edge;
//! use rusty_neurosim::neuron::{Node, NodePatch};
//! use rusty_neurosim::state::SimulationState;
//!
//! let nodes = vec![
//!     Node::biological("b1", [0.0, 0.0, 0.0], 0.5, 0.05),
//!     Node::biological("b2", [1.0, 0.0, 0.0], 1.0, 0.1),
//! ];
//! let edges = vec![Edge::new("e1", "b1", "b2", 0.8)];
//! let mut state = SimulationState::build(nodes, edges).unwrap();
//!
//! // Push b1 above its threshold, it fires on the next tick
//! state.update_node("b1", &NodePatch { value: Some(1.0), ..Default::default() });
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let state = biological::step(state, 0.016, &SimulationConfig::default(), &LifParams::default(), &mut rng);
//! assert_eq!(state.pulses().len(), 1);
//! assert_eq!(state.node("b1").unwrap().value(), rusty_neurosim::HYPERPOLARIZATION);
//! ```
//!
//! # Driving Both Models
//!
//! ```rust
//! use rusty_neurosim::config::SimulationConfig;
//! use rusty_neurosim::simulator::{Mode, Simulation};
//! use rusty_neurosim::topology::Topology;
//!
//! let bio = Topology::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/biological.json")).unwrap();
//! let art = Topology::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/artificial.json")).unwrap();
//! let mut simulation = Simulation::build(bio, art, SimulationConfig::default(), 42).unwrap();
//!
//! simulation.set_mode(Mode::Artificial);
//! assert!(simulation.tick(0.016));
//! let output = simulation.state().node("o1").unwrap().value();
//! assert!(output > 0.0 && output < 1.0);
//! ```

pub mod artificial;
pub mod biological;
pub mod config;
pub mod connection;
pub mod error;
pub mod neuron;
pub mod pulse;
pub mod simulator;
pub mod state;
pub mod topology;

/// The per-tick multiplicative decay of a membrane potential.
pub const BIO_DECAY: f64 = 0.95;
/// The pulse transit rate, in edge-lengths per second (independent of the geometric edge length).
pub const PULSE_SPEED: f64 = 2.5;
/// The membrane potential a neuron is reset to right after firing.
pub const HYPERPOLARIZATION: f64 = -0.2;
/// The half-width of the uniform noise injected into every neuron when noise is enabled.
pub const NOISE_AMPLITUDE: f64 = 0.05;
/// The value carried by a pulse.
pub const PULSE_VALUE: f64 = 1.0;
/// The largest elapsed time a single tick may integrate.
pub const MAX_DT: f64 = 0.1;
/// The nominal frame duration.
pub const TIMESTEP: f64 = 0.016;
