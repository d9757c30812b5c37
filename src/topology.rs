//! Topology descriptors and their JSON (de)serialization.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::connection::Edge;
use crate::error::SimError;
use crate::neuron::Node;
use crate::state::SimulationState;

/// An ordered collection of node and edge descriptors, from which fresh states are built.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Topology {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Topology { nodes, edges }
    }

    /// Build a fresh state from the topology (see `SimulationState::build`).
    pub fn build_state(&self) -> Result<SimulationState, SimError> {
        SimulationState::build(self.nodes.clone(), self.edges.clone())
    }

    /// Parse a topology from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the topology to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SimError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Load a topology from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
