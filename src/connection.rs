//! Module implementing the concept of edges (connections) in a network.

use serde::{Deserialize, Serialize};

/// Represents a directed, weighted connection between two nodes.
/// Only the weight of an edge may change once a state is built.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Edge {
    /// Edge ID, unique within a state
    id: String,
    /// Source ID
    source: String,
    /// Target ID
    target: String,
    /// Connection weight (signed, not clamped)
    weight: f64,
}

impl Edge {
    /// Create a new edge with the specified parameters.
    /// Note that the function cannot check if the endpoints are valid; this check is done at the state level.
    pub fn new(id: &str, source: &str, target: &str, weight: f64) -> Self {
        Edge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            weight,
        }
    }

    /// Returns the ID of the edge.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the ID of the source node.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the ID of the target node.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the weight of the edge.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns true if the edge connects a node to itself.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Set the weight of the edge.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }
}
