//! Error module for the Rusty NeuroSim library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SimError {
    /// Error for an edge whose endpoint is not a node of the topology.
    DanglingEdge { edge_id: String, node_id: String },
    /// Error for two nodes sharing the same ID.
    DuplicateNode(String),
    /// Error for two edges sharing the same ID.
    DuplicateEdge(String),
    /// Error for a reference to an edge that is not part of the state.
    EdgeNotFound(String),
    /// Error for invalid parameters, e.g., a negative speed.
    InvalidParameter(String),
    /// Error for I/O operations, including (de)serialization.
    IOError(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::DanglingEdge { edge_id, node_id } => write!(
                f,
                "Dangling edge: {} references the unknown node {}",
                edge_id, node_id
            ),
            SimError::DuplicateNode(id) => write!(f, "Duplicate node ID: {}", id),
            SimError::DuplicateEdge(id) => write!(f, "Duplicate edge ID: {}", id),
            SimError::EdgeNotFound(id) => write!(f, "Edge not found: {}", id),
            SimError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            SimError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SimError {}

impl From<std::io::Error> for SimError {
    fn from(e: std::io::Error) -> Self {
        SimError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::IOError(e.to_string())
    }
}
