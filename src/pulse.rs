//! Pulses traveling along the edges of a spiking network.
use serde::{Deserialize, Serialize};

use crate::PULSE_VALUE;

/// A pulse in transit along an edge.
/// A pulse is emitted with zero progress when the source of its edge fires,
/// and disappears the tick its progress reaches 1.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Pulse {
    id: u64,
    edge_id: String,
    /// Fraction of the edge already traveled, in [0, 1).
    progress: f64,
    value: f64,
}

impl Pulse {
    /// Create a fresh pulse at the start of the given edge.
    pub fn emit(id: u64, edge_id: &str) -> Self {
        Pulse {
            id,
            edge_id: edge_id.to_string(),
            progress: 0.0,
            value: PULSE_VALUE,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the ID of the edge carrying the pulse.
    pub fn edge_id(&self) -> &str {
        &self.edge_id
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Returns the carried value. Arrival contributes the edge weight, not this value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Move the pulse forward along its edge.
    /// Returns `None` if the pulse arrives, i.e., its progress reaches or exceeds 1.
    pub fn advance(mut self, increment: f64) -> Option<Self> {
        let progress = self.progress + increment;
        if progress >= 1.0 {
            None
        } else {
            self.progress = progress;
            Some(self)
        }
    }

    /// Returns a copy of the pulse placed at the given progress.
    pub fn at_progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }
}
