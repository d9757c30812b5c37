//! This module provides the `Node` structure which composes the `SimulationState` structure.
//!
//! A node is either a biological (spiking) neuron with a firing threshold and a recovery rate,
//! or an artificial unit tagged with the layer it belongs to.
use serde::{Deserialize, Serialize};

/// The layer an artificial node belongs to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Input,
    Hidden,
    Output,
}

/// The kind of a node, together with its kind-specific parameters.
/// The kind of a node is fixed for its lifetime.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// A leaky integrate-and-fire neuron.
    Biological {
        /// The potential at which the neuron fires.
        threshold: f64,
        /// The constant per-tick increment applied while the potential is negative.
        recovery: f64,
    },
    /// A perceptron unit.
    Artificial { layer: Layer },
}

/// Descriptive text attached to a node, for display purposes only.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct NodeMetadata {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// Represents a node of the network.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Node {
    /// The node ID, unique within a state.
    id: String,
    #[serde(flatten)]
    kind: NodeKind,
    /// The position of the node in space, as used by the renderer.
    position: [f64; 3],
    /// The membrane potential (biological) or the activation (artificial).
    #[serde(default)]
    value: f64,
    #[serde(default)]
    metadata: NodeMetadata,
}

/// A partial update of a node.
/// Fields left to `None` are kept; fields that do not apply to the node's kind are ignored.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePatch {
    pub threshold: Option<f64>,
    pub recovery: Option<f64>,
    pub value: Option<f64>,
    pub position: Option<[f64; 3]>,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl Node {
    /// Create a new biological neuron with zero potential.
    pub fn biological(id: &str, position: [f64; 3], threshold: f64, recovery: f64) -> Self {
        Node {
            id: id.to_string(),
            kind: NodeKind::Biological {
                threshold,
                recovery,
            },
            position,
            value: 0.0,
            metadata: NodeMetadata::default(),
        }
    }

    /// Create a new artificial unit with zero activation.
    pub fn artificial(id: &str, position: [f64; 3], layer: Layer) -> Self {
        Node {
            id: id.to_string(),
            kind: NodeKind::Artificial { layer },
            position,
            value: 0.0,
            metadata: NodeMetadata::default(),
        }
    }

    /// Attach a label and a description to the node.
    pub fn with_metadata(mut self, label: &str, description: &str) -> Self {
        self.metadata = NodeMetadata {
            label: label.to_string(),
            description: description.to_string(),
        };
        self
    }

    /// Returns the node ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the kind of the node.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn position(&self) -> [f64; 3] {
        self.position
    }

    /// Returns the current potential or activation of the node.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the current potential or activation of the node.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// Returns the firing threshold, if the node is biological.
    pub fn threshold(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Biological { threshold, .. } => Some(threshold),
            NodeKind::Artificial { .. } => None,
        }
    }

    /// Returns the recovery rate, if the node is biological.
    pub fn recovery(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Biological { recovery, .. } => Some(recovery),
            NodeKind::Artificial { .. } => None,
        }
    }

    /// Returns the layer, if the node is artificial.
    pub fn layer(&self) -> Option<Layer> {
        match self.kind {
            NodeKind::Artificial { layer } => Some(layer),
            NodeKind::Biological { .. } => None,
        }
    }

    /// Merge the provided fields into the node.
    pub fn apply(&mut self, patch: &NodePatch) {
        if let NodeKind::Biological {
            threshold,
            recovery,
        } = &mut self.kind
        {
            if let Some(new_threshold) = patch.threshold {
                *threshold = new_threshold;
            }
            if let Some(new_recovery) = patch.recovery {
                *recovery = new_recovery;
            }
        }
        if let Some(value) = patch.value {
            self.value = value;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(label) = &patch.label {
            self.metadata.label = label.clone();
        }
        if let Some(description) = &patch.description {
            self.metadata.description = description.clone();
        }
    }
}
