//! The simulation state container shared by both models.
//!
//! Nodes and edges are stored in flat vectors in topology order, addressed by their string IDs
//! through lookup tables built once at construction. The topology never changes afterwards:
//! only node fields, edge weights, pulses and the clock evolve.
use std::collections::HashMap;

use derivative::Derivative;
use itertools::Itertools;
use serde::Serialize;

use crate::connection::Edge;
use crate::error::SimError;
use crate::neuron::{Node, NodeKind, NodePatch};
use crate::pulse::Pulse;

/// A snapshot of a network at a given simulation time.
#[derive(Derivative, Clone, Default, Serialize)]
#[derivative(Debug, PartialEq)]
pub struct SimulationState {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    pulses: Vec<Pulse>,
    time: f64,
    next_pulse_id: u64,
    #[serde(skip)]
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    edge_index: HashMap<String, usize>,
    #[serde(skip)]
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    endpoints: Vec<(usize, usize)>,
    #[serde(skip)]
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    outgoing: Vec<Vec<usize>>,
    #[serde(skip)]
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    incoming: Vec<Vec<usize>>,
}

impl SimulationState {
    /// Build a fresh state from a topology, with every node value set to zero, no pulses and a zero clock.
    /// The function returns an error for duplicate IDs, dangling edges or invalid neuron parameters.
    pub fn build(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, SimError> {
        if let Some(id) = nodes.iter().map(|node| node.id()).duplicates().next() {
            return Err(SimError::DuplicateNode(id.to_string()));
        }
        if let Some(id) = edges.iter().map(|edge| edge.id()).duplicates().next() {
            return Err(SimError::DuplicateEdge(id.to_string()));
        }

        for node in nodes.iter() {
            if let NodeKind::Biological {
                threshold,
                recovery,
            } = node.kind()
            {
                if !(threshold.is_finite() && *threshold > 0.0) {
                    return Err(SimError::InvalidParameter(format!(
                        "Threshold of node {} must be positive",
                        node.id()
                    )));
                }
                if !(recovery.is_finite() && *recovery > 0.0) {
                    return Err(SimError::InvalidParameter(format!(
                        "Recovery of node {} must be positive",
                        node.id()
                    )));
                }
            }
        }

        let nodes: Vec<Node> = nodes
            .into_iter()
            .map(|mut node| {
                node.set_value(0.0);
                node
            })
            .collect();

        let node_index: HashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id().to_string(), i))
            .collect();
        let edge_index: HashMap<String, usize> = edges
            .iter()
            .enumerate()
            .map(|(k, edge)| (edge.id().to_string(), k))
            .collect();

        let mut endpoints = Vec::with_capacity(edges.len());
        let mut outgoing = vec![vec![]; nodes.len()];
        let mut incoming = vec![vec![]; nodes.len()];
        for (k, edge) in edges.iter().enumerate() {
            let lookup = |node_id: &str| {
                node_index
                    .get(node_id)
                    .copied()
                    .ok_or_else(|| SimError::DanglingEdge {
                        edge_id: edge.id().to_string(),
                        node_id: node_id.to_string(),
                    })
            };
            let source = lookup(edge.source())?;
            let target = lookup(edge.target())?;
            endpoints.push((source, target));
            outgoing[source].push(k);
            incoming[target].push(k);
        }

        Ok(SimulationState {
            nodes,
            edges,
            pulses: vec![],
            time: 0.0,
            next_pulse_id: 0,
            node_index,
            edge_index,
            endpoints,
            outgoing,
            incoming,
        })
    }

    /// Returns the nodes, in topology order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes[..]
    }

    /// Returns the node with the given ID, if any.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edges, in topology order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges[..]
    }

    /// Returns the edge with the given ID, if any.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&k| &self.edges[k])
    }

    /// Returns the number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// An iterator over the edges leaving the given node (empty for unknown IDs).
    pub fn outgoing(&self, id: &str) -> impl Iterator<Item = &Edge> + '_ {
        self.node_index
            .get(id)
            .into_iter()
            .flat_map(move |&i| self.outgoing[i].iter().map(move |&k| &self.edges[k]))
    }

    /// An iterator over the edges entering the given node (empty for unknown IDs).
    pub fn incoming(&self, id: &str) -> impl Iterator<Item = &Edge> + '_ {
        self.node_index
            .get(id)
            .into_iter()
            .flat_map(move |&i| self.incoming[i].iter().map(move |&k| &self.edges[k]))
    }

    /// Returns the pulses currently in transit.
    pub fn pulses(&self) -> &[Pulse] {
        &self.pulses[..]
    }

    /// Returns the simulation clock, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Merge the provided fields into the node with the given ID.
    /// Unknown IDs are silently ignored. Returns true if a node was updated.
    pub fn update_node(&mut self, id: &str, patch: &NodePatch) -> bool {
        match self.node_index.get(id) {
            Some(&i) => {
                self.nodes[i].apply(patch);
                true
            }
            None => false,
        }
    }

    /// Replace the weight of the edge with the given ID.
    /// Unknown IDs are silently ignored. Returns true if an edge was updated.
    pub fn update_edge(&mut self, id: &str, weight: f64) -> bool {
        match self.edge_index.get(id) {
            Some(&k) => {
                self.edges[k].set_weight(weight);
                true
            }
            None => false,
        }
    }

    /// Place a new pulse on the given edge at the given progress, and returns its ID.
    /// The function returns an error if the edge is unknown or the progress is not in [0, 1).
    pub fn inject_pulse(&mut self, edge_id: &str, progress: f64) -> Result<u64, SimError> {
        if !self.edge_index.contains_key(edge_id) {
            return Err(SimError::EdgeNotFound(edge_id.to_string()));
        }
        if !(0.0..1.0).contains(&progress) {
            return Err(SimError::InvalidParameter(format!(
                "Pulse progress must be in [0, 1), got {}",
                progress
            )));
        }
        let id = self.allocate_pulse_id();
        self.pulses.push(Pulse::emit(id, edge_id).at_progress(progress));
        Ok(id)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes[..]
    }

    /// Position of an edge in the edge vector.
    pub(crate) fn edge_position(&self, id: &str) -> Option<usize> {
        self.edge_index.get(id).copied()
    }

    /// Positions of the source and target nodes of an edge.
    pub(crate) fn endpoints(&self, k: usize) -> (usize, usize) {
        self.endpoints[k]
    }

    pub(crate) fn outgoing_positions(&self, i: usize) -> &[usize] {
        &self.outgoing[i][..]
    }

    pub(crate) fn incoming_positions(&self, i: usize) -> &[usize] {
        &self.incoming[i][..]
    }

    pub(crate) fn take_pulses(&mut self) -> Vec<Pulse> {
        std::mem::take(&mut self.pulses)
    }

    pub(crate) fn set_pulses(&mut self, pulses: Vec<Pulse>) {
        self.pulses = pulses;
    }

    pub(crate) fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub(crate) fn allocate_pulse_id(&mut self) -> u64 {
        let id = self.next_pulse_id;
        self.next_pulse_id += 1;
        id
    }
}
