//! Stepper for the feed-forward model: a layered perceptron evaluated once per tick.
//!
//! The input layer is driven by phase-shifted sinusoids of an internal phase clock. The hidden layer
//! (ReLU) and the output layer (sigmoid) are then evaluated in this order over a single buffer, so a
//! full forward pass completes within one tick.
//!
//! The layers are assumed to form a strict input → hidden → output DAG. Edges between nodes of the same
//! layer, or going backwards, are not rejected: a source appearing later in the evaluation order is read
//! with its value from the previous tick.
use crate::config::SimulationConfig;
use crate::neuron::Layer;
use crate::state::SimulationState;

/// Rectified linear unit.
pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

/// Logistic sigmoid. Saturates to 0 or 1 for large magnitudes.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Drive of the `index`-th input node at phase `time`, in [0, 1].
pub fn input_drive(time: f64, index: usize) -> f64 {
    ((time * 2.0 + index as f64).sin() + 1.0) / 2.0
}

/// Advance the feed-forward model by `dt` seconds.
/// The phase clock advances by `dt * config.speed`. Only artificial nodes are updated; pulses are carried over.
pub fn step(mut state: SimulationState, dt: f64, config: &SimulationConfig) -> SimulationState {
    let time = state.time() + dt * config.speed;

    for (index, node) in state
        .nodes_mut()
        .iter_mut()
        .filter(|node| node.layer() == Some(Layer::Input))
        .enumerate()
    {
        node.set_value(input_drive(time, index));
    }

    propagate(&mut state, Layer::Hidden, relu);
    propagate(&mut state, Layer::Output, sigmoid);

    log::trace!("Forward pass done at phase {:.3}", time);
    state.set_time(time);
    state
}

/// Evaluate every node of a layer, in topology order, from the current values of its sources.
fn propagate(state: &mut SimulationState, layer: Layer, activation: fn(f64) -> f64) {
    for i in 0..state.num_nodes() {
        if state.nodes()[i].layer() != Some(layer) {
            continue;
        }
        let sum: f64 = state
            .incoming_positions(i)
            .iter()
            .map(|&k| {
                let (source, _) = state.endpoints(k);
                state.nodes()[source].value() * state.edges()[k].weight()
            })
            .sum();
        state.nodes_mut()[i].set_value(activation(sum));
    }
}
