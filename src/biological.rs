//! Stepper for the spiking model: leaky integrate-and-fire neurons exchanging pulses.
//!
//! On every tick, the pulses in transit move along their edges; the ones reaching the end of their edge
//! deliver the edge weight to its target. Every neuron then leaks, integrates its input (plus optional
//! noise) and fires if its potential reaches its threshold. A neuron that fires is reset to a
//! hyperpolarized potential and emits a new pulse on each outgoing edge. A neuron left with a negative
//! potential recovers by a constant increment.
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::neuron::NodeKind;
use crate::pulse::Pulse;
use crate::state::SimulationState;
use crate::{BIO_DECAY, HYPERPOLARIZATION, NOISE_AMPLITUDE, PULSE_SPEED};

/// The constants of the spiking dynamics.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct LifParams {
    /// Multiplicative leak applied to the potential on every tick, in (0, 1).
    decay: f64,
    /// Pulse transit rate, in edges per second.
    pulse_speed: f64,
    /// Potential right after firing.
    hyperpolarization: f64,
    /// Half-width of the uniform input noise.
    noise_amplitude: f64,
}

impl Default for LifParams {
    fn default() -> Self {
        LifParams {
            decay: BIO_DECAY,
            pulse_speed: PULSE_SPEED,
            hyperpolarization: HYPERPOLARIZATION,
            noise_amplitude: NOISE_AMPLITUDE,
        }
    }
}

impl LifParams {
    /// Create the constants of the spiking dynamics.
    /// The function returns an error if the decay is not in (0, 1), if the pulse speed or the noise amplitude
    /// is negative or not finite, or if the hyperpolarization is not finite.
    pub fn build(
        decay: f64,
        pulse_speed: f64,
        hyperpolarization: f64,
        noise_amplitude: f64,
    ) -> Result<Self, SimError> {
        if !(decay > 0.0 && decay < 1.0) {
            return Err(SimError::InvalidParameter(format!(
                "Decay must be in (0, 1), got {}",
                decay
            )));
        }
        if !(pulse_speed.is_finite() && pulse_speed >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "Pulse speed must be finite and non-negative, got {}",
                pulse_speed
            )));
        }
        if !hyperpolarization.is_finite() {
            return Err(SimError::InvalidParameter(format!(
                "Hyperpolarization must be finite, got {}",
                hyperpolarization
            )));
        }
        if !(noise_amplitude.is_finite() && noise_amplitude >= 0.0) {
            return Err(SimError::InvalidParameter(format!(
                "Noise amplitude must be finite and non-negative, got {}",
                noise_amplitude
            )));
        }

        Ok(LifParams {
            decay,
            pulse_speed,
            hyperpolarization,
            noise_amplitude,
        })
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn pulse_speed(&self) -> f64 {
        self.pulse_speed
    }

    pub fn hyperpolarization(&self) -> f64 {
        self.hyperpolarization
    }

    pub fn noise_amplitude(&self) -> f64 {
        self.noise_amplitude
    }
}

/// Advance the spiking model by `dt` seconds.
/// Only biological nodes are integrated, any other node is carried over untouched.
/// The clock advances by `dt`, regardless of `config.speed`.
pub fn step<R: Rng + ?Sized>(
    mut state: SimulationState,
    dt: f64,
    config: &SimulationConfig,
    params: &LifParams,
    rng: &mut R,
) -> SimulationState {
    let increment = params.pulse_speed * dt * config.speed;

    // Move the pulses and collect the input delivered by the ones arriving
    let mut inputs = vec![0.0; state.num_nodes()];
    let mut pulses: Vec<Pulse> = Vec::with_capacity(state.pulses().len());
    for pulse in state.take_pulses() {
        let k = state
            .edge_position(pulse.edge_id())
            .expect("Pulses can only travel along edges of the state");
        match pulse.advance(increment) {
            Some(pulse) => pulses.push(pulse),
            None => {
                let (_, target) = state.endpoints(k);
                let edge = &state.edges()[k];
                log::trace!("Pulse arrived at {} along {}", edge.target(), edge.id());
                inputs[target] += edge.weight();
            }
        }
    }

    let noise = match config.noise {
        true => Some(Uniform::new_inclusive(
            -params.noise_amplitude,
            params.noise_amplitude,
        )),
        false => None,
    };

    let now = state.time();
    let mut fired = vec![];
    for (i, node) in state.nodes_mut().iter_mut().enumerate() {
        let (threshold, recovery) = match node.kind() {
            NodeKind::Biological {
                threshold,
                recovery,
            } => (*threshold, *recovery),
            NodeKind::Artificial { .. } => continue,
        };

        let mut input = inputs[i];
        if let Some(noise) = &noise {
            input += noise.sample(rng);
        }

        let potential = node.value() * params.decay + input;
        if potential >= threshold {
            log::debug!(
                "Neuron {} fired at t={:.3} (potential {:.3})",
                node.id(),
                now,
                potential
            );
            node.set_value(params.hyperpolarization);
            fired.push(i);
        } else if potential < 0.0 {
            node.set_value(potential + recovery);
        } else {
            node.set_value(potential);
        }
    }

    let emitting: Vec<usize> = fired
        .iter()
        .flat_map(|&i| state.outgoing_positions(i).iter().copied())
        .collect();
    for k in emitting {
        let id = state.allocate_pulse_id();
        pulses.push(Pulse::emit(id, state.edges()[k].id()));
    }

    state.set_pulses(pulses);
    state.set_time(now + dt);
    state
}
