use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rusty_neurosim::biological::{self, LifParams};
use rusty_neurosim::config::SimulationConfig;
use rusty_neurosim::neuron::{Layer, NodePatch};
use rusty_neurosim::simulator::{Mode, Simulation};
use rusty_neurosim::topology::Topology;
use rusty_neurosim::{artificial, HYPERPOLARIZATION, TIMESTEP};

fn demo(name: &str) -> Topology {
    Topology::load_from(format!("{}/demos/{}.json", env!("CARGO_MANIFEST_DIR"), name)).unwrap()
}

fn simulation(config: SimulationConfig, seed: u64) -> Simulation {
    Simulation::build(demo("biological"), demo("artificial"), config, seed).unwrap()
}

fn stimulate(simulation: &mut Simulation, id: &str, value: f64) {
    let patch = NodePatch {
        value: Some(value),
        ..Default::default()
    };
    assert!(simulation.update_node(id, &patch));
}

#[test]
fn test_demo_topologies() {
    let bio = demo("biological").build_state().unwrap();
    assert_eq!(bio.num_nodes(), 4);
    assert_eq!(bio.num_edges(), 4);
    assert_eq!(bio.node("b4").unwrap().threshold(), Some(1.1));
    assert_eq!(bio.node("b1").unwrap().metadata().label, "Sensory Neuron");

    let art = demo("artificial").build_state().unwrap();
    let layers: Vec<Layer> = art.nodes().iter().filter_map(|node| node.layer()).collect();
    assert_eq!(
        layers,
        vec![
            Layer::Input,
            Layer::Input,
            Layer::Hidden,
            Layer::Hidden,
            Layer::Hidden,
            Layer::Output
        ]
    );
}

#[test]
fn test_quiescent_without_input() {
    let mut simulation = simulation(SimulationConfig::default(), 0);
    for _ in 0..500 {
        simulation.tick(TIMESTEP);
    }
    let state = simulation.state();
    assert!(state.nodes().iter().all(|node| node.value() == 0.0));
    assert!(state.pulses().is_empty());
    assert_relative_eq!(state.time(), 500.0 * TIMESTEP, epsilon = 1e-9);
}

#[test]
fn test_stimulus_propagates() {
    let mut simulation = simulation(SimulationConfig::default(), 0);
    stimulate(&mut simulation, "b1", 1.0);

    simulation.tick(TIMESTEP);
    let state = simulation.state();
    assert_eq!(state.node("b1").unwrap().value(), HYPERPOLARIZATION);
    let edges: Vec<&str> = state.pulses().iter().map(|p| p.edge_id()).collect();
    assert_eq!(edges, vec!["e1", "e3"]);

    // Transit takes 1 / (2.5 * 0.016) = 25 ticks
    let mut ticks = 1;
    while !simulation.state().pulses().is_empty() {
        simulation.tick(TIMESTEP);
        ticks += 1;
        assert!(ticks <= 30);
    }
    assert!(ticks >= 25);

    // b2 and b4 received subthreshold input, b3 received nothing yet
    let state = simulation.state();
    assert_relative_eq!(state.node("b2").unwrap().value(), 0.8, epsilon = 1e-9);
    assert_relative_eq!(state.node("b4").unwrap().value(), 0.5, epsilon = 1e-9);
    assert_eq!(state.node("b3").unwrap().value(), 0.0);
    assert!(state.node("b1").unwrap().value() >= 0.0);
}

#[test]
fn test_lowered_threshold_relays() {
    let mut simulation = simulation(SimulationConfig::default(), 0);
    let patch = NodePatch {
        threshold: Some(0.5),
        ..Default::default()
    };
    assert!(simulation.update_node("b2", &patch));
    stimulate(&mut simulation, "b1", 1.0);

    let mut relayed = false;
    for _ in 0..60 {
        simulation.tick(TIMESTEP);
        relayed |= simulation
            .state()
            .pulses()
            .iter()
            .any(|pulse| pulse.edge_id() == "e2");
    }
    assert!(relayed);
}

#[test]
fn test_noise_drives_activity() {
    let config = SimulationConfig::build(1.0, true, true).unwrap();
    let mut simulation1 = simulation(config.clone(), 11);
    let mut simulation2 = simulation(config, 11);
    for _ in 0..300 {
        simulation1.tick(TIMESTEP);
        simulation2.tick(TIMESTEP);
    }
    assert_eq!(simulation1.state(), simulation2.state());
    assert!(simulation1
        .state()
        .nodes()
        .iter()
        .any(|node| node.value() != 0.0));
}

#[test]
fn test_mode_switch_resets() {
    let config = SimulationConfig::build(1.0, true, true).unwrap();
    let mut simulation = simulation(config.clone(), 5);
    stimulate(&mut simulation, "b1", 1.0);
    for _ in 0..10 {
        simulation.tick(TIMESTEP);
    }
    assert!(!simulation.state().pulses().is_empty());

    simulation.set_mode(Mode::Artificial);
    simulation.tick(TIMESTEP);
    let fresh = artificial::step(
        demo("artificial").build_state().unwrap(),
        TIMESTEP,
        &config,
    );
    assert_eq!(simulation.state(), &fresh);

    simulation.set_mode(Mode::Biological);
    let state = simulation.state();
    assert_eq!(state.time(), 0.0);
    assert!(state.pulses().is_empty());
    assert!(state.nodes().iter().all(|node| node.value() == 0.0));
}

#[test]
fn test_forward_pass_is_deterministic() {
    let config = SimulationConfig::default();
    let mut simulation1 = simulation(config.clone(), 0);
    let mut simulation2 = simulation(config, 99);
    simulation1.set_mode(Mode::Artificial);
    simulation2.set_mode(Mode::Artificial);

    for _ in 0..100 {
        simulation1.tick(TIMESTEP);
        simulation2.tick(TIMESTEP);
        let state = simulation1.state();
        assert_eq!(state, simulation2.state());
        for id in ["h1", "h2", "h3"] {
            assert!(state.node(id).unwrap().value() >= 0.0);
        }
        let output = state.node("o1").unwrap().value();
        assert!(output > 0.0 && output < 1.0);
    }
    assert_relative_eq!(simulation1.state().time(), 100.0 * TIMESTEP, epsilon = 1e-9);
}

#[test]
fn test_manual_stepping_matches_driver() {
    let config = SimulationConfig::default();
    let mut simulation = simulation(config.clone(), 0);
    stimulate(&mut simulation, "b1", 0.9);

    let mut state = demo("biological").build_state().unwrap();
    state.update_node(
        "b1",
        &NodePatch {
            value: Some(0.9),
            ..Default::default()
        },
    );
    let mut rng = StdRng::seed_from_u64(0);
    for _ in 0..40 {
        simulation.tick(TIMESTEP);
        state = biological::step(state, TIMESTEP, &config, &LifParams::default(), &mut rng);
    }
    assert_eq!(simulation.state(), &state);
}

#[test]
fn test_snapshot_json() {
    let mut simulation = simulation(SimulationConfig::default(), 0);
    stimulate(&mut simulation, "b1", 1.0);
    simulation.tick(TIMESTEP);

    let json = serde_json::to_value(simulation.state()).unwrap();
    assert_eq!(json["nodes"][0]["id"], "b1");
    assert_eq!(json["nodes"][0]["type"], "biological");
    assert_eq!(json["pulses"][0]["edge_id"], "e1");
    assert_eq!(json["pulses"][0]["progress"], 0.0);
    assert_relative_eq!(json["time"].as_f64().unwrap(), TIMESTEP);
}
