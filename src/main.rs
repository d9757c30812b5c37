use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use rusty_neurosim::config::SimulationConfig;
use rusty_neurosim::error::SimError;
use rusty_neurosim::neuron::NodePatch;
use rusty_neurosim::simulator::{Mode, Simulation};
use rusty_neurosim::topology::Topology;
use rusty_neurosim::TIMESTEP;

#[derive(Parser, Debug)]
struct Args {
    /// The biological topology (JSON)
    #[arg(long, default_value = "demos/biological.json")]
    bio: PathBuf,
    /// The artificial topology (JSON)
    #[arg(long, default_value = "demos/artificial.json")]
    art: PathBuf,
    /// The model to simulate, one of: biological, artificial
    #[arg(long, default_value = "biological")]
    mode: Mode,
    /// The number of ticks
    #[arg(short = 'n', long, default_value = "100")]
    ticks: usize,
    /// The elapsed time per tick, in seconds (clamped to MAX_DT)
    #[arg(long, default_value_t = TIMESTEP)]
    dt: f64,
    /// The speed multiplier
    #[arg(long, default_value = "1.0")]
    speed: f64,
    /// Inject random input into the biological neurons
    #[arg(long)]
    noise: bool,
    /// A JSON configuration file, overriding --speed and --noise
    #[arg(long)]
    config: Option<PathBuf>,
    /// The seed of the noise generator
    #[arg(long, default_value = "0")]
    seed: u64,
    /// Initial potential of a node, as ID=VALUE (repeatable)
    #[arg(long, value_parser = parse_stimulus)]
    stimulus: Vec<(String, f64)>,
    /// Write the snapshots to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Write the logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// The log level
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn parse_stimulus(s: &str) -> Result<(String, f64), String> {
    let (id, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected ID=VALUE, got {}", s))?;
    let value = value
        .parse::<f64>()
        .map_err(|e| format!("Invalid value for {}: {}", id, e))?;
    Ok((id.to_string(), value))
}

fn init_logging(args: &Args) -> Result<(), SimError> {
    let encoder = Box::new(PatternEncoder::new("{l} - {m}\n"));
    let appender: Box<dyn Append> = match &args.log_file {
        Some(path) => Box::new(FileAppender::builder().encoder(encoder).build(path)?),
        None => Box::new(
            ConsoleAppender::builder()
                .encoder(encoder)
                .target(Target::Stderr)
                .build(),
        ),
    };

    let config = Config::builder()
        .appender(Appender::builder().build("main", appender))
        .build(Root::builder().appender("main").build(args.log_level))
        .map_err(|e| SimError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| SimError::IOError(e.to_string()))?;
    Ok(())
}

fn main() -> Result<(), SimError> {
    let args = Args::parse();
    init_logging(&args)?;
    log::info!("{:?}", args);

    let config = match &args.config {
        Some(path) => SimulationConfig::load_from(path)?,
        None => SimulationConfig::build(args.speed, args.noise, true)?,
    };

    let bio = Topology::load_from(&args.bio)?;
    let art = Topology::load_from(&args.art)?;
    let mut simulation = Simulation::build(bio, art, config, args.seed)?;
    simulation.set_mode(args.mode);
    log::info!("Topology loading: done!");

    for (id, value) in args.stimulus.iter() {
        let patch = NodePatch {
            value: Some(*value),
            ..Default::default()
        };
        if !simulation.update_node(id, &patch) {
            log::warn!("Stimulus ignored: no node {} in {} mode", id, args.mode);
        }
    }

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for _ in 0..args.ticks {
        if !simulation.tick(args.dt) {
            log::info!("Auto-play disabled, stopping");
            break;
        }
        serde_json::to_writer(&mut writer, simulation.state())?;
        writeln!(writer)?;
    }
    writer.flush()?;

    let state = simulation.state();
    log::info!(
        "Simulation: done! t={:.3}, {} pulses in transit",
        state.time(),
        state.pulses().len()
    );
    Ok(())
}
