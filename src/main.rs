use ringsim::{Scenario, ScenarioConfig, Snapshot, SnapshotSink};
use ringsim::{bench_gravity, bench_integrate_curve};

use anyhow::Result;
use clap::Parser;
use log::debug;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, relative to the crate's scenarios/ directory unless absolute
    #[arg(short, default_value = "saturn_rings.yaml")]
    file_name: String,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the checkpoint destination
    #[arg(long)]
    checkpoint: Option<String>,

    /// Time the force evaluation and integration instead of running a scenario
    #[arg(long)]
    bench: bool,
}

/// Logs a one-line summary of every frame; rendering lives elsewhere
struct LogSink;

impl SnapshotSink for LogSink {
    fn frame(&mut self, ring: &str, frame: usize, snapshot: &Snapshot) {
        let outermost = snapshot
            .particles()
            .map(|e| e.position.norm())
            .fold(0.0, f64::max);
        debug!(
            "ring {} frame {}: t = {} s, {} bodies, outermost particle at {:.0}",
            ring,
            frame,
            snapshot.t,
            snapshot.entries.len(),
            outermost
        );
    }
}

// load here to keep main clean
fn load_scenario_from_yaml(args: &Args) -> Result<ScenarioConfig> {
    let path = PathBuf::from(&args.file_name);
    let config_path = if path.is_absolute() || path.exists() {
        path
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(&args.file_name)
    };

    let mut scenario_cfg = ScenarioConfig::from_yaml_file(&config_path)?;
    if let Some(seed) = args.seed {
        scenario_cfg.parameters.seed = Some(seed);
    }
    if let Some(checkpoint) = &args.checkpoint {
        scenario_cfg.checkpoint = Some(checkpoint.clone());
    }
    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.bench {
        bench_gravity()?;
        bench_integrate_curve()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;
    let reports = scenario.run(&mut LogSink)?;

    for report in &reports {
        println!("ring {}: +{} particles, {}", report.name, report.added, report.status);
    }

    Ok(())
}
