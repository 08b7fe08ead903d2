//! M/M/s queueing simulator
//!
//! Usage:
//!   cargo run --release --bin mms_queue -- [run.toml]
//!
//! Without a run file the built-in comparison of queueing disciplines is
//! simulated. Set `RUST_LOG=mms_queue=trace` to follow individual events.

use std::env;
use std::process;

use mms_queue::{RunConfig, ScenarioReport, Simulation};
use tracing::{error, info, warn};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Runs every scenario and returns the names of those that were reported
///
/// A scenario too short to produce statistics is logged and skipped; the
/// rest of the batch still runs.
fn run(config: &RunConfig) -> mms_queue::Result<Vec<String>> {
    let mut reported = Vec::new();
    for scenario in &config.scenarios {
        let mut simulation = Simulation::new(scenario.config.clone())?;
        simulation.simulate(config.horizon)?;

        let report = match ScenarioReport::from_simulation(&scenario.name, config.horizon, &simulation) {
            Ok(report) => report,
            Err(e) => {
                warn!(scenario = %scenario.name, error = %e, "scenario skipped");
                continue;
            }
        };
        println!("\n{}", report.render());

        if let Some(dir) = &config.output_dir {
            let dir = dir.join(&scenario.name);
            report.write_all(&dir, &simulation)?;
            info!(scenario = %scenario.name, dir = %dir.display(), "results written");
        }
        reported.push(scenario.name.clone());
    }
    Ok(reported)
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => RunConfig::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading {}: {}", path, e);
            eprintln!("Usage: {} [run.toml]", args[0]);
            process::exit(1);
        }),
        None => RunConfig::default(),
    };

    println!("=== M/M/s Queueing Simulation ===");
    println!("Horizon: {}", config.horizon);
    println!("Scenarios: {}", config.scenarios.len());

    if let Err(e) = run(&config) {
        error!(error = %e, "run failed");
        process::exit(1);
    }
}
