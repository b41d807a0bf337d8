//! Headless runner for the grid ecosystem simulation.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use eco_core::SimulationConfig;
use eco_world::Simulator;
use std::path::PathBuf;
use tracing::info;

/// Run the rabbit and berry ecosystem and print a JSON run summary
#[derive(Parser, Debug)]
#[command(name = "eco-runner")]
struct Args {
    /// JSON configuration file (missing keys take their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of steps to simulate
    #[arg(long)]
    steps: Option<u64>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Field depth (rows)
    #[arg(long)]
    depth: Option<i32>,

    /// Field width (columns)
    #[arg(long)]
    width: Option<i32>,

    /// Pause between steps in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn load_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(steps) = self.steps {
            config.num_steps = steps;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(depth) = self.depth {
            config.field.depth = depth;
        }
        if let Some(width) = self.width {
            config.field.width = width;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.step_delay_ms = delay_ms;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.json)?;

    let config = args.load_config()?;
    info!(
        seed = config.seed,
        steps = config.num_steps,
        depth = config.field.depth,
        width = config.field.width,
        "Starting eco runner"
    );

    let mut simulator = Simulator::new(config)?;
    let summary = simulator.run()?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "eco-runner",
            "--steps",
            "12",
            "--seed",
            "4",
            "--depth",
            "0",
            "--width",
            "30",
        ]);
        let config = args.load_config().unwrap();
        assert_eq!(config.num_steps, 12);
        assert_eq!(config.seed, 4);
        assert_eq!(config.field.depth, 0);
        assert_eq!(config.field.width, 30);
        assert_eq!(config.step_delay_ms, 0);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["eco-runner", "--config", "/nonexistent/eco.json"]);
        assert!(args.load_config().is_err());
    }
}
