//! Configuration commands

use anyhow::{Context, Result};
use clap::Subcommand;
use quench_particles::SimulationConfig;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the default configuration as TOML
    Dump {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check a config file for parse and range errors
    Validate {
        /// Path to the TOML file
        file: String,
    },
}

pub fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Dump { output } => dump(output.as_deref()),
        ConfigCommands::Validate { file } => validate(&file),
    }
}

fn dump(output: Option<&str>) -> Result<()> {
    let text = SimulationConfig::default()
        .to_toml_string()
        .context("Failed to serialize default config")?;
    match output {
        Some(path) => {
            std::fs::write(path, &text).with_context(|| format!("Failed to write {}", path))?;
            println!("Wrote default config to {}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn validate(file: &str) -> Result<()> {
    if !Path::new(file).exists() {
        anyhow::bail!("Config file not found: {}", file);
    }
    let config =
        SimulationConfig::from_file(file).with_context(|| format!("Invalid config: {}", file))?;

    println!("{} is valid", file);
    println!(
        "  flame {}/s, rising smoke {}/s, ceiling smoke {}/s",
        config.fire.flame.rate, config.fire.rising_smoke.rate, config.fire.ceiling_smoke.rate
    );
    println!(
        "  foam {}/s, suppression {}/s inside {} m (more than {} droplets)",
        config.foam.rate,
        config.suppression.suppression_rate,
        config.suppression.detection_radius,
        config.suppression.min_particles
    );
    Ok(())
}
