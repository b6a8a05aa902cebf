//! Quench CLI - Headless runs and config tooling for the suppression simulation

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::{config, simulate};

#[derive(Parser)]
#[command(name = "quench")]
#[command(about = "Fire, smoke and foam suppression simulation for extinguisher training", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless and print an intensity timeline
    Simulate {
        /// TOML config layered over the defaults
        #[arg(short, long)]
        config: Option<String>,

        /// Simulated seconds
        #[arg(long, default_value = "10")]
        duration: f32,

        /// Fixed tick length in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// Second at which the trainee starts spraying
        #[arg(long, default_value = "1.0")]
        spray_start: f32,

        /// Second at which spraying stops (sprays to the end if omitted)
        #[arg(long)]
        spray_end: Option<f32>,

        /// Distance from the trainee to the fire in metres
        #[arg(long, default_value = "3.0")]
        fire_distance: f32,

        /// Seconds between timeline samples
        #[arg(long, default_value = "0.5")]
        report_every: f32,

        /// Random seed for a repeatable run
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Configuration operations
    #[command(subcommand)]
    Config(config::ConfigCommands),
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Simulate {
            config,
            duration,
            dt,
            spray_start,
            spray_end,
            fire_distance,
            report_every,
            seed,
            format,
        } => simulate::run(simulate::SimulateArgs {
            config,
            duration,
            dt,
            spray_start,
            spray_end,
            fire_distance,
            report_every,
            seed,
            format,
        }),
        Commands::Config(cmd) => config::run(cmd),
    }
}
