//! Headless simulation run

use anyhow::{Context, Result};
use quench_core::Vec3;
use quench_particles::{ParticleRng, SimulationConfig, SimulationStats, TrainingSimulation};
use quench_runtime::{GameClock, Nozzle, SceneState, SystemRunner, TrainingEvent};
use serde::Serialize;

/// Trainee hand height; the nozzle is held here
const NOZZLE_HEIGHT: f32 = 1.2;
const EYE_HEIGHT: f32 = 1.6;
/// The trainee aims slightly above the base of the fire
const AIM_HEIGHT: f32 = 0.2;

pub struct SimulateArgs {
    pub config: Option<String>,
    pub duration: f32,
    pub dt: f32,
    pub spray_start: f32,
    pub spray_end: Option<f32>,
    pub fire_distance: f32,
    pub report_every: f32,
    pub seed: Option<u64>,
    pub format: String,
}

#[derive(Serialize)]
struct Report {
    duration: f32,
    dt: f32,
    spray_start: f32,
    spray_end: Option<f32>,
    extinguished_at: Option<f64>,
    final_intensity: f32,
    samples: Vec<SimulationStats>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if args.dt.is_nan() || args.dt <= 0.0 || args.dt > 0.25 {
        anyhow::bail!("--dt must be in (0, 0.25] seconds, got {}", args.dt);
    }
    if args.duration.is_nan() || args.duration < 0.0 {
        anyhow::bail!("--duration must be non-negative, got {}", args.duration);
    }
    if args.fire_distance.is_nan() || args.fire_distance <= 0.0 {
        anyhow::bail!("--fire-distance must be positive, got {}", args.fire_distance);
    }

    let config = match &args.config {
        Some(path) => {
            let config = SimulationConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path))?;
            log::info!("[quench] Loaded config from {}", path);
            config
        }
        None => SimulationConfig::default(),
    };
    let rng = match args.seed {
        Some(seed) => ParticleRng::new(seed),
        None => ParticleRng::from_entropy(),
    };

    let sim = TrainingSimulation::with_rng(config, rng).context("Failed to build simulation")?;
    let stats = sim.stats_reader();

    // One fixed step per frame
    let clock = GameClock::with_fixed_step(args.dt as f64);
    let mut runner = SystemRunner::with_clock(training_scene(args.fire_distance), clock);
    runner.register(Box::new(sim))?;

    let text = args.format == "text";
    let steps = (args.duration / args.dt).round() as u64;
    let report_steps = ((args.report_every / args.dt).round() as u64).max(1);

    if text {
        println!(
            "Simulating {:.1}s at {:.1} Hz, fire {:.1} m away, spraying from {:.1}s",
            args.duration,
            1.0 / args.dt,
            args.fire_distance,
            args.spray_start
        );
        println!();
        println!(
            "{:>7}  {:>9}  {:>5}  {:>5}  {:>5}  {:>7}  {:>5}  {:>8}  {:>7}",
            "time", "intensity", "light", "flame", "smoke", "ceiling", "foam", "grounded", "on fire"
        );
    }

    let mut spraying = false;
    let mut extinguished_at = None;
    let mut samples = Vec::new();

    for step in 0..steps {
        let t = step as f32 * args.dt;
        let want_spray = t >= args.spray_start && args.spray_end.map_or(true, |end| t < end);
        if want_spray != spraying {
            let event = if want_spray {
                TrainingEvent::SprayStarted
            } else {
                TrainingEvent::SprayStopped
            };
            runner.scene_mut().events.push(event);
            spraying = want_spray;
        }

        runner.step(args.dt as f64);

        let snapshot = stats.get();
        if snapshot.extinguished && extinguished_at.is_none() {
            extinguished_at = Some(snapshot.time);
            if text {
                println!("  -- fire extinguished at {:.2}s --", snapshot.time);
            }
        }
        if (step + 1) % report_steps == 0 {
            if text {
                print_row(&snapshot);
            }
            samples.push(snapshot);
        }
    }

    runner.shutdown()?;

    let final_intensity = samples
        .last()
        .map(|s| s.fire_intensity)
        .unwrap_or_else(|| stats.get().fire_intensity);

    if text {
        println!();
        match extinguished_at {
            Some(t) => println!("Fire extinguished at {:.2}s", t),
            None => println!("Fire still burning (intensity {:.3})", final_intensity),
        }
    } else {
        let report = Report {
            duration: args.duration,
            dt: args.dt,
            spray_start: args.spray_start,
            spray_end: args.spray_end,
            extinguished_at,
            final_intensity,
            samples,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Fire on the floor straight ahead; trainee at the origin aiming at it
fn training_scene(fire_distance: f32) -> SceneState {
    let anchor = Vec3::new(0.0, 0.0, -fire_distance);
    let nozzle_position = Vec3::new(0.0, NOZZLE_HEIGHT, 0.0);
    let aim = anchor + Vec3::new(0.0, AIM_HEIGHT, 0.0);
    SceneState::new()
        .with_fire_anchor(anchor)
        .with_nozzle(Nozzle::new(nozzle_position, aim - nozzle_position))
        .with_camera(Vec3::new(0.0, EYE_HEIGHT, 0.0))
}

fn print_row(s: &SimulationStats) {
    println!(
        "{:>6.2}s  {:>9.3}  {:>5.2}  {:>5}  {:>5}  {:>7}  {:>5}  {:>8}  {:>7}",
        s.time,
        s.fire_intensity,
        s.light_intensity,
        s.flame,
        s.rising_smoke,
        s.ceiling_smoke,
        s.foam,
        s.grounded_foam,
        s.foam_on_fire
    );
}
