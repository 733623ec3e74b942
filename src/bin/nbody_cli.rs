use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Parser;

use rust_gravity::config::{ScenarioConfig, SpeedPreset};
use rust_gravity::math::integrator::Integrator;

/// Runs a scenario without a window and reports where everything ended up.
#[derive(Debug, Parser)]
struct Args {
    /// Scenario file to load
    #[arg(long, default_value = "scenarios/solar-system.yaml")]
    scenario: PathBuf,
    /// Number of frames to run; each frame is one speed preset's worth of ticks
    #[arg(long, default_value_t = 365)]
    ticks: usize,
    /// Overrides the scenario's integrator
    #[arg(long, value_enum)]
    integrator: Option<Integrator>,
    /// Overrides the scenario's speed preset
    #[arg(long, value_enum)]
    speed: Option<SpeedPreset>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ScenarioConfig::load(&args.scenario)?;
    let integrator = args.integrator.unwrap_or(config.simulation.integrator);
    let speed = args.speed.unwrap_or(config.simulation.speed);

    let (mut system, _) = config.build_system()?;
    ensure!(!system.is_empty(), "scenario {} has no bodies", args.scenario.display());

    let initial_momentum = system.total_momentum();
    let initial_barycenter = system.barycenter();

    for _ in 0..args.ticks {
        system.advance(speed.step_size(), integrator, speed.repeats());
    }

    println!(
        "Ran {} ticks ({}, {}) to t = {:.6} yr",
        system.ticks(),
        speed,
        integrator,
        system.time()
    );
    println!();
    println!("{:<12} {:>14} {:>14} {:>14}", "body", "x (AU)", "y (AU)", "z (AU)");
    for (_, body) in system.bodies() {
        let p = body.position();
        println!("{:<12} {:>14.6} {:>14.6} {:>14.6}", body.name(), p.x, p.y, p.z);
    }
    println!();

    let barycenter = system.barycenter();
    let drift = system.total_momentum() - initial_momentum;
    println!(
        "Barycenter: ({:.3e}, {:.3e}, {:.3e}), moved {:.3e} AU",
        barycenter.x,
        barycenter.y,
        barycenter.z,
        (barycenter - initial_barycenter).norm()
    );
    println!(
        "Momentum drift: {:.3e} (relative to total mass {:.3e})",
        drift.norm(),
        system.total_mass()
    );

    Ok(())
}
