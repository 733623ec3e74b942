use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use kiss3d::light::Light;
use kiss3d::window::Window;

use rust_gravity::config::ScenarioConfig;
use rust_gravity::gui::{Simulation, FRAMES_PER_SECOND};

/// Interactive N-body viewer.
///
/// Space pauses, `.` and `,` change speed, I switches integrator, Q and E
/// cycle the focus, T, G and X toggle trails, grid and axes. Drag or use
/// WASD to orbit the camera; scroll or use +/- to zoom.
#[derive(Debug, Parser)]
struct Args {
    /// Scenario file to load
    #[arg(long, default_value = "scenarios/solar-system.yaml")]
    scenario: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ScenarioConfig::load(&args.scenario)?;

    let mut window = Window::new("Rust Gravity");
    window.set_light(Light::StickToCamera);
    window.set_framerate_limit(Some(FRAMES_PER_SECOND));

    let simulation = Simulation::new(&config, &mut window)?;
    window.render_loop(simulation);
    Ok(())
}
