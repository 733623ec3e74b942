use std::f64::consts::PI;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use nalgebra::Vector3;
use plotters::prelude::*;

use rust_gravity::astro::{BodyParams, Gravity, SolidSphere};
use rust_gravity::math::integrator::Integrator;
use rust_gravity::model::{BodyID, System};

const STEPS_PER_ORBIT: usize = 1000;
const ORBITS: usize = 3;

// Light enough that the central body barely moves
const SATELLITE_MASS: f64 = 1e-9;

/// Puts a light body on a circular orbit of radius 1 around a unit mass, and
/// returns the system along with the satellite's ID and angular velocity.
fn circular_orbit() -> Result<(System, BodyID, f64)> {
    let gravity = Gravity::default();
    let speed = gravity.g.sqrt();

    let mut system = System::new(gravity);
    let central = BodyParams {
        name: "central".to_owned(),
        mass: 1.0,
        radius: 1e-3,
        position: Vector3::zeros(),
        velocity: Vector3::zeros(),
    };
    let satellite = BodyParams {
        name: "satellite".to_owned(),
        mass: SATELLITE_MASS,
        radius: 1e-6,
        position: Vector3::x(),
        velocity: Vector3::y() * speed,
    };
    system.create_body(&central, Arc::new(SolidSphere))?;
    let id = system.create_body(&satellite, Arc::new(SolidSphere))?;
    Ok((system, id, speed))
}

/// Distance from the exact circular orbit after every step.
fn error_series(integrator: Integrator) -> Result<Vec<(f64, f64)>> {
    let (mut system, id, omega) = circular_orbit()?;
    let h = 2.0 * PI / omega / STEPS_PER_ORBIT as f64;

    let mut series = Vec::with_capacity(ORBITS * STEPS_PER_ORBIT);
    for _ in 0..ORBITS * STEPS_PER_ORBIT {
        system.tick(h, integrator);
        let t = system.time();
        let exact = Vector3::new((omega * t).cos(), (omega * t).sin(), 0.0);
        let position = system
            .position(id)
            .ok_or_else(|| anyhow!("satellite disappeared"))?;
        series.push((t, (position - exact).norm()));
    }
    Ok(series)
}

fn main() -> Result<()> {
    env_logger::init();

    let euler = error_series(Integrator::Euler)?;
    let rk4 = error_series(Integrator::RungeKutta4)?;

    let t_max = euler.last().map_or(1.0, |p| p.0);
    let floor = 1e-16;
    let e_max = euler
        .iter()
        .chain(rk4.iter())
        .map(|p| p.1)
        .fold(floor, f64::max);

    for (integrator, series) in [(Integrator::Euler, &euler), (Integrator::RungeKutta4, &rk4)] {
        if let Some((_, error)) = series.last() {
            println!("{}: final position error {:.3e} AU", integrator, error);
        }
    }

    std::fs::create_dir_all("plots")?;
    let root = BitMapBackend::new("plots/accuracy.png", (960, 640)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Position error on a circular orbit", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..t_max, (floor..e_max * 2.0).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("time (yr)")
        .y_desc("error (AU)")
        .draw()?;

    for (series, color, label) in [(&euler, RED, "Euler"), (&rk4, BLUE, "RK4")] {
        chart
            .draw_series(LineSeries::new(
                series.iter().map(|&(t, e)| (t, e.max(floor))),
                &color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    println!("Wrote plots/accuracy.png");
    Ok(())
}
