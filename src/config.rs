//! Scenario files.
//!
//! A scenario is a YAML document listing the bodies to simulate, in
//! ephemeris units, plus optional simulation and gravity settings:
//!
//! ```yaml
//! simulation:
//!   integrator: rk4       # or euler
//!   speed: weeks          # minutes | hours | days | weeks | months
//!
//! gravity:
//!   G: 0.03765
//!   softening: 1.0e-10
//!
//! bodies:
//!   - name: Sun
//!     mass: 19885440.0    # 10^24 kg
//!     radius: 695500.0    # km
//!     position: [-1.1e-3, 7.5e-3, -4.7e-5]   # AU
//!     velocity: [-8.1e-6, 1.5e-6, 2.0e-7]    # AU / day
//!     inertia: solid_sphere                   # optional
//!     color: "ffcc33"                         # optional
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use nalgebra::{Point3, Vector3};
use serde::Deserialize;

use crate::astro::{EphemerisRecord, Gravity, HollowSphere, InertiaCalculator, SolidSphere};
use crate::math::integrator::Integrator;
use crate::model::{BodyID, System};

/// How much simulated time passes per frame, as a number of ticks and the
/// step size of each tick in years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPreset {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

// At 30 frames per second, one simulated day per second
const DAY_STEP: f64 = 1.0 / 365.0 / 30.0;

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 5] = [
        SpeedPreset::Minutes,
        SpeedPreset::Hours,
        SpeedPreset::Days,
        SpeedPreset::Weeks,
        SpeedPreset::Months,
    ];

    pub fn step_size(self) -> f64 {
        match self {
            SpeedPreset::Minutes => DAY_STEP / 24.0 / 60.0,
            SpeedPreset::Hours => DAY_STEP / 24.0,
            SpeedPreset::Days | SpeedPreset::Weeks | SpeedPreset::Months => DAY_STEP,
        }
    }

    pub fn repeats(self) -> usize {
        match self {
            SpeedPreset::Minutes | SpeedPreset::Hours | SpeedPreset::Days => 1,
            SpeedPreset::Weeks => 7,
            SpeedPreset::Months => 30,
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    /// The next faster preset, saturating at the fastest.
    pub fn faster(self) -> Self {
        Self::ALL[(self.index() + 1).min(Self::ALL.len() - 1)]
    }

    /// The next slower preset, saturating at the slowest.
    pub fn slower(self) -> Self {
        Self::ALL[self.index().saturating_sub(1)]
    }
}

impl Default for SpeedPreset {
    fn default() -> Self {
        SpeedPreset::Days
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            SpeedPreset::Minutes => "minutes",
            SpeedPreset::Hours => "hours",
            SpeedPreset::Days => "days",
            SpeedPreset::Weeks => "weeks",
            SpeedPreset::Months => "months",
        };
        write!(f, "{} per second", unit)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub integrator: Integrator,
    pub speed: SpeedPreset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InertiaConfig {
    SolidSphere,
    HollowSphere,
}

impl InertiaConfig {
    pub fn calculator(self) -> Arc<dyn InertiaCalculator> {
        match self {
            InertiaConfig::SolidSphere => Arc::new(SolidSphere),
            InertiaConfig::HollowSphere => Arc::new(HollowSphere),
        }
    }
}

impl Default for InertiaConfig {
    fn default() -> Self {
        InertiaConfig::SolidSphere
    }
}

/// One body, in ephemeris units.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    #[serde(default)]
    pub inertia: InertiaConfig,
    /// Display color as six hex digits, e.g. `ffcc33`
    #[serde(default)]
    pub color: Option<String>,
}

impl BodyConfig {
    pub fn to_record(&self) -> EphemerisRecord {
        EphemerisRecord {
            name: self.name.clone(),
            mass: self.mass,
            radius: self.radius,
            position: Vector3::from(self.position),
            velocity: Vector3::from(self.velocity),
        }
    }

    pub fn color(&self) -> Result<Option<Point3<f32>>> {
        self.color
            .as_deref()
            .map(parse_color)
            .transpose()
            .with_context(|| format!("bad color for body {}", self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub gravity: Gravity,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let config = serde_yaml::from_str(s).context("could not parse scenario")?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("could not read scenario {}", path.display()))?;
        let config = Self::from_yaml_str(&contents)
            .with_context(|| format!("in scenario {}", path.display()))?;
        log::info!("Loaded {} bodies from {}", config.bodies.len(), path.display());
        Ok(config)
    }

    /// Builds the system, returning the IDs of the bodies in file order.
    pub fn build_system(&self) -> Result<(System, Vec<BodyID>)> {
        if self.bodies.is_empty() {
            log::warn!("Scenario has no bodies");
        }

        let mut system = System::new(self.gravity);
        let mut ids = Vec::with_capacity(self.bodies.len());
        for body in &self.bodies {
            let id = system
                .create_body_from_ephemeris(&body.to_record(), body.inertia.calculator())
                .with_context(|| format!("invalid body {}", body.name))?;
            ids.push(id);
        }
        Ok((system, ids))
    }
}

fn parse_color(s: &str) -> Result<Point3<f32>> {
    if s.len() != 6 || !s.is_ascii() {
        return Err(anyhow!("expected six hex digits, got {:?}", s));
    }
    let channel = |i: usize| -> Result<f32> {
        let value = u8::from_str_radix(&s[i..i + 2], 16)?;
        Ok(value as f32 / 255.0)
    };
    Ok(Point3::new(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::astro::{GRAVITATIONAL_CONSTANT, SOFTENING};
    use crate::error::PhysicsError;

    const TWO_BODIES: &str = r#"
bodies:
  - name: Sun
    mass: 19885440.0
    radius: 695500.0
    position: [0.0, 0.0, 0.0]
    velocity: [0.0, 0.0, 0.0]
  - name: Jupiter
    mass: 18981.3
    radius: 69911
    position: [5.2, 0.0, 0.0]
    velocity: [0.0, 0.00752, 0.0]
    inertia: hollow_sphere
    color: ff8000
"#;

    #[test]
    fn test_defaults() {
        let config = ScenarioConfig::from_yaml_str(TWO_BODIES).unwrap();
        assert_eq!(config.simulation.integrator, Integrator::Euler);
        assert_eq!(config.simulation.speed, SpeedPreset::Days);
        assert_eq!(config.gravity.g, GRAVITATIONAL_CONSTANT);
        assert_eq!(config.gravity.softening, SOFTENING);
        assert_eq!(config.bodies[0].inertia, InertiaConfig::SolidSphere);
        assert_eq!(config.bodies[1].inertia, InertiaConfig::HollowSphere);
        assert_eq!(config.bodies[0].color().unwrap(), None);
        assert_eq!(
            config.bodies[1].color().unwrap(),
            Some(Point3::new(1.0, 128.0 / 255.0, 0.0))
        );
    }

    #[test]
    fn test_explicit_settings() {
        let yaml = r#"
simulation:
  integrator: rk4
  speed: months
gravity:
  G: 1.0
bodies: []
"#;
        let config = ScenarioConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.simulation.integrator, Integrator::RungeKutta4);
        assert_eq!(config.simulation.speed, SpeedPreset::Months);
        assert_eq!(config.gravity.g, 1.0);
        assert_eq!(config.gravity.softening, SOFTENING);

        let (system, ids) = config.build_system().unwrap();
        assert!(system.is_empty());
        assert!(ids.is_empty());
    }

    #[test]
    fn test_rejects_unknown_integrator() {
        let yaml = "simulation:\n  integrator: leapfrog\nbodies: []\n";
        assert!(ScenarioConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_build_system_normalizes() {
        let config = ScenarioConfig::from_yaml_str(TWO_BODIES).unwrap();
        let (system, ids) = config.build_system().unwrap();
        assert_eq!(ids.len(), 2);

        let jupiter = system.body(ids[1]).unwrap();
        assert_eq!(jupiter.name(), "Jupiter");
        assert_relative_eq!(jupiter.mass(), 1.0, max_relative = 1e-15);
        assert_relative_eq!(jupiter.radius(), 69911.0 / 150e6);
        assert_relative_eq!(jupiter.velocity(), Vector3::new(0.0, 0.00752 * 365.25, 0.0));
    }

    #[test]
    fn test_build_system_reports_bad_body() {
        let yaml = TWO_BODIES.replace("mass: 18981.3", "mass: -1.0");
        let config = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        let err = config.build_system().unwrap_err();
        assert!(err.to_string().contains("Jupiter"));
        assert!(matches!(
            err.downcast_ref::<PhysicsError>(),
            Some(PhysicsError::NonPositiveMass(_))
        ));
    }

    #[test]
    fn test_bad_color() {
        let yaml = TWO_BODIES.replace("ff8000", "orange");
        let config = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        assert!(config.bodies[1].color().is_err());
    }

    #[test]
    fn test_speed_presets() {
        assert_relative_eq!(SpeedPreset::Minutes.step_size(), 1.0 / 365.0 / 30.0 / 24.0 / 60.0);
        assert_relative_eq!(SpeedPreset::Hours.step_size(), 1.0 / 365.0 / 30.0 / 24.0);
        assert_eq!(SpeedPreset::Weeks.repeats(), 7);
        assert_eq!(SpeedPreset::Months.repeats(), 30);
        assert_eq!(SpeedPreset::Months.step_size(), SpeedPreset::Days.step_size());

        assert_eq!(SpeedPreset::Days.faster(), SpeedPreset::Weeks);
        assert_eq!(SpeedPreset::Months.faster(), SpeedPreset::Months);
        assert_eq!(SpeedPreset::Hours.slower(), SpeedPreset::Minutes);
        assert_eq!(SpeedPreset::Minutes.slower(), SpeedPreset::Minutes);
        assert_eq!(SpeedPreset::Weeks.to_string(), "weeks per second");
    }
}
