//! Conversions from ephemeris-style input into the simulation's normalized
//! units.
//!
//! Internally, masses are in Jupiter masses, lengths in units of 1.5e8 km
//! (roughly one AU) and time in years. Input records use 10^24 kg, km, AU and
//! AU/day, which is what an ephemeris service typically hands out.

use nalgebra::Vector3;

/// Converts mass in 10^24 kg into Jupiter masses.
pub const MASS_SCALE: f64 = 1.0 / 18981.3;

/// Converts radius in km into simulation length units.
pub const LENGTH_SCALE: f64 = 1.0 / 150e6;

/// Converts velocity in AU/day into AU/year.
pub const VELOCITY_SCALE: f64 = 365.25;

/// Initial parameters of a body, already in normalized units.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyParams {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// A body as it is listed in an ephemeris, in input units.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRecord {
    pub name: String,
    /// 10^24 kg
    pub mass: f64,
    /// km
    pub radius: f64,
    /// AU
    pub position: Vector3<f64>,
    /// AU / day
    pub velocity: Vector3<f64>,
}

impl EphemerisRecord {
    pub fn normalized(&self) -> BodyParams {
        BodyParams {
            name: self.name.clone(),
            mass: self.mass * MASS_SCALE,
            radius: self.radius * LENGTH_SCALE,
            position: self.position,
            velocity: self.velocity * VELOCITY_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_jupiter_is_unit_mass() {
        let jupiter = EphemerisRecord {
            name: "Jupiter".to_owned(),
            mass: 18981.3,
            radius: 69911.0,
            position: Vector3::new(-1.8, -5.0, 0.06),
            velocity: Vector3::new(7.0e-3, -2.2e-3, -1.5e-4),
        };

        let params = jupiter.normalized();
        assert_relative_eq!(params.mass, 1.0, max_relative = 1e-15);
        assert_relative_eq!(params.radius, 69911.0 / 150e6);
        assert_eq!(params.position, jupiter.position);
        assert_relative_eq!(params.velocity, jupiter.velocity * 365.25);
        assert_eq!(params.name, "Jupiter");
    }
}
