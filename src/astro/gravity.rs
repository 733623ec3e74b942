use nalgebra::Vector3;
use serde::Deserialize;

use super::body::RigidBody;
use super::HasMass;

/// Newton's gravitational constant, in AU^3 / (Jupiter mass * year^2)
pub const GRAVITATIONAL_CONSTANT: f64 = 0.03765;

/// Added to the raw separation (not its square) before cubing
pub const SOFTENING: f64 = 1.0e-10;

/// Softened Newtonian gravity.
///
/// Forces are computed one target at a time against a list of candidates.
/// Nothing is applied back to the candidates, so each body's force only
/// depends on where the others are at the moment it is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Gravity {
    #[serde(rename = "G", default = "default_g")]
    pub g: f64,
    #[serde(default = "default_softening")]
    pub softening: f64,
}

fn default_g() -> f64 {
    GRAVITATIONAL_CONSTANT
}

fn default_softening() -> f64 {
    SOFTENING
}

impl Default for Gravity {
    fn default() -> Self {
        Gravity {
            g: GRAVITATIONAL_CONSTANT,
            softening: SOFTENING,
        }
    }
}

impl Gravity {
    /// Force on `target` due to `source`.
    pub fn pairwise_force(&self, target: &impl HasMass, source: &impl HasMass) -> Vector3<f64> {
        let separation = source.position() - target.position();
        let distance = separation.norm() + self.softening;
        let distance_cubed = distance * distance * distance;
        separation * (self.g * source.mass() * target.mass() / distance_cubed)
    }

    /// Net force on `bodies[target]` from every candidate index. The target
    /// is allowed to appear among the candidates; it is skipped.
    pub fn net_force<B, I>(&self, target: usize, bodies: &[B], candidates: I) -> Vector3<f64>
    where
        B: HasMass,
        I: IntoIterator<Item = usize>,
    {
        let body_i = &bodies[target];
        let mut force = Vector3::zeros();
        for j in candidates {
            if j != target {
                force += self.pairwise_force(body_i, &bodies[j]);
            }
        }
        force
    }

    /// Adds the net force from the candidates onto the target's accumulator.
    pub fn apply<I>(&self, target: usize, bodies: &mut [RigidBody], candidates: I)
    where
        I: IntoIterator<Item = usize>,
    {
        let force = self.net_force(target, &*bodies, candidates);
        bodies[target].apply_force(force);
    }
}
