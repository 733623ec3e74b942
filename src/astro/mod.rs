//! Physics of individual bodies.
//!
//! The important items in this module are:
//! - [RigidBody], which owns the integrable state of one body and knows how
//!   to advance it with an [Integrator](crate::math::integrator::Integrator)
//! - [Gravity], which accumulates the softened Newtonian pull on one body
//!   from a list of others
//! - [EphemerisRecord] and [BodyParams], which describe bodies before they
//!   are handed to the simulation

mod body;
mod gravity;
mod inertia;
mod units;

pub use body::{derivative, Accumulator, DynamicsSnapshot, RigidBody};
pub use gravity::{Gravity, GRAVITATIONAL_CONSTANT, SOFTENING};
pub use inertia::{ConstantTensor, HollowSphere, InertiaCalculator, SolidSphere};
pub use units::{BodyParams, EphemerisRecord, LENGTH_SCALE, MASS_SCALE, VELOCITY_SCALE};

use nalgebra::Vector3;

/// A trait indicating this object can act as a source (or target) of
/// gravitational attraction.
pub trait HasMass {
    /// The mass of this object, in Jupiter masses
    fn mass(&self) -> f64;

    /// The current position of this object
    fn position(&self) -> Vector3<f64>;

    fn to_point_mass(&self) -> PointMass {
        PointMass::new(self.mass(), self.position())
    }
}

/// A point mass with no other physical properties.
///
/// Useful for satisfying a [HasMass] trait bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    mass: f64,
    position: Vector3<f64>,
}

impl PointMass {
    pub fn new(mass: f64, position: Vector3<f64>) -> Self {
        Self { mass, position }
    }
}

impl HasMass for PointMass {
    fn mass(&self) -> f64 {
        self.mass
    }

    fn position(&self) -> Vector3<f64> {
        self.position
    }
}

impl<T> HasMass for &T
where
    T: HasMass,
{
    fn mass(&self) -> f64 {
        (*self).mass()
    }

    fn position(&self) -> Vector3<f64> {
        (*self).position()
    }
}
