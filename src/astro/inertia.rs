use std::fmt::Debug;

use nalgebra::Matrix3;

/// Computes the inertia tensor of a body from its current mass and radius.
///
/// The tensor is recomputed once after every integration step, and is held
/// constant while the integrator evaluates its sub-stages.
pub trait InertiaCalculator: Debug + Send + Sync {
    fn inertia_tensor(&self, mass: f64, radius: f64) -> Matrix3<f64>;
}

/// Uniform solid sphere: `2/5 m r^2 I`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidSphere;

/// Thin spherical shell: `2/3 m r^2 I`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HollowSphere;

/// A fixed tensor that ignores mass and radius.
#[derive(Debug, Clone, Copy)]
pub struct ConstantTensor(pub Matrix3<f64>);

impl InertiaCalculator for SolidSphere {
    fn inertia_tensor(&self, mass: f64, radius: f64) -> Matrix3<f64> {
        Matrix3::identity() * (0.4 * mass * radius * radius)
    }
}

impl InertiaCalculator for HollowSphere {
    fn inertia_tensor(&self, mass: f64, radius: f64) -> Matrix3<f64> {
        Matrix3::identity() * (2.0 / 3.0 * mass * radius * radius)
    }
}

impl InertiaCalculator for ConstantTensor {
    fn inertia_tensor(&self, _mass: f64, _radius: f64) -> Matrix3<f64> {
        self.0
    }
}
