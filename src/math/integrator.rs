use std::fmt;
use std::ops::{Add, Mul};

use serde::Deserialize;

/// Fixed-step explicit integrators for `dx/dt = f(t, x)`.
///
/// Integrators are stateless: given the same `(f, x, t, h)` they always
/// produce the same result. They work over any value type that can be added
/// and scaled, which includes [StateVector](super::state_vector::StateVector),
/// plain `f64`s and nalgebra vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// `x' = x + h f(t, x)`
    Euler,
    /// Classical four-stage Runge-Kutta
    #[serde(alias = "rk4")]
    #[value(alias = "rk4")]
    RungeKutta4,
}

impl Integrator {
    pub fn step<V, F>(self, f: F, x: &V, t: f64, h: f64) -> V
    where
        V: Clone + Add<Output = V> + Mul<f64, Output = V>,
        F: Fn(f64, &V) -> V,
    {
        match self {
            Integrator::Euler => euler(f, x, t, h),
            Integrator::RungeKutta4 => rk4(f, x, t, h),
        }
    }

    /// The other integrator; handy for UI toggles.
    pub fn toggled(self) -> Self {
        match self {
            Integrator::Euler => Integrator::RungeKutta4,
            Integrator::RungeKutta4 => Integrator::Euler,
        }
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Integrator::Euler
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integrator::Euler => write!(f, "simple Euler method"),
            Integrator::RungeKutta4 => write!(f, "4th order Runge-Kutta"),
        }
    }
}

pub fn euler<V, F>(f: F, x: &V, t: f64, h: f64) -> V
where
    V: Clone + Add<Output = V> + Mul<f64, Output = V>,
    F: Fn(f64, &V) -> V,
{
    let k1 = f(t, x);
    x.clone() + k1 * h
}

pub fn rk4<V, F>(f: F, x: &V, t: f64, h: f64) -> V
where
    V: Clone + Add<Output = V> + Mul<f64, Output = V>,
    F: Fn(f64, &V) -> V,
{
    let half_h = h / 2.0;

    let k1 = f(t, x);
    let k2 = f(t + half_h, &(x.clone() + k1.clone() * half_h));
    let k3 = f(t + half_h, &(x.clone() + k2.clone() * half_h));
    let k4 = f(t + h, &(x.clone() + k3.clone() * h));

    let sum_of_k = (k1 + k2 * 2.0) + (k3 * 2.0 + k4);
    x.clone() + sum_of_k * (h / 6.0)
}
