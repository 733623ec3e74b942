use thiserror::Error;

use crate::model::BodyID;

/// Errors raised by the physics core.
///
/// Only precondition violations are reported. Numerical hazards during a
/// tick (near-zero separations, NaN from degenerate input) are not errors:
/// the former are damped by softening and the latter propagate silently.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("body mass must be positive, got {0}")]
    NonPositiveMass(f64),
    #[error("body radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("body {0} must be finite")]
    NonFiniteInput(&'static str),
    #[error("no body with id {0:?} in the system")]
    UnknownBody(BodyID),
    #[error("barycenter of an empty system is undefined")]
    EmptySystem,
    #[error("barycenter of a system with zero total mass is undefined")]
    MasslessSystem,
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
