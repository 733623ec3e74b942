use std::sync::Arc;

use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};

use super::inertia::InertiaCalculator;
use super::units::BodyParams;
use super::HasMass;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::integrator::Integrator;
use crate::math::state_vector::StateVector;

/// Force and torque collected for the current step. Cleared as soon as the
/// body has been integrated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

/// Everything the vector field needs besides the trial state itself.
///
/// A snapshot is taken once per step, so the inertia tensor and the
/// accumulated force and torque stay fixed across all integrator sub-stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsSnapshot {
    pub mass: f64,
    pub inverse_inertia: Matrix3<f64>,
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

/// Time derivative of a rigid body's state.
///
/// `x` may be a trial state from inside an integrator, not the body's stored
/// state. Nothing here depends on `t`.
pub fn derivative(_t: f64, x: &StateVector, snapshot: &DynamicsSnapshot) -> StateVector {
    let velocity = x.momentum() / snapshot.mass;

    // dq/dt = 1/2 q * (w, 0)
    let angular_velocity = snapshot.inverse_inertia * x.angular_momentum();
    let spin = Quaternion::from_parts(0.0, angular_velocity);
    let orientation_rate = (x.orientation() * spin) * 0.5;

    StateVector::from_parts(&velocity, &snapshot.force, &orientation_rate, &snapshot.torque)
}

#[derive(Debug, Clone)]
pub struct RigidBody {
    name: String,
    mass: f64,
    radius: f64,
    inertia_calculator: Arc<dyn InertiaCalculator>,
    inertia: Matrix3<f64>,
    inverse_inertia: Matrix3<f64>,
    // -- derived from the state vector after every step --
    position: Vector3<f64>,
    velocity: Vector3<f64>,
    orientation: UnitQuaternion<f64>,
    angular_momentum: Vector3<f64>,
    angular_velocity: Vector3<f64>,
    // -- transient --
    accumulator: Accumulator,
}

// A singular tensor yields zero angular velocity instead of infinities.
fn invert_inertia(inertia: &Matrix3<f64>) -> Matrix3<f64> {
    inertia.try_inverse().unwrap_or_else(Matrix3::zeros)
}

impl RigidBody {
    pub fn new(
        params: &BodyParams,
        inertia_calculator: Arc<dyn InertiaCalculator>,
    ) -> PhysicsResult<Self> {
        // Written so that NaN fails the checks too
        if !(params.mass > 0.0) {
            return Err(PhysicsError::NonPositiveMass(params.mass));
        }
        if !(params.radius > 0.0) {
            return Err(PhysicsError::NonPositiveRadius(params.radius));
        }
        if !params.position.iter().all(|c| c.is_finite()) {
            return Err(PhysicsError::NonFiniteInput("position"));
        }
        if !params.velocity.iter().all(|c| c.is_finite()) {
            return Err(PhysicsError::NonFiniteInput("velocity"));
        }

        let inertia = inertia_calculator.inertia_tensor(params.mass, params.radius);
        Ok(RigidBody {
            name: params.name.clone(),
            mass: params.mass,
            radius: params.radius,
            inertia_calculator,
            inertia,
            inverse_inertia: invert_inertia(&inertia),
            position: params.position,
            velocity: params.velocity,
            orientation: UnitQuaternion::identity(),
            angular_momentum: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            accumulator: Accumulator::default(),
        })
    }

    /// Starts the body spinning with the given angular velocity.
    pub fn with_angular_velocity(mut self, angular_velocity: Vector3<f64>) -> Self {
        self.angular_momentum = self.inertia * angular_velocity;
        self.angular_velocity = angular_velocity;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity * self.mass
    }

    pub fn orientation(&self) -> UnitQuaternion<f64> {
        self.orientation
    }

    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.angular_momentum
    }

    pub fn angular_velocity(&self) -> Vector3<f64> {
        self.angular_velocity
    }

    pub fn inertia_tensor(&self) -> Matrix3<f64> {
        self.inertia
    }

    pub fn accumulator(&self) -> Accumulator {
        self.accumulator
    }

    pub fn apply_force(&mut self, force: Vector3<f64>) {
        self.accumulator.force += force;
    }

    pub fn apply_torque(&mut self, torque: Vector3<f64>) {
        self.accumulator.torque += torque;
    }

    pub fn state_vector(&self) -> StateVector {
        StateVector::from_parts(
            &self.position,
            &self.momentum(),
            self.orientation.quaternion(),
            &self.angular_momentum,
        )
    }

    pub fn snapshot(&self) -> DynamicsSnapshot {
        DynamicsSnapshot {
            mass: self.mass,
            inverse_inertia: self.inverse_inertia,
            force: self.accumulator.force,
            torque: self.accumulator.torque,
        }
    }

    /// Advances this body by one step of size `h`, using whatever force and
    /// torque have been accumulated so far.
    pub fn integrate(&mut self, integrator: Integrator, t: f64, h: f64) {
        let snapshot = self.snapshot();
        let next = integrator.step(
            |t, x: &StateVector| derivative(t, x, &snapshot),
            &self.state_vector(),
            t,
            h,
        );
        self.apply_state(&next);
    }

    fn apply_state(&mut self, x: &StateVector) {
        self.position = x.position();
        self.velocity = x.momentum() / self.mass;
        self.orientation = UnitQuaternion::from_quaternion(x.orientation());

        // The tensor must be refreshed before deriving the angular velocity
        self.inertia = self.inertia_calculator.inertia_tensor(self.mass, self.radius);
        self.inverse_inertia = invert_inertia(&self.inertia);
        self.angular_momentum = x.angular_momentum();
        self.angular_velocity = self.inverse_inertia * self.angular_momentum;

        self.accumulator = Accumulator::default();
    }
}

impl HasMass for RigidBody {
    fn mass(&self) -> f64 {
        self.mass
    }

    fn position(&self) -> Vector3<f64> {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::astro::inertia::{ConstantTensor, SolidSphere};

    fn params(mass: f64, velocity: Vector3<f64>) -> BodyParams {
        BodyParams {
            name: "test".to_owned(),
            mass,
            radius: 1.0,
            position: Vector3::new(1.0, 2.0, 3.0),
            velocity,
        }
    }

    fn sphere(mass: f64, velocity: Vector3<f64>) -> RigidBody {
        RigidBody::new(&params(mass, velocity), Arc::new(SolidSphere)).unwrap()
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let calc: Arc<dyn InertiaCalculator> = Arc::new(SolidSphere);

        let zero_mass = params(0.0, Vector3::zeros());
        assert_eq!(
            RigidBody::new(&zero_mass, calc.clone()).unwrap_err(),
            PhysicsError::NonPositiveMass(0.0)
        );

        let mut negative_radius = params(1.0, Vector3::zeros());
        negative_radius.radius = -2.0;
        assert_eq!(
            RigidBody::new(&negative_radius, calc.clone()).unwrap_err(),
            PhysicsError::NonPositiveRadius(-2.0)
        );

        let nan_mass = params(f64::NAN, Vector3::zeros());
        assert!(matches!(
            RigidBody::new(&nan_mass, calc.clone()),
            Err(PhysicsError::NonPositiveMass(_))
        ));

        let infinite_velocity = params(1.0, Vector3::new(f64::INFINITY, 0.0, 0.0));
        assert_eq!(
            RigidBody::new(&infinite_velocity, calc).unwrap_err(),
            PhysicsError::NonFiniteInput("velocity")
        );
    }

    #[test]
    fn test_derivative_layout() {
        let snapshot = DynamicsSnapshot {
            mass: 2.0,
            inverse_inertia: Matrix3::identity(),
            force: Vector3::new(0.1, 0.2, 0.3),
            torque: Vector3::new(-1.0, 0.0, 1.0),
        };
        let x = StateVector::from_parts(
            &Vector3::new(5.0, 5.0, 5.0),
            &Vector3::new(2.0, 4.0, 6.0),
            &Quaternion::identity(),
            &Vector3::new(0.0, 0.0, 2.0),
        );

        let dx = derivative(0.0, &x, &snapshot);
        assert_eq!(dx.position(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(dx.momentum(), snapshot.force);
        assert_eq!(dx.angular_momentum(), snapshot.torque);
        // identity * (0, 0, 2, 0) / 2
        assert_eq!(dx.orientation(), Quaternion::new(0.0, 0.0, 0.0, 1.0));

        // Time plays no role
        assert_eq!(derivative(123.0, &x, &snapshot), dx);
    }

    #[test]
    fn test_derivative_uses_snapshot_inertia() {
        // The trial state carries angular momentum, but the angular velocity
        // comes from the frozen inverse inertia in the snapshot.
        let x = StateVector::from_parts(
            &Vector3::zeros(),
            &Vector3::zeros(),
            &Quaternion::identity(),
            &Vector3::new(4.0, 0.0, 0.0),
        );
        let snapshot = DynamicsSnapshot {
            mass: 1.0,
            inverse_inertia: Matrix3::identity() * 0.5,
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        };

        let dx = derivative(0.0, &x, &snapshot);
        // w = (2, 0, 0), so dq/dt = 1/2 (2, 0, 0, 0)
        assert_eq!(dx.orientation(), Quaternion::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn test_free_body_euler_step() {
        let velocity = Vector3::new(0.3, -0.2, 0.1);
        let mut body = sphere(2.5, velocity);
        let start = body.position();

        let h = 0.01;
        for n in 1..=10 {
            body.integrate(Integrator::Euler, 0.0, h);
            assert_relative_eq!(
                body.position(),
                start + velocity * (h * n as f64),
                max_relative = 1e-12
            );
            assert_relative_eq!(body.velocity(), velocity, max_relative = 1e-12);
        }

        // No torque, no spin: orientation is untouched
        assert_eq!(body.orientation(), UnitQuaternion::identity());
        assert_eq!(body.angular_velocity(), Vector3::zeros());
    }

    #[test]
    fn test_accumulators_reset_after_step() {
        let mut body = sphere(1.0, Vector3::zeros());
        body.apply_force(Vector3::new(1.0, 0.0, 0.0));
        body.apply_force(Vector3::new(1.0, 0.0, 0.0));
        body.apply_torque(Vector3::new(0.0, 0.0, 0.5));
        assert_eq!(body.accumulator().force, Vector3::new(2.0, 0.0, 0.0));

        body.integrate(Integrator::Euler, 0.0, 0.5);

        // p' = p + h F = (1, 0, 0), so v = (1, 0, 0)
        assert_relative_eq!(body.velocity(), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(body.angular_momentum(), Vector3::new(0.0, 0.0, 0.25));
        assert_eq!(body.accumulator(), Accumulator::default());

        // Nothing accumulated this time, so momentum stays put
        body.integrate(Integrator::Euler, 0.0, 0.5);
        assert_relative_eq!(body.velocity(), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_rk4_constant_force_is_exact() {
        // With a force that is frozen over the step, RK4 recovers the exact
        // x + v h + 1/2 a h^2.
        let mut body = sphere(2.0, Vector3::new(1.0, 0.0, 0.0));
        body.apply_force(Vector3::new(0.0, 4.0, 0.0));
        body.integrate(Integrator::RungeKutta4, 0.0, 0.5);

        let expected_position = Vector3::new(1.5, 2.25, 3.0);
        assert_relative_eq!(body.position(), expected_position, max_relative = 1e-14);
        let expected_velocity = Vector3::new(1.0, 1.0, 0.0);
        assert_relative_eq!(body.velocity(), expected_velocity, max_relative = 1e-14);
    }

    #[test]
    fn test_angular_velocity_from_refreshed_tensor() {
        let tensor = Matrix3::from_diagonal(&Vector3::new(1.0, 2.0, 4.0));
        let calc = Arc::new(ConstantTensor(tensor));
        let mut body = RigidBody::new(&params(1.0, Vector3::zeros()), calc)
            .unwrap()
            .with_angular_velocity(Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(body.angular_momentum(), Vector3::new(1.0, 2.0, 4.0));

        body.apply_torque(Vector3::new(0.0, 0.0, 4.0));
        body.integrate(Integrator::Euler, 0.0, 1.0);

        assert_relative_eq!(body.angular_momentum(), Vector3::new(1.0, 2.0, 8.0));
        assert_relative_eq!(body.angular_velocity(), Vector3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_spin_about_axis() {
        // Spinning at 1 rad per unit time about z, for one unit of time
        let mut body = sphere(1.0, Vector3::zeros()).with_angular_velocity(Vector3::z());
        for _ in 0..100 {
            body.integrate(Integrator::RungeKutta4, 0.0, 0.01);
        }

        let orientation = body.orientation();
        assert_abs_diff_eq!(orientation.angle(), 1.0, epsilon = 1e-9);
        let axis = orientation.axis().unwrap();
        assert_relative_eq!(axis.into_inner(), Vector3::z(), epsilon = 1e-9);
        assert_relative_eq!(body.angular_velocity(), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_quaternion_stays_normalized() {
        let mut body =
            sphere(1.0, Vector3::zeros()).with_angular_velocity(Vector3::new(3.0, -1.0, 2.0));
        for integrator in [Integrator::Euler, Integrator::RungeKutta4] {
            for _ in 0..1000 {
                body.apply_torque(Vector3::new(0.01, 0.02, -0.03));
                body.integrate(integrator, 0.0, 0.01);
                let norm = body.orientation().quaternion().norm();
                assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-9);
            }
        }
    }
}
