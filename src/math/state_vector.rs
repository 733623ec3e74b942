use std::ops::{Add, AddAssign, Index, Mul};

use nalgebra::{Quaternion, SVector, Vector3, Vector4};

/// Number of scalars in the integrable state of one rigid body.
pub const STATE_DIM: usize = 13;

const POSITION: usize = 0;
const MOMENTUM: usize = 3;
const ORIENTATION: usize = 6;
const ANGULAR_MOMENTUM: usize = 10;

/// The integrable state of a single rigid body.
///
/// The layout is fixed:
/// `[p.x, p.y, p.z, m.x, m.y, m.z, q.x, q.y, q.z, q.w, L.x, L.y, L.z]`
/// where `p` is the position, `m` the linear momentum, `q` the orientation
/// quaternion (vector part first, scalar part last) and `L` the angular
/// momentum.
///
/// The same type is used for derivatives, in which case each slot holds the
/// time derivative of the corresponding component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector(SVector<f64, STATE_DIM>);

impl StateVector {
    pub fn zeros() -> Self {
        StateVector(SVector::zeros())
    }

    pub fn from_parts(
        position: &Vector3<f64>,
        momentum: &Vector3<f64>,
        orientation: &Quaternion<f64>,
        angular_momentum: &Vector3<f64>,
    ) -> Self {
        let mut data = SVector::<f64, STATE_DIM>::zeros();
        data.fixed_rows_mut::<3>(POSITION).copy_from(position);
        data.fixed_rows_mut::<3>(MOMENTUM).copy_from(momentum);
        // nalgebra stores quaternions as (i, j, k, w), which is exactly our layout
        data.fixed_rows_mut::<4>(ORIENTATION).copy_from(&orientation.coords);
        data.fixed_rows_mut::<3>(ANGULAR_MOMENTUM).copy_from(angular_momentum);
        StateVector(data)
    }

    pub fn position(&self) -> Vector3<f64> {
        self.0.fixed_rows::<3>(POSITION).into_owned()
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.0.fixed_rows::<3>(MOMENTUM).into_owned()
    }

    /// The orientation slice as a raw (not necessarily unit) quaternion.
    pub fn orientation(&self) -> Quaternion<f64> {
        let coords: Vector4<f64> = self.0.fixed_rows::<4>(ORIENTATION).into_owned();
        Quaternion::from_vector(coords)
    }

    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.0.fixed_rows::<3>(ANGULAR_MOMENTUM).into_owned()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    pub fn norm(&self) -> f64 {
        self.0.norm()
    }
}

impl Default for StateVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Index<usize> for StateVector {
    type Output = f64;

    fn index(&self, idx: usize) -> &f64 {
        &self.0[idx]
    }
}

impl Add for StateVector {
    type Output = StateVector;

    fn add(self, rhs: StateVector) -> StateVector {
        StateVector(self.0 + rhs.0)
    }
}

impl AddAssign for StateVector {
    fn add_assign(&mut self, rhs: StateVector) {
        self.0 += rhs.0;
    }
}

impl Mul<f64> for StateVector {
    type Output = StateVector;

    fn mul(self, rhs: f64) -> StateVector {
        StateVector(self.0 * rhs)
    }
}

impl Mul<StateVector> for f64 {
    type Output = StateVector;

    fn mul(self, rhs: StateVector) -> StateVector {
        rhs * self
    }
}
