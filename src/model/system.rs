use std::sync::Arc;

use nalgebra::Vector3;

use crate::astro::{BodyParams, EphemerisRecord, Gravity, InertiaCalculator, RigidBody};
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::integrator::Integrator;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

/// Which bodies pull on a given body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Affecting {
    /// Every body in the system at the time of the tick, itself included
    /// (the self-term is dropped by the accumulator).
    All,
    Only(Vec<BodyID>),
}

/// A gravitationally interacting set of rigid bodies, advanced in lockstep.
///
/// Bodies are kept in insertion order, and every tick walks them in that
/// order. Each body is integrated as soon as its force is known, so bodies
/// later in the order see the already-advanced positions of the earlier ones
/// (a Gauss-Seidel sweep rather than a simultaneous update).
#[derive(Debug, Clone)]
pub struct System {
    // Invariants:
    //   - `ids`, `bodies` and `affecting` are parallel and the same length
    //   - `ids` is strictly ascending, so lookups can binary search
    ids: Vec<BodyID>,
    bodies: Vec<RigidBody>,
    affecting: Vec<Affecting>,
    next_body_id: usize,
    gravity: Gravity,
    time: f64,
    ticks: u64,
}

impl System {
    pub fn new(gravity: Gravity) -> Self {
        System {
            ids: Vec::new(),
            bodies: Vec::new(),
            affecting: Vec::new(),
            next_body_id: 0,
            gravity,
            time: 0.0,
            ticks: 0,
        }
    }

    fn index_of(&self, id: BodyID) -> PhysicsResult<usize> {
        self.ids
            .binary_search(&id)
            .map_err(|_| PhysicsError::UnknownBody(id))
    }

    /// Adds a body described in normalized units. It is affected by every
    /// body in the system until told otherwise.
    pub fn create_body(
        &mut self,
        params: &BodyParams,
        inertia: Arc<dyn InertiaCalculator>,
    ) -> PhysicsResult<BodyID> {
        let body = RigidBody::new(params, inertia)?;

        let id = BodyID(self.next_body_id);
        self.next_body_id += 1;

        log::debug!(
            "Created body {} ({:?}): mass {:e}, radius {:e}",
            params.name,
            id,
            params.mass,
            params.radius
        );

        self.ids.push(id);
        self.bodies.push(body);
        self.affecting.push(Affecting::All);
        Ok(id)
    }

    /// Adds a body described in ephemeris units.
    pub fn create_body_from_ephemeris(
        &mut self,
        record: &EphemerisRecord,
        inertia: Arc<dyn InertiaCalculator>,
    ) -> PhysicsResult<BodyID> {
        self.create_body(&record.normalized(), inertia)
    }

    /// Removes a body, and drops it from every explicit affecting list.
    /// Must not be called while a tick is in progress.
    pub fn remove_body(&mut self, id: BodyID) -> PhysicsResult<RigidBody> {
        let idx = self.index_of(id)?;
        self.ids.remove(idx);
        self.affecting.remove(idx);
        let body = self.bodies.remove(idx);

        for affecting in self.affecting.iter_mut() {
            if let Affecting::Only(list) = affecting {
                list.retain(|other| *other != id);
            }
        }

        log::debug!("Removed body {} ({:?})", body.name(), id);
        Ok(body)
    }

    pub fn set_affecting_bodies(&mut self, id: BodyID, affecting: Affecting) -> PhysicsResult<()> {
        let idx = self.index_of(id)?;
        if let Affecting::Only(list) = &affecting {
            for other in list {
                self.index_of(*other)?;
            }
        }

        log::debug!("Body {:?} is now affected by {:?}", id, affecting);
        self.affecting[idx] = affecting;
        Ok(())
    }

    pub fn affecting_bodies(&self, id: BodyID) -> Option<&Affecting> {
        let idx = self.index_of(id).ok()?;
        Some(&self.affecting[idx])
    }

    /// Advances every body by one step of size `h`.
    pub fn tick(&mut self, h: f64, integrator: Integrator) {
        let System {
            ids,
            bodies,
            affecting,
            gravity,
            time,
            ..
        } = self;

        let num_bodies = bodies.len();
        for i in 0..num_bodies {
            match &affecting[i] {
                Affecting::All => gravity.apply(i, bodies, 0..num_bodies),
                Affecting::Only(list) => {
                    let candidates = list.iter().filter_map(|id| ids.binary_search(id).ok());
                    gravity.apply(i, bodies, candidates)
                }
            }
            bodies[i].integrate(integrator, *time, h);
        }

        self.time += h;
        self.ticks += 1;
        log::trace!("Tick {} done, t = {}", self.ticks, self.time);
    }

    /// Runs `repeats` ticks back to back.
    pub fn advance(&mut self, h: f64, integrator: Integrator, repeats: usize) {
        for _ in 0..repeats {
            self.tick(h, integrator);
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn gravity(&self) -> &Gravity {
        &self.gravity
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Body IDs in tick order.
    pub fn ids(&self) -> impl Iterator<Item = BodyID> + '_ {
        self.ids.iter().copied()
    }

    /// Bodies in tick order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyID, &RigidBody)> + '_ {
        self.ids.iter().copied().zip(self.bodies.iter())
    }

    pub fn body(&self, id: BodyID) -> Option<&RigidBody> {
        let idx = self.index_of(id).ok()?;
        Some(&self.bodies[idx])
    }

    /// Mutable access, e.g. to apply a torque before the next tick.
    pub fn body_mut(&mut self, id: BodyID) -> Option<&mut RigidBody> {
        let idx = self.index_of(id).ok()?;
        Some(&mut self.bodies[idx])
    }

    pub fn find_by_name(&self, name: &str) -> Option<BodyID> {
        self.bodies()
            .find(|(_, body)| body.name().eq_ignore_ascii_case(name))
            .map(|(id, _)| id)
    }

    pub fn position(&self, id: BodyID) -> Option<Vector3<f64>> {
        self.body(id).map(RigidBody::position)
    }

    pub fn velocity(&self, id: BodyID) -> Option<Vector3<f64>> {
        self.body(id).map(RigidBody::velocity)
    }

    pub fn mass(&self, id: BodyID) -> Option<f64> {
        self.body(id).map(RigidBody::mass)
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(RigidBody::mass).sum()
    }

    pub fn total_momentum(&self) -> Vector3<f64> {
        self.bodies.iter().map(RigidBody::momentum).sum()
    }

    /// Mass-weighted centroid of all bodies.
    ///
    /// This does not check its input: an empty system gives NaN. Use
    /// [System::try_barycenter] when that matters.
    pub fn barycenter(&self) -> Vector3<f64> {
        let weighted: Vector3<f64> = self
            .bodies
            .iter()
            .map(|body| body.position() * body.mass())
            .sum();
        weighted / self.total_mass()
    }

    pub fn try_barycenter(&self) -> PhysicsResult<Vector3<f64>> {
        if self.is_empty() {
            return Err(PhysicsError::EmptySystem);
        }
        if self.total_mass() == 0.0 {
            return Err(PhysicsError::MasslessSystem);
        }
        Ok(self.barycenter())
    }
}

impl Default for System {
    fn default() -> Self {
        System::new(Gravity::default())
    }
}
