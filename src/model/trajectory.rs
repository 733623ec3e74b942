use std::collections::VecDeque;

use nalgebra::Vector3;

use super::system::{BodyID, System};

/// Number of points kept per trajectory.
pub const TRAJECTORY_CAPACITY: usize = 150;

/// A new point is appended once more than this many ticks have passed.
pub const LOG_INTERVAL: usize = 10;

/// The point trajectories are measured relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pivot {
    Barycenter,
    Body(BodyID),
}

impl Pivot {
    /// Current position of the pivot, if it still exists.
    pub fn position(&self, system: &System) -> Option<Vector3<f64>> {
        match self {
            Pivot::Barycenter => system.try_barycenter().ok(),
            Pivot::Body(id) => system.position(*id),
        }
    }
}

impl Default for Pivot {
    fn default() -> Self {
        Pivot::Barycenter
    }
}

/// Bounded history of one body's position relative to a pivot.
///
/// Between appends, the newest point tracks the body, so the tail of the
/// trail always ends where the body currently is.
#[derive(Debug, Clone)]
pub struct Trajectory {
    points: VecDeque<Vector3<f64>>,
    pivot: Pivot,
    ticks_since_log: usize,
    capacity: usize,
    log_interval: usize,
}

impl Trajectory {
    pub fn new(pivot: Pivot) -> Self {
        Self::with_limits(pivot, TRAJECTORY_CAPACITY, LOG_INTERVAL)
    }

    pub fn with_limits(pivot: Pivot, capacity: usize, log_interval: usize) -> Self {
        Trajectory {
            points: VecDeque::with_capacity(capacity + 1),
            pivot,
            ticks_since_log: 0,
            capacity,
            log_interval,
        }
    }

    pub fn pivot(&self) -> Pivot {
        self.pivot
    }

    /// Changes the pivot. The old points are meaningless in the new frame, so
    /// they are dropped.
    pub fn set_pivot(&mut self, pivot: Pivot) {
        if pivot != self.pivot {
            self.pivot = pivot;
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.ticks_since_log = 0;
    }

    /// Records the body's position relative to the pivot after one tick.
    pub fn record(&mut self, relative_position: Vector3<f64>) {
        if self.ticks_since_log > self.log_interval {
            self.ticks_since_log = 0;
            self.points.push_back(relative_position);
        } else {
            self.ticks_since_log += 1;
            if let Some(last) = self.points.back_mut() {
                *last = relative_position;
            }
        }

        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Looks up the body and pivot in `system` and records the body's
    /// relative position. Returns false, recording nothing, if either is gone.
    pub fn record_from(&mut self, system: &System, body: BodyID) -> bool {
        let position = system.position(body);
        let pivot = self.pivot.position(system);
        match (position, pivot) {
            (Some(position), Some(pivot)) => {
                self.record(position - pivot);
                true
            }
            _ => false,
        }
    }

    /// Points from oldest to newest.
    pub fn points(&self) -> impl ExactSizeIterator<Item = &Vector3<f64>> + '_ {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::astro::{BodyParams, SolidSphere};

    fn point(x: f64) -> Vector3<f64> {
        Vector3::new(x, 0.0, 0.0)
    }

    #[test]
    fn test_append_cadence() {
        let mut trajectory = Trajectory::new(Pivot::Barycenter);

        // The counter has to exceed the interval before anything is appended
        for k in 0..=LOG_INTERVAL {
            trajectory.record(point(k as f64));
            assert!(trajectory.is_empty());
        }
        trajectory.record(point(100.0));
        assert_eq!(trajectory.len(), 1);

        // Live tip: the newest point follows the body until the next append
        for k in 0..=LOG_INTERVAL {
            trajectory.record(point(200.0 + k as f64));
            assert_eq!(trajectory.len(), 1);
            assert_eq!(trajectory.points().last(), Some(&point(200.0 + k as f64)));
        }
        trajectory.record(point(300.0));
        assert_eq!(trajectory.len(), 2);
        let points: Vec<_> = trajectory.points().copied().collect();
        assert_eq!(points, vec![point(210.0), point(300.0)]);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut trajectory = Trajectory::with_limits(Pivot::Barycenter, 3, 0);
        // With a zero interval, every other record appends and the one in
        // between overwrites the tip
        for k in 0..20 {
            trajectory.record(point(k as f64));
            assert!(trajectory.len() <= 3);
        }
        assert_eq!(trajectory.len(), 3);
        let points: Vec<_> = trajectory.points().map(|p| p.x).collect();
        assert_eq!(points, vec![16.0, 18.0, 19.0]);
    }

    #[test]
    fn test_changing_pivot_clears() {
        let mut trajectory = Trajectory::with_limits(Pivot::Barycenter, 10, 0);
        for k in 0..6 {
            trajectory.record(point(k as f64));
        }
        assert!(!trajectory.is_empty());

        trajectory.set_pivot(Pivot::Barycenter);
        assert!(!trajectory.is_empty());

        trajectory.set_pivot(Pivot::Body(BodyID(3)));
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.pivot(), Pivot::Body(BodyID(3)));
    }

    #[test]
    fn test_record_from_system() {
        let mut system = System::default();
        let mut add = |x: f64| {
            let params = BodyParams {
                name: "body".to_owned(),
                mass: 1.0,
                radius: 0.1,
                position: point(x),
                velocity: Vector3::zeros(),
            };
            system.create_body(&params, Arc::new(SolidSphere)).unwrap()
        };
        let a = add(2.0);
        let b = add(-2.0);

        let mut trajectory = Trajectory::with_limits(Pivot::Body(b), 10, 0);
        assert!(trajectory.record_from(&system, a));
        assert!(trajectory.record_from(&system, a));
        assert_eq!(trajectory.points().last(), Some(&point(4.0)));

        trajectory.set_pivot(Pivot::Barycenter);
        trajectory.record_from(&system, a);
        trajectory.record_from(&system, a);
        assert_eq!(trajectory.points().last(), Some(&point(2.0)));

        system.remove_body(a).unwrap();
        assert!(!trajectory.record_from(&system, a));
    }
}
