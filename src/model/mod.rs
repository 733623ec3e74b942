//! The simulated system as a whole.
//!
//! [System] owns every body and advances them together, one tick at a time.
//! [Trajectory] keeps a short trail of where a body has been, for display.

mod system;
mod trajectory;

pub use system::{Affecting, BodyID, System};
pub use trajectory::{Pivot, Trajectory, LOG_INTERVAL, TRAJECTORY_CAPACITY};
