pub mod integrator;
pub mod state_vector;
