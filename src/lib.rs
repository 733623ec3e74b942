pub mod astro;
pub mod config;
pub mod error;
pub mod gui;
pub mod math;
pub mod model;
