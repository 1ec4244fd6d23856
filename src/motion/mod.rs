//! Motion integration: smoothing, boundary discipline, manual control
//! pass-through, and displacement tracking.

pub mod integrator;

pub use integrator::{DisplacementTracker, MotionIntegrator};
