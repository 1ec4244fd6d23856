//! World model: arena bounds, obstacles, heat-signature targets, and the
//! fog-of-war map.
//!
//! Read-mostly shared data. The scanner marks targets detected, the
//! arbiter locks them, and the engine collects them; everything else only
//! reads.

pub mod arena;
pub mod fog;
pub mod model;
pub mod obstacle;
pub mod target;

pub use arena::ArenaBounds;
pub use fog::FogMap;
pub use model::WorldModel;
pub use obstacle::Obstacle;
pub use target::{DetectionState, HeatCategory, HeatTarget};
