//! Engine layer: the simulation orchestrator and UI-facing telemetry.

pub mod simulation;
pub mod telemetry;

pub use simulation::Simulation;
pub use telemetry::MissionTelemetry;
