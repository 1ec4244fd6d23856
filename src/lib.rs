//! VarunaNav - Autonomous navigation core for a simulated search-and-rescue
//! submersible.
//!
//! An in-process library consumed by a real-time visualization host. The
//! host owns rendering, asset loading, camera work, HUD, and input wiring;
//! this crate owns the per-frame decision engine: sensor simulation,
//! mission planning, behavior arbitration, and motion integration.
//!
//! # Architecture
//!
//! The crate is organized into 6 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Orchestration
//! │            (simulation, telemetry)                  │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              behavior/   motion/                    │  ← Decision + motion
//! │    (arbiter, smart direction, integrator)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              sensors/    mission/                   │  ← Perception + plans
//! │        (ray fan scanner, waypoint patterns)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     world/                          │  ← Shared model
//! │       (arena, obstacles, targets, fog map)          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 core/  state/                       │  ← Foundation
//! │         (math, types, vehicle state)                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Execution model
//!
//! Single-threaded, cooperative, frame-driven. The host calls
//! [`Simulation::tick`] once per rendering frame with the elapsed
//! milliseconds; every component runs synchronously inside it. All timing
//! (scan rate limits, debounce windows, stuck timeouts) derives from that
//! injected clock, so tests drive time deterministically.
//!
//! # Example
//!
//! ```
//! use varuna_nav::{HeatCategory, SearchPattern, SimConfig, Simulation};
//!
//! let mut config = SimConfig::default();
//! config.seed = 42;
//! let mut sim = Simulation::new(config).unwrap();
//!
//! sim.add_obstacle(5.0, 5.0, 2.0).unwrap();
//! sim.place_target(-10.0, 8.0, HeatCategory::Survivor).unwrap();
//! sim.set_pattern(SearchPattern::SpiralSearch);
//!
//! for _ in 0..600 {
//!     sim.tick(16);
//! }
//! let telemetry = sim.telemetry();
//! assert!(telemetry.searched_percent > 0.0);
//! ```

// ============================================================================
// Layer 1: Foundation (no internal deps)
// ============================================================================
pub mod core;
pub mod error;
pub mod state;

// ============================================================================
// Layer 2: Configuration
// ============================================================================
pub mod config;

// ============================================================================
// Layer 3: Shared world model (depends on core)
// ============================================================================
pub mod world;

// ============================================================================
// Layer 4: Perception and planning (depends on world)
// ============================================================================
pub mod mission;
pub mod sensors;

// ============================================================================
// Layer 5: Decision and motion (depends on sensors, mission)
// ============================================================================
pub mod behavior;
pub mod motion;

// ============================================================================
// Layer 6: Orchestration (depends on all layers)
// ============================================================================
pub mod engine;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use core::math;
pub use core::types::{Point2D, Pose};

// Error handling
pub use error::{NavError, Result};

// Configuration
pub use config::{
    ArenaConfig, BehaviorConfig, DirectionWeights, MissionConfig, MotionConfig, ScannerConfig,
    SimConfig,
};

// Vehicle state
pub use state::{ControlIntent, VehicleMode, VehicleState};

// World model
pub use world::{
    ArenaBounds, DetectionState, FogMap, HeatCategory, HeatTarget, Obstacle, WorldModel,
};

// Sensors
pub use sensors::{RayClass, RaySample, ScanResult, SensorScanner};

// Mission planning
pub use mission::{MissionPlanner, PatternProgress, SearchPattern, Waypoint, WaypointTag};

// Behavior
pub use behavior::{
    BehaviorArbiter, BehaviorDecision, BehaviorState, DirectionContext, ScoredDirection,
    SectorMemory, choose_heading, score_directions,
};

// Motion
pub use motion::{DisplacementTracker, MotionIntegrator};

// Engine
pub use engine::{MissionTelemetry, Simulation};
