//! Error types for VarunaNav.
//!
//! Runtime anomalies (blocked sensors, stuck vehicle, unreachable targets)
//! are modeled as behavior-state transitions, not errors. Only construction
//! misuse surfaces here.

use thiserror::Error;

/// VarunaNav error type.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid placement at ({x:.2}, {z:.2}): {reason}")]
    InvalidPlacement { x: f32, z: f32, reason: String },
}

pub type Result<T> = std::result::Result<T, NavError>;
