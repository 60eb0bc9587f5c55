//! Custom error types for the application.
//!
//! This module defines the primary error type, `RigError`, used across the
//! crate. The camera-control collaborator, the configuration loader, and the
//! GUI layer all report failures through it, which keeps the two surfacing
//! tiers (modal dialog for button actions, non-blocking notice for parameter
//! edits) uniform.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type RigResult<T> = std::result::Result<T, RigError>;

/// Errors produced by the camera collaborator and configuration layer.
#[derive(Error, Debug)]
pub enum RigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Camera \"{0}\" not connected")]
    CameraNotFound(String),

    #[error("No camera index {0} on the bus ({1} connected)")]
    IndexOutOfRange(u32, usize),

    #[error("{0} camera has not been found yet")]
    NotConnected(&'static str),

    #[error("{0} camera is not initialized")]
    NotInitialized(&'static str),

    #[error("{0} camera is not acquiring")]
    NotAcquiring(&'static str),

    #[error("{0} camera is already acquiring")]
    AlreadyAcquiring(&'static str),

    #[error("Config is for serial \"{expected}\" but bound camera is \"{bound}\"")]
    ConfigMismatch { expected: String, bound: String },

    #[error("{name} {value} out of range [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Camera error: {0}")]
    Camera(String),
}
