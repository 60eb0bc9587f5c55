//! Interactive setup panel for a two-camera stereo-vision rig.
//!
//! The operator binds a primary and a secondary camera (by bus index or
//! serial), initializes each from a saved YAML configuration, starts and
//! stops live acquisition, and tunes the shared frame-rate, gain, and
//! exposure while watching a live image and intensity histogram per camera.
//!
//! Module map:
//! - [`camera`]: the `CameraControl` collaborator contract and the
//!   simulated rig
//! - [`config`]: saved per-camera YAML configuration
//! - [`params`]: shared parameter ranges and linked slider/text state
//! - [`stream`]: per-slot acquisition threads and frame channels
//! - [`render`]: texture and histogram updates
//! - [`gui`]: the eframe application
//! - [`log_capture`]: in-window log view plumbing
//! - [`error`]: crate-wide error type

pub mod camera;
pub mod config;
pub mod error;
pub mod gui;
pub mod log_capture;
pub mod params;
pub mod render;
pub mod stream;
