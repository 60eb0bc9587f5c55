//! Camera collaborator contract.
//!
//! The hard parts of talking to industrial cameras (enumeration, register
//! programming, triggering, buffer handling) live behind the [`CameraControl`]
//! trait. The GUI only knows this contract; the shipped implementation is the
//! simulator in [`mock`].
//!
//! All methods are blocking. The vendor SDKs this models block on frame
//! fetch, so each camera slot gets its own stream thread (see
//! `crate::stream`) instead of an async runtime.

pub mod mock;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::RigResult;

/// One of the two camera roles on the rig.
///
/// Both slots share frame-rate/gain/exposure but have independent identity,
/// configuration, and acquisition state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraSlot {
    Primary,
    Secondary,
}

impl CameraSlot {
    /// Human-readable label, used in widget text and error messages.
    pub fn label(self) -> &'static str {
        match self {
            CameraSlot::Primary => "Primary",
            CameraSlot::Secondary => "Secondary",
        }
    }

    /// Conventional config filename pre-filled in the init text box.
    pub fn default_config(self) -> &'static str {
        match self {
            CameraSlot::Primary => "primary.yaml",
            CameraSlot::Secondary => "secondary.yaml",
        }
    }

    /// Index into per-slot storage.
    pub(crate) fn idx(self) -> usize {
        match self {
            CameraSlot::Primary => 0,
            CameraSlot::Secondary => 1,
        }
    }
}

impl fmt::Display for CameraSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the operator identifies a camera in the find box.
///
/// Short all-digit strings are bus indices; anything else is a serial id.
/// Real serials are long digit strings, so the cutoff keeps "0" and "12"
/// working as indices without swallowing serials like "18085870".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraSelector {
    Index(u32),
    Serial(String),
}

/// Digit strings up to this length parse as bus indices.
const MAX_INDEX_DIGITS: usize = 3;

impl FromStr for CameraSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() <= MAX_INDEX_DIGITS && !s.is_empty() {
            if let Ok(index) = s.parse::<u32>() {
                return Ok(CameraSelector::Index(index));
            }
        }
        Ok(CameraSelector::Serial(s.to_string()))
    }
}

impl fmt::Display for CameraSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraSelector::Index(i) => write!(f, "index {i}"),
            CameraSelector::Serial(s) => write!(f, "serial \"{s}\""),
        }
    }
}

/// One grayscale frame delivered by a camera.
///
/// Pixel data is 8-bit; the renderer assumes a fixed 255 intensity ceiling.
/// Higher bit depths would need scaling before display, which this tool does
/// not attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// Builds a frame, panicking in debug builds if the buffer does not
    /// match the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Pixel dimensions as `[width, height]`.
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Contract consumed by the setup panel.
///
/// Implementations are shared between the UI thread and the two stream
/// threads, hence `Send + Sync` with interior mutability. Shared parameter
/// setters apply to both cameras and must leave no side effects when they
/// reject a value.
pub trait CameraControl: Send + Sync {
    /// Locate a camera on the bus and bind it to `slot`.
    fn find(&self, slot: CameraSlot, selector: &CameraSelector) -> RigResult<()>;

    /// Initialize the bound camera from a saved YAML configuration.
    fn init(&self, slot: CameraSlot, config_path: &Path) -> RigResult<()>;

    /// Begin continuous frame delivery for `slot`.
    fn start_acquisition(&self, slot: CameraSlot) -> RigResult<()>;

    /// Halt frame delivery for `slot`.
    fn end_acquisition(&self, slot: CameraSlot) -> RigResult<()>;

    /// Blocking fetch of the next available frame.
    fn next_frame(&self, slot: CameraSlot) -> RigResult<Frame>;

    /// Set the acquisition frame rate (fps) on both cameras.
    fn set_frame_rate(&self, fps: f64) -> RigResult<()>;

    /// Set the analog gain (dB) on both cameras.
    fn set_gain(&self, gain: f64) -> RigResult<()>;

    /// Set the exposure time (seconds) on both cameras.
    fn set_exposure(&self, seconds: f64) -> RigResult<()>;
}
