//! Simulated two-camera rig.
//!
//! Stands in for the vendor SDK so the panel can be exercised without
//! hardware. The simulator enforces the same lifecycle as the real
//! collaborator (found, then initialized, then acquiring) and produces a
//! drifting gradient test pattern paced at the configured frame rate.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rand::Rng;

use crate::camera::{CameraControl, CameraSelector, CameraSlot, Frame};
use crate::config::CameraConfig;
use crate::error::{RigError, RigResult};
use crate::params;

/// Serials reported as connected when none are given on the command line.
pub const DEFAULT_SERIALS: [&str; 2] = ["18085870", "18085871"];

/// Lifecycle of one slot. Stages are strictly ordered; every operation
/// validates the stage it needs before doing anything.
#[derive(Debug, Default)]
struct SlotState {
    serial: Option<String>,
    initialized: bool,
    acquiring: bool,
    frames_delivered: u64,
}

/// Parameters shared by both cameras.
#[derive(Debug)]
struct SharedParams {
    frame_rate: f64,
    gain: f64,
    exposure: f64,
}

impl Default for SharedParams {
    fn default() -> Self {
        Self {
            frame_rate: params::FRAME_RATE.min,
            gain: params::GAIN.min,
            exposure: params::EXPOSURE.min,
        }
    }
}

/// Simulated camera pair behind the [`CameraControl`] contract.
pub struct MockRig {
    /// Serials visible on the simulated bus, in enumeration order.
    connected: Vec<String>,
    width: u32,
    height: u32,
    slots: Mutex<[SlotState; 2]>,
    params: Mutex<SharedParams>,
}

impl MockRig {
    pub fn new(connected: Vec<String>, width: u32, height: u32) -> Self {
        Self {
            connected,
            width,
            height,
            slots: Mutex::new([SlotState::default(), SlotState::default()]),
            params: Mutex::new(SharedParams::default()),
        }
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, [SlotState; 2]> {
        // A poisoned lock means another thread panicked mid-update;
        // the state itself is plain data, so keep going with it.
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_params(&self) -> std::sync::MutexGuard<'_, SharedParams> {
        self.params.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn bound_serial(&self, slot: CameraSlot) -> RigResult<String> {
        let slots = self.lock_slots();
        slots[slot.idx()]
            .serial
            .clone()
            .ok_or(RigError::NotConnected(slot.label()))
    }

    fn apply_node(&self, node: &str, value: f64) -> RigResult<()> {
        match node {
            "AcquisitionFrameRate" => self.set_frame_rate(value),
            "Gain" => self.set_gain(value),
            "ExposureTime" => self.set_exposure(value),
            _ => {
                log::warn!("skipping unknown config node \"{node}\"");
                Ok(())
            }
        }
    }

    fn set_param(
        &self,
        spec: &params::ParamSpec,
        value: f64,
        field: fn(&mut SharedParams) -> &mut f64,
    ) -> RigResult<()> {
        if !spec.contains(value) {
            return Err(RigError::OutOfRange {
                name: spec.label,
                value,
                min: spec.min,
                max: spec.max,
            });
        }
        *field(&mut self.lock_params()) = value;
        Ok(())
    }

    /// Drifting diagonal gradient with per-pixel noise, brightened by gain.
    fn synthesize(&self, phase: u64, gain: f64) -> Frame {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut data = Vec::with_capacity(w * h);
        let mut rng = rand::thread_rng();
        let brightness = 1.0 + gain / params::GAIN.max;
        for y in 0..h {
            for x in 0..w {
                let base = ((x + y + phase as usize * 3) % 256) as f64;
                let noise: f64 = rng.gen_range(-8.0..8.0);
                let px = (base * brightness + noise).clamp(0.0, 255.0);
                data.push(px as u8);
            }
        }
        Frame::new(self.width, self.height, data)
    }
}

impl CameraControl for MockRig {
    fn find(&self, slot: CameraSlot, selector: &CameraSelector) -> RigResult<()> {
        let serial = match selector {
            CameraSelector::Index(i) => self
                .connected
                .get(*i as usize)
                .cloned()
                .ok_or(RigError::IndexOutOfRange(*i, self.connected.len()))?,
            CameraSelector::Serial(s) => self
                .connected
                .iter()
                .find(|c| *c == s)
                .cloned()
                .ok_or_else(|| RigError::CameraNotFound(s.clone()))?,
        };
        let mut slots = self.lock_slots();
        let state = &mut slots[slot.idx()];
        // Re-finding resets the lifecycle for the slot.
        *state = SlotState {
            serial: Some(serial.clone()),
            ..SlotState::default()
        };
        log::info!("{slot} camera bound to serial {serial}");
        Ok(())
    }

    fn init(&self, slot: CameraSlot, config_path: &Path) -> RigResult<()> {
        let bound = self.bound_serial(slot)?;
        let config = CameraConfig::load(config_path)?;
        if config.serial != bound {
            return Err(RigError::ConfigMismatch {
                expected: config.serial,
                bound,
            });
        }
        for cmd in &config.init {
            self.apply_node(&cmd.node, cmd.value)?;
        }
        let mut slots = self.lock_slots();
        slots[slot.idx()].initialized = true;
        log::info!(
            "{slot} camera initialized from {} ({} node writes)",
            config_path.display(),
            config.init.len()
        );
        Ok(())
    }

    fn start_acquisition(&self, slot: CameraSlot) -> RigResult<()> {
        let mut slots = self.lock_slots();
        let state = &mut slots[slot.idx()];
        if state.serial.is_none() {
            return Err(RigError::NotConnected(slot.label()));
        }
        if !state.initialized {
            return Err(RigError::NotInitialized(slot.label()));
        }
        if state.acquiring {
            return Err(RigError::AlreadyAcquiring(slot.label()));
        }
        state.acquiring = true;
        log::info!("{slot} camera acquisition started");
        Ok(())
    }

    fn end_acquisition(&self, slot: CameraSlot) -> RigResult<()> {
        let mut slots = self.lock_slots();
        let state = &mut slots[slot.idx()];
        if !state.acquiring {
            return Err(RigError::NotAcquiring(slot.label()));
        }
        state.acquiring = false;
        log::info!("{slot} camera acquisition stopped");
        Ok(())
    }

    fn next_frame(&self, slot: CameraSlot) -> RigResult<Frame> {
        let (phase, frame_rate, gain) = {
            let mut slots = self.lock_slots();
            let state = &mut slots[slot.idx()];
            if !state.acquiring {
                return Err(RigError::NotAcquiring(slot.label()));
            }
            state.frames_delivered += 1;
            let p = self.lock_params();
            (state.frames_delivered, p.frame_rate, p.gain)
        };
        // Pace delivery like a real camera blocking on the next exposure.
        std::thread::sleep(Duration::from_secs_f64(1.0 / frame_rate));
        Ok(self.synthesize(phase, gain))
    }

    fn set_frame_rate(&self, fps: f64) -> RigResult<()> {
        self.set_param(&params::FRAME_RATE, fps, |p| &mut p.frame_rate)
    }

    fn set_gain(&self, gain: f64) -> RigResult<()> {
        self.set_param(&params::GAIN, gain, |p| &mut p.gain)
    }

    fn set_exposure(&self, seconds: f64) -> RigResult<()> {
        self.set_param(&params::EXPOSURE, seconds, |p| &mut p.exposure)
    }
}
