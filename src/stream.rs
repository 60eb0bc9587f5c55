//! Per-slot acquisition stream.
//!
//! Each streaming camera gets a dedicated thread that blocks on the
//! collaborator's `next_frame` and pushes frames toward the UI through a
//! bounded channel. The UI never blocks on a camera and the stream thread
//! never touches the renderer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::camera::{CameraControl, CameraSlot, Frame};
use crate::error::RigResult;

/// Frames buffered between a stream thread and the UI. When the UI falls
/// behind, new frames are dropped rather than stalling acquisition.
const MAX_QUEUED_FRAMES: usize = 4;

/// Builds the frame channel between one stream worker and the UI.
pub fn frame_channel() -> (SyncSender<Frame>, Receiver<Frame>) {
    std::sync::mpsc::sync_channel(MAX_QUEUED_FRAMES)
}

/// A running stream thread and its stop flag.
struct StreamWorker {
    run: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Owns the streaming lifecycle for one camera slot.
///
/// `start` and `stop` are idempotent; `stop` joins the worker before
/// returning, so the slot is fully quiescent afterwards.
pub struct AcquisitionController {
    slot: CameraSlot,
    camera: Arc<dyn CameraControl>,
    window_open: Arc<AtomicBool>,
    worker: Option<StreamWorker>,
}

impl AcquisitionController {
    pub fn new(
        slot: CameraSlot,
        camera: Arc<dyn CameraControl>,
        window_open: Arc<AtomicBool>,
    ) -> Self {
        Self {
            slot,
            camera,
            window_open,
            worker: None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.worker.is_some()
    }

    /// Begins acquisition and spawns the stream thread. No-op when the slot
    /// is already streaming. The thread is spawned only after the
    /// collaborator accepts `start_acquisition`.
    pub fn start(&mut self, tx: SyncSender<Frame>) -> RigResult<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.camera.start_acquisition(self.slot)?;

        let run = Arc::new(AtomicBool::new(true));
        let thread_run = Arc::clone(&run);
        let window_open = Arc::clone(&self.window_open);
        let camera = Arc::clone(&self.camera);
        let slot = self.slot;
        let handle = std::thread::Builder::new()
            .name(format!("stream-{}", slot.label().to_lowercase()))
            .spawn(move || stream_loop(slot, &camera, &thread_run, &window_open, &tx))?;

        self.worker = Some(StreamWorker { run, handle });
        Ok(())
    }

    /// Ends acquisition and joins the stream thread. No-op when the slot is
    /// not streaming.
    pub fn stop(&mut self) -> RigResult<()> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        worker.run.store(false, Ordering::Relaxed);
        let result = self.camera.end_acquisition(self.slot);
        if worker.handle.join().is_err() {
            log::error!("{} stream thread panicked", self.slot);
        }
        result
    }
}

fn stream_loop(
    slot: CameraSlot,
    camera: &Arc<dyn CameraControl>,
    run: &AtomicBool,
    window_open: &AtomicBool,
    tx: &SyncSender<Frame>,
) {
    log::debug!("{slot} stream thread running");
    while run.load(Ordering::Relaxed) && window_open.load(Ordering::Relaxed) {
        let frame = match camera.next_frame(slot) {
            Ok(frame) => frame,
            Err(err) => {
                // `stop` ends acquisition before joining, so a fetch error
                // during shutdown is expected and not worth reporting.
                if run.load(Ordering::Relaxed) && window_open.load(Ordering::Relaxed) {
                    log::error!("{slot} stream stopped: {err}");
                }
                break;
            }
        };
        match tx.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                log::warn!("{slot} frame dropped, display is behind");
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }
    log::debug!("{slot} stream thread finished");
}
