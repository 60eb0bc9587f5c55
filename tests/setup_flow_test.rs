//! End-to-end flow against the simulated rig: find, init, stream, adjust,
//! stop. Exercises the same public API the panel uses, without a window.

use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use stereo_rig::camera::mock::{MockRig, DEFAULT_SERIALS};
use stereo_rig::camera::{CameraControl, CameraSelector, CameraSlot};
use stereo_rig::error::RigError;
use stereo_rig::stream::{frame_channel, AcquisitionController};

fn rig() -> Arc<MockRig> {
    Arc::new(MockRig::new(
        DEFAULT_SERIALS.iter().map(|s| s.to_string()).collect(),
        48,
        32,
    ))
}

fn config_for(serial: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "serial: \"{serial}\"\ninit:\n  - node: AcquisitionFrameRate\n    value: 118.0\n"
    )
    .unwrap();
    file
}

fn ready_slot(rig: &Arc<MockRig>, slot: CameraSlot, index: u32, serial: &str) {
    rig.find(slot, &CameraSelector::Index(index)).unwrap();
    let config = config_for(serial);
    rig.init(slot, config.path()).unwrap();
}

#[test]
fn both_slots_stream_independently() {
    let rig = rig();
    let window_open = Arc::new(AtomicBool::new(true));
    ready_slot(&rig, CameraSlot::Primary, 0, DEFAULT_SERIALS[0]);
    ready_slot(&rig, CameraSlot::Secondary, 1, DEFAULT_SERIALS[1]);

    let camera: Arc<dyn CameraControl> = rig;
    let mut primary = AcquisitionController::new(
        CameraSlot::Primary,
        Arc::clone(&camera),
        Arc::clone(&window_open),
    );
    let mut secondary = AcquisitionController::new(
        CameraSlot::Secondary,
        Arc::clone(&camera),
        Arc::clone(&window_open),
    );

    let (tx_p, rx_p) = frame_channel();
    let (tx_s, rx_s) = frame_channel();
    primary.start(tx_p).unwrap();
    secondary.start(tx_s).unwrap();

    let frame_p = rx_p.recv_timeout(Duration::from_secs(5)).unwrap();
    let frame_s = rx_s.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(frame_p.size(), [48, 32]);
    assert_eq!(frame_s.size(), [48, 32]);

    // Stopping one slot leaves the other streaming.
    primary.stop().unwrap();
    assert!(!primary.is_streaming());
    assert!(secondary.is_streaming());
    assert!(rx_s.recv_timeout(Duration::from_secs(5)).is_ok());

    secondary.stop().unwrap();
}

#[test]
fn window_close_stops_both_streaming_slots() {
    let rig = rig();
    let window_open = Arc::new(AtomicBool::new(true));
    ready_slot(&rig, CameraSlot::Primary, 0, DEFAULT_SERIALS[0]);
    ready_slot(&rig, CameraSlot::Secondary, 1, DEFAULT_SERIALS[1]);

    let camera: Arc<dyn CameraControl> = rig;
    let mut primary = AcquisitionController::new(
        CameraSlot::Primary,
        Arc::clone(&camera),
        Arc::clone(&window_open),
    );
    let mut secondary = AcquisitionController::new(
        CameraSlot::Secondary,
        Arc::clone(&camera),
        Arc::clone(&window_open),
    );

    let (tx_p, rx_p) = frame_channel();
    let (tx_s, rx_s) = frame_channel();
    primary.start(tx_p).unwrap();
    secondary.start(tx_s).unwrap();
    rx_p.recv_timeout(Duration::from_secs(5)).unwrap();
    rx_s.recv_timeout(Duration::from_secs(5)).unwrap();

    // Closing the window flips the shared flag; both loops wind down and
    // both stop calls join their workers before returning.
    window_open.store(false, std::sync::atomic::Ordering::Relaxed);
    primary.stop().unwrap();
    secondary.stop().unwrap();
    assert!(!primary.is_streaming());
    assert!(!secondary.is_streaming());
}

#[test]
fn start_fails_cleanly_on_an_unprepared_slot() {
    let rig = rig();
    let window_open = Arc::new(AtomicBool::new(true));
    let camera: Arc<dyn CameraControl> = rig;
    let mut ctl = AcquisitionController::new(CameraSlot::Primary, camera, window_open);

    let (tx, _rx) = frame_channel();
    assert!(matches!(
        ctl.start(tx),
        Err(RigError::NotConnected("Primary"))
    ));
    // No worker was spawned; stop stays a no-op.
    assert!(!ctl.is_streaming());
    ctl.stop().unwrap();
}

#[test]
fn shared_parameters_apply_while_streaming() {
    let rig = rig();
    let window_open = Arc::new(AtomicBool::new(true));
    ready_slot(&rig, CameraSlot::Primary, 0, DEFAULT_SERIALS[0]);

    let camera: Arc<dyn CameraControl> = Arc::clone(&rig) as Arc<dyn CameraControl>;
    let mut ctl = AcquisitionController::new(
        CameraSlot::Primary,
        Arc::clone(&camera),
        window_open,
    );
    let (tx, rx) = frame_channel();
    ctl.start(tx).unwrap();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    // A mid-stream edit: valid values land, invalid ones are rejected
    // without disturbing the stream.
    camera.set_gain(12.0).unwrap();
    assert!(matches!(
        camera.set_gain(99.0),
        Err(RigError::OutOfRange { .. })
    ));
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());

    ctl.stop().unwrap();
}

#[test]
fn restart_after_stop_works() {
    let rig = rig();
    let window_open = Arc::new(AtomicBool::new(true));
    ready_slot(&rig, CameraSlot::Primary, 0, DEFAULT_SERIALS[0]);

    let camera: Arc<dyn CameraControl> = rig;
    let mut ctl = AcquisitionController::new(
        CameraSlot::Primary,
        Arc::clone(&camera),
        window_open,
    );

    for _ in 0..2 {
        let (tx, rx) = frame_channel();
        ctl.start(tx).unwrap();
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        ctl.stop().unwrap();
    }
}
