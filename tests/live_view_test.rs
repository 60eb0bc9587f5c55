//! Renders frames from the simulated rig into a headless egui context,
//! checking the texture-reuse and histogram paths the panel relies on.

use std::io::Write;

use stereo_rig::camera::mock::{MockRig, DEFAULT_SERIALS};
use stereo_rig::camera::{CameraControl, CameraSelector, CameraSlot};
use stereo_rig::render::{
    DisplayUpdate, HistogramUpdate, ImageDisplay, IntensityHistogram, NUM_BINS,
};

fn streaming_rig(width: u32, height: u32) -> MockRig {
    let rig = MockRig::new(
        DEFAULT_SERIALS.iter().map(|s| s.to_string()).collect(),
        width,
        height,
    );
    rig.find(CameraSlot::Primary, &CameraSelector::Index(0))
        .unwrap();
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(
        config,
        "serial: \"{}\"\ninit:\n  - node: AcquisitionFrameRate\n    value: 118.0\n",
        DEFAULT_SERIALS[0]
    )
    .unwrap();
    rig.init(CameraSlot::Primary, config.path()).unwrap();
    rig.start_acquisition(CameraSlot::Primary).unwrap();
    rig
}

#[test]
fn consecutive_frames_reuse_the_texture() {
    let rig = streaming_rig(24, 16);
    let ctx = egui::Context::default();
    let mut display = ImageDisplay::new();

    let first = rig.next_frame(CameraSlot::Primary).unwrap();
    assert_eq!(display.update(&ctx, &first), DisplayUpdate::Recreated);
    for _ in 0..3 {
        let frame = rig.next_frame(CameraSlot::Primary).unwrap();
        assert_eq!(display.update(&ctx, &frame), DisplayUpdate::InPlace);
    }
    assert!(display.texture().is_some());
}

#[test]
fn histogram_tracks_live_frames() {
    let rig = streaming_rig(24, 16);
    let mut hist = IntensityHistogram::new();

    let first = rig.next_frame(CameraSlot::Primary).unwrap();
    assert_eq!(hist.update(&first), HistogramUpdate::Created);
    let second = rig.next_frame(CameraSlot::Primary).unwrap();
    assert_eq!(hist.update(&second), HistogramUpdate::Updated);

    assert_eq!(hist.heights().len(), NUM_BINS);
    let integral: f64 = hist.heights().iter().sum::<f64>() * IntensityHistogram::bin_width();
    assert!((integral - 1.0).abs() < 1e-9);
}
