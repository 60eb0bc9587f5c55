//! One camera column: live views plus the find/init/start/stop rows.

use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use egui::{Button, TextEdit, Ui};
use egui_plot::Plot;

use crate::camera::{CameraControl, CameraSelector, CameraSlot, Frame};
use crate::gui::ErrorSink;
use crate::render::{ImageDisplay, IntensityHistogram};
use crate::stream::{frame_channel, AcquisitionController};

/// UI state and stream plumbing for one camera slot.
pub struct CameraPanel {
    slot: CameraSlot,
    camera: Arc<dyn CameraControl>,
    controller: AcquisitionController,
    frames: Option<Receiver<Frame>>,
    find_text: String,
    init_text: String,
    image: ImageDisplay,
    histogram: IntensityHistogram,
}

impl CameraPanel {
    pub fn new(
        slot: CameraSlot,
        camera: Arc<dyn CameraControl>,
        window_open: Arc<AtomicBool>,
    ) -> Self {
        Self {
            slot,
            camera: Arc::clone(&camera),
            controller: AcquisitionController::new(slot, camera, window_open),
            frames: None,
            find_text: String::new(),
            init_text: slot.default_config().to_string(),
            image: ImageDisplay::new(),
            histogram: IntensityHistogram::new(),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.controller.is_streaming()
    }

    /// Flips the run flag off and joins this slot's stream thread.
    pub fn shutdown(&mut self) {
        if let Err(err) = self.controller.stop() {
            log::error!("{} shutdown: {err}", self.slot);
        }
        self.frames = None;
    }

    /// Pulls everything the stream thread produced since the last repaint
    /// and renders the newest frame.
    pub fn drain_frames(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.frames else {
            return;
        };
        if let Some(frame) = rx.try_iter().last() {
            self.image.update(ctx, &frame);
            self.histogram.update(&frame);
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, errors: &mut ErrorSink) {
        ui.vertical(|ui| {
            ui.heading(self.slot.label());

            // Live views take most of the column; the control rows below
            // keep a fixed footprint.
            let view_height = (ui.available_height() - 110.0).max(120.0);
            self.image_ui(ui, view_height * 0.75);
            self.histogram_ui(ui, view_height * 0.25);

            ui.separator();
            self.find_row(ui, errors);
            self.init_row(ui, errors);
            self.acquisition_row(ui, errors);
        });
    }

    fn image_ui(&mut self, ui: &mut Ui, height: f32) {
        match self.image.texture() {
            Some(texture) => {
                ui.add(
                    egui::Image::from_texture(texture)
                        .maintain_aspect_ratio(true)
                        .fit_to_exact_size(egui::vec2(ui.available_width(), height)),
                );
            }
            None => {
                ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.weak("no image");
                    });
                });
            }
        }
    }

    fn histogram_ui(&mut self, ui: &mut Ui, height: f32) {
        Plot::new(("histogram", self.slot.label()))
            .height(height)
            .show_axes([false, false])
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show_x(false)
            .show_y(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(self.histogram.chart());
            });
    }

    fn find_row(&mut self, ui: &mut Ui, errors: &mut ErrorSink) {
        ui.horizontal(|ui| {
            if ui.button("Find").clicked() {
                let selector: CameraSelector = match self.find_text.parse() {
                    Ok(selector) => selector,
                    Err(infallible) => match infallible {},
                };
                errors.dialog(self.camera.find(self.slot, &selector));
            }
            ui.add(
                TextEdit::singleline(&mut self.find_text)
                    .hint_text("index or serial")
                    .desired_width(f32::INFINITY),
            );
        });
    }

    fn init_row(&mut self, ui: &mut Ui, errors: &mut ErrorSink) {
        ui.horizontal(|ui| {
            if ui.button("Init").clicked() {
                let path = std::path::PathBuf::from(self.init_text.trim());
                errors.dialog(self.camera.init(self.slot, &path));
            }
            ui.add(
                TextEdit::singleline(&mut self.init_text).desired_width(f32::INFINITY),
            );
        });
    }

    fn acquisition_row(&mut self, ui: &mut Ui, errors: &mut ErrorSink) {
        ui.horizontal(|ui| {
            let streaming = self.controller.is_streaming();
            if ui.add_enabled(!streaming, Button::new("Start")).clicked() {
                let (tx, rx) = frame_channel();
                if errors.dialog(self.controller.start(tx)).is_some() {
                    self.frames = Some(rx);
                }
            }
            if ui.add_enabled(streaming, Button::new("Stop")).clicked() {
                errors.dialog(self.controller.stop());
                self.frames = None;
            }
        });
    }
}
