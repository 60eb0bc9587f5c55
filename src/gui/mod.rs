//! The setup panel application.
//!
//! `SetupApp` owns every piece of UI state: the two camera panels, the
//! three shared parameter rows, the error surfaces, and the log view. The
//! UI thread is the only writer to any of it; stream threads communicate
//! exclusively through the frame channels.

pub mod panel;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use egui::{ScrollArea, Slider, TextEdit};

use crate::camera::{CameraControl, CameraSlot};
use crate::error::RigResult;
use crate::gui::panel::CameraPanel;
use crate::log_capture::LogBuffer;
use crate::params::{self, LinkedParam};

/// How long a parameter rejection stays in the status line.
const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

/// Collects failures from UI actions and decides how loudly to surface
/// them.
///
/// Button actions go through [`dialog`](ErrorSink::dialog): the failure
/// blocks further interaction until dismissed. Parameter edits go through
/// [`notice`](ErrorSink::notice): the failure is logged and shown in a
/// transient status line without interrupting the operator.
#[derive(Default)]
pub struct ErrorSink {
    dialog: Option<String>,
    notice: Option<(String, Instant)>,
}

impl ErrorSink {
    /// Routes a button-action result to the modal dialog.
    pub fn dialog<T>(&mut self, result: RigResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::error!("{err}");
                self.dialog = Some(err.to_string());
                None
            }
        }
    }

    /// Routes a parameter-edit result to the status line.
    pub fn notice<T>(&mut self, result: RigResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("{err}");
                self.notice = Some((err.to_string(), Instant::now()));
                None
            }
        }
    }

    /// True while an undismissed dialog is up; the rest of the UI is
    /// disabled for the duration.
    pub fn is_blocking(&self) -> bool {
        self.dialog.is_some()
    }

    fn show(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.dialog.clone() {
            let mut dismissed = false;
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&message);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if dismissed {
                self.dialog = None;
            }
        }
        if let Some((_, shown_at)) = self.notice {
            if shown_at.elapsed() > NOTICE_LIFETIME {
                self.notice = None;
            }
        }
    }

    fn status_line(&self, ui: &mut egui::Ui) {
        if let Some((message, _)) = &self.notice {
            ui.colored_label(egui::Color32::from_rgb(255, 255, 100), message);
        }
    }
}

/// One shared parameter row: its slider/text pair plus the collaborator
/// setter it drives.
struct ParamRow {
    param: LinkedParam,
    apply: fn(&dyn CameraControl, f64) -> RigResult<()>,
}

pub struct SetupApp {
    camera: Arc<dyn CameraControl>,
    window_open: Arc<AtomicBool>,
    panels: [CameraPanel; 2],
    param_rows: [ParamRow; 3],
    errors: ErrorSink,
    logs: LogBuffer,
}

impl SetupApp {
    pub fn new(camera: Arc<dyn CameraControl>, logs: LogBuffer) -> Self {
        let window_open = Arc::new(AtomicBool::new(true));
        let panels = [
            CameraPanel::new(
                CameraSlot::Primary,
                Arc::clone(&camera),
                Arc::clone(&window_open),
            ),
            CameraPanel::new(
                CameraSlot::Secondary,
                Arc::clone(&camera),
                Arc::clone(&window_open),
            ),
        ];
        let param_rows = [
            ParamRow {
                param: LinkedParam::new(params::FRAME_RATE),
                apply: |camera, v| camera.set_frame_rate(v),
            },
            ParamRow {
                param: LinkedParam::new(params::GAIN),
                apply: |camera, v| camera.set_gain(v),
            },
            ParamRow {
                param: LinkedParam::new(params::EXPOSURE),
                apply: |camera, v| camera.set_exposure(v),
            },
        ];
        Self {
            camera,
            window_open,
            panels,
            param_rows,
            errors: ErrorSink::default(),
            logs,
        }
    }

    fn param_rows_ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("shared-params")
            .num_columns(3)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for row in &mut self.param_rows {
                    let spec = row.param.spec;
                    ui.label(format!("{} ({})", spec.label, spec.units));

                    let slider = ui.add(
                        Slider::new(&mut row.param.value, spec.range())
                            .logarithmic(spec.logarithmic)
                            .show_value(false),
                    );
                    // Push once per adjustment: on release for drags, and
                    // immediately for clicks or keyboard changes.
                    if slider.drag_stopped() || (slider.changed() && !slider.dragged()) {
                        let value = row.param.sync_from_slider();
                        self.errors.notice((row.apply)(self.camera.as_ref(), value));
                    }

                    let text = ui.add(
                        TextEdit::singleline(&mut row.param.text).desired_width(90.0),
                    );
                    let submitted =
                        text.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if submitted {
                        if let Some(value) = row.param.sync_from_text() {
                            self.errors.notice((row.apply)(self.camera.as_ref(), value));
                        }
                    }
                    ui.end_row();
                }
            });
    }

    fn log_panel_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Log");
            if ui.small_button("Clear").clicked() {
                self.logs.clear();
            }
        });
        ScrollArea::vertical()
            .max_height(110.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in self.logs.read().iter() {
                    ui.colored_label(
                        entry.color(),
                        format!(
                            "{} [{}] {}",
                            entry.timestamp.format("%H:%M:%S%.3f"),
                            entry.level,
                            entry.message
                        ),
                    );
                }
            });
    }
}

impl eframe::App for SetupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for panel in &mut self.panels {
            panel.drain_frames(ctx);
        }

        egui::TopBottomPanel::bottom("log-panel")
            .resizable(false)
            .show(ctx, |ui| {
                if self.errors.is_blocking() {
                    ui.disable();
                }
                self.errors.status_line(ui);
                self.log_panel_ui(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            // The dialog tier is modal: everything behind it is inert
            // until the operator dismisses it.
            if self.errors.is_blocking() {
                ui.disable();
            }
            let params_height = 100.0;
            let panel_height = (ui.available_height() - params_height).max(200.0);
            ui.allocate_ui(egui::vec2(ui.available_width(), panel_height), |ui| {
                ui.columns(2, |columns| {
                    let (left, right) = self.panels.split_at_mut(1);
                    left[0].ui(&mut columns[0], &mut self.errors);
                    right[0].ui(&mut columns[1], &mut self.errors);
                });
            });
            ui.separator();
            self.param_rows_ui(ui);
        });

        self.errors.show(ctx);

        if self.panels.iter().any(CameraPanel::is_streaming) {
            ctx.request_repaint_after(Duration::from_millis(33));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.window_open.store(false, Ordering::Relaxed);
        for panel in &mut self.panels {
            panel.shutdown();
        }
        log::info!("setup panel closed");
    }
}
