//! Stereo rig setup panel - desktop entry point.
//!
//! Builds the simulated camera pair, installs logging (terminal plus the
//! in-window log view), and hands control to eframe.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use eframe::egui;

use stereo_rig::camera::mock::{MockRig, DEFAULT_SERIALS};
use stereo_rig::gui::SetupApp;
use stereo_rig::log_capture::{LogBuffer, LogCollector};

#[derive(Parser)]
#[command(name = "stereo-rig")]
#[command(about = "Setup panel for a two-camera stereo rig", long_about = None)]
struct Cli {
    /// Simulated sensor width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Simulated sensor height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Comma-separated serials present on the simulated bus
    #[arg(long, value_delimiter = ',')]
    serials: Option<Vec<String>>,

    /// Log level for the terminal and the in-window log view
    #[arg(long, default_value = "info")]
    log_level: log::Level,
}

/// Sends records to both the terminal (RUST_LOG-aware) and the GUI buffer.
fn install_logging(cli: &Cli) -> Result<LogBuffer> {
    let buffer = LogBuffer::new();
    let terminal = env_logger::Builder::from_default_env()
        .filter_level(cli.log_level.to_level_filter())
        .build();
    let collector = LogCollector::new(buffer.clone());
    multi_log::MultiLogger::init(vec![Box::new(terminal), Box::new(collector)], cli.log_level)
        .context("failed to install logger")?;
    Ok(buffer)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let logs = install_logging(&cli)?;

    let serials = cli
        .serials
        .clone()
        .unwrap_or_else(|| DEFAULT_SERIALS.iter().map(|s| s.to_string()).collect());
    log::info!(
        "simulated bus: {} camera(s) at {}x{}",
        serials.len(),
        cli.width,
        cli.height
    );
    let rig = Arc::new(MockRig::new(serials, cli.width, cli.height));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("Stereo Rig Setup"),
        ..Default::default()
    };

    eframe::run_native(
        "Stereo Rig Setup",
        options,
        Box::new(move |_cc| Ok(Box::new(SetupApp::new(rig, logs)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
