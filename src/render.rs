//! Live image and histogram rendering.
//!
//! Both views are written to once per drained frame on the UI thread. Each
//! keeps enough state to update in place when the incoming frame looks like
//! the last one, and rebuilds only when it cannot.

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use egui_plot::{Bar, BarChart};

use crate::camera::Frame;

/// Which path [`ImageDisplay::update`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayUpdate {
    /// Existing texture rewritten, same dimensions.
    InPlace,
    /// New texture allocated, dimensions changed or first frame.
    Recreated,
}

/// GPU texture holding the most recent frame of one camera.
#[derive(Default)]
pub struct ImageDisplay {
    texture: Option<TextureHandle>,
    size: [usize; 2],
}

impl ImageDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    /// Uploads `frame`, reusing the existing texture when dimensions match.
    pub fn update(&mut self, ctx: &Context, frame: &Frame) -> DisplayUpdate {
        let size = frame.size();
        let image = ColorImage::from_gray(size, &frame.data);
        match &mut self.texture {
            Some(texture) if self.size == size => {
                texture.set(image, TextureOptions::NEAREST);
                DisplayUpdate::InPlace
            }
            _ => {
                self.texture = Some(ctx.load_texture("camera-frame", image, TextureOptions::NEAREST));
                self.size = size;
                DisplayUpdate::Recreated
            }
        }
    }
}

/// Which path [`IntensityHistogram::update`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramUpdate {
    /// First frame, heights allocated.
    Created,
    /// Heights overwritten in place.
    Updated,
}

pub const NUM_BINS: usize = 100;
/// Pixels are 8-bit; the axis always spans the full intensity range.
pub const MAX_INTENSITY: f64 = 255.0;

/// Density-normalized intensity histogram of the most recent frame.
#[derive(Default)]
pub struct IntensityHistogram {
    heights: Vec<f64>,
}

impl IntensityHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bin_width() -> f64 {
        (MAX_INTENSITY + 1.0) / NUM_BINS as f64
    }

    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Recomputes bar heights from `frame`. Normalized so the heights times
    /// the bin width integrate to 1, matching a probability density.
    pub fn update(&mut self, frame: &Frame) -> HistogramUpdate {
        let first = self.heights.is_empty();
        if first {
            self.heights = vec![0.0; NUM_BINS];
        } else {
            self.heights.fill(0.0);
        }

        let width = Self::bin_width();
        for &px in &frame.data {
            let bin = ((f64::from(px) / width) as usize).min(NUM_BINS - 1);
            self.heights[bin] += 1.0;
        }
        if !frame.data.is_empty() {
            let norm = frame.data.len() as f64 * width;
            for h in &mut self.heights {
                *h /= norm;
            }
        }

        if first {
            HistogramUpdate::Created
        } else {
            HistogramUpdate::Updated
        }
    }

    /// Bars for an `egui_plot::Plot`, centered on their bins.
    pub fn chart(&self) -> BarChart {
        let width = Self::bin_width();
        let bars = self
            .heights
            .iter()
            .enumerate()
            .map(|(i, &h)| Bar::new((i as f64 + 0.5) * width, h).width(width))
            .collect();
        BarChart::new(bars)
    }
}
