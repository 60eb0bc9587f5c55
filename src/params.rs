//! Shared acquisition parameters and the linked slider/text state.
//!
//! Frame rate, gain, and exposure are each edited through a slider paired
//! with a text box. [`LinkedParam`] owns the single numeric value behind the
//! pair and keeps the two controls numerically equal: syncing one side from
//! the other happens through plain state mutation, so neither control's
//! change handler can re-fire (no feedback loop by construction).

use std::ops::RangeInclusive;

/// Range and presentation of one shared acquisition parameter.
///
/// Limits are for the BFS-U3-32S4M sensor this rig is built around.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub label: &'static str,
    pub units: &'static str,
    pub min: f64,
    pub max: f64,
    /// Exposure spans seven decades, so its slider is logarithmic.
    pub logarithmic: bool,
}

impl ParamSpec {
    pub fn range(&self) -> RangeInclusive<f64> {
        self.min..=self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Acquisition frame rate in frames per second.
pub const FRAME_RATE: ParamSpec = ParamSpec {
    label: "FPS",
    units: "fps",
    min: 1.0,
    max: 118.0,
    logarithmic: false,
};

/// Analog gain in dB.
pub const GAIN: ParamSpec = ParamSpec {
    label: "Gain",
    units: "dB",
    min: 0.0,
    max: 47.0,
    logarithmic: false,
};

/// Exposure time in seconds.
pub const EXPOSURE: ParamSpec = ParamSpec {
    label: "Exposure",
    units: "s",
    min: 5e-6,
    max: 30.0,
    logarithmic: true,
};

/// State behind one slider/text pair.
///
/// The GUI mutates `value` through the slider and `text` through the text
/// box, then calls the matching sync method. After either sync the pair is
/// numerically equal again.
#[derive(Debug, Clone)]
pub struct LinkedParam {
    pub spec: ParamSpec,
    /// Value currently shown by the slider.
    pub value: f64,
    /// Buffer currently shown by the text box.
    pub text: String,
}

impl LinkedParam {
    /// Starts at the range minimum, matching the original panel defaults.
    pub fn new(spec: ParamSpec) -> Self {
        let value = spec.min;
        Self {
            spec,
            value,
            text: format_value(value),
        }
    }

    /// Called after the slider moved: mirror the new value into the text
    /// box. Returns the value to push to the collaborator.
    pub fn sync_from_slider(&mut self) -> f64 {
        self.text = format_value(self.value);
        self.value
    }

    /// Called after the text box was submitted: parse and mirror into the
    /// slider. Unparseable input restores the buffer from the last numeric
    /// value and returns `None` (nothing is pushed to the collaborator).
    pub fn sync_from_text(&mut self) -> Option<f64> {
        match self.text.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => {
                self.value = parsed;
                self.text = format_value(parsed);
                Some(parsed)
            }
            _ => {
                self.text = format_value(self.value);
                None
            }
        }
    }
}

/// Short scientific form for tiny exposures, plain decimal otherwise.
fn format_value(value: f64) -> String {
    if value != 0.0 && value.abs() < 1e-3 {
        format!("{value:.3e}")
    } else {
        format!("{value:.3}")
    }
}
