//! rPPG waveform window
//!
//! Display-time windowing over the engine's sample history. The engine keeps
//! the history; this only picks the trailing `WAVEFORM_WINDOW` samples and
//! maps each one to a bar height of `sample * 100` percent. Out-of-range
//! samples are passed through unclamped.

use crate::WAVEFORM_WINDOW;

/// Placeholder text while no samples exist
pub const AWAITING_SIGNAL: &str = "Extracting heart rate signals...";

/// Glyphs for terminal bars, lowest to highest
const BAR_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// What the waveform panel shows
#[derive(Debug, Clone, PartialEq)]
pub enum Waveform {
    /// No samples yet
    AwaitingSignal,
    /// Bar heights in percent, oldest first
    Bars(Vec<f64>),
}

impl Waveform {
    /// Window the trailing samples with the default size
    pub fn from_samples(samples: &[f64]) -> Self {
        Self::with_window(samples, WAVEFORM_WINDOW)
    }

    /// Window the trailing `window` samples
    pub fn with_window(samples: &[f64], window: usize) -> Self {
        if samples.is_empty() {
            return Waveform::AwaitingSignal;
        }
        let start = samples.len().saturating_sub(window);
        Waveform::Bars(samples[start..].iter().map(|s| s * 100.0).collect())
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self, Waveform::AwaitingSignal)
    }

    /// Number of bars displayed
    pub fn len(&self) -> usize {
        match self {
            Waveform::AwaitingSignal => 0,
            Waveform::Bars(bars) => bars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One glyph per bar; heights outside 0-100 pin to the end glyphs
    pub fn sparkline(&self) -> String {
        match self {
            Waveform::AwaitingSignal => String::new(),
            Waveform::Bars(bars) => bars.iter().map(|h| glyph_for(*h)).collect(),
        }
    }
}

fn glyph_for(height_pct: f64) -> char {
    if !height_pct.is_finite() || height_pct <= 0.0 {
        return BAR_GLYPHS[0];
    }
    let idx = (height_pct / 100.0 * (BAR_GLYPHS.len() - 1) as f64).round() as usize;
    BAR_GLYPHS[idx.min(BAR_GLYPHS.len() - 1)]
}
