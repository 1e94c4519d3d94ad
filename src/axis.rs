//! Frequency to horizontal display position, in [0, 1].
//!
//! The log scale is linear below the first bin spacing `f1` and logarithmic
//! above it, so DC keeps a finite position. The split point `beta` is the
//! position `f1` lands on:
//!
//! ```text
//! alpha2 = ln 2 / ln Npoints
//! beta   = alpha2 / (1 + alpha2)
//! ```
//!
//! Bins use the index form `beta + (1 - beta) ln i / ln Npoints`, gridlines
//! and labels use the frequency form `beta + (1 - beta) ln(f/f1) / ln(fn/f1)`.
//! The two agree at `f1` and at DC and drift apart by less than a pixel at
//! typical window sizes everywhere else.

use crate::spectrum::bin_count;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyScale {
    #[default]
    Linear,
    Logarithmic,
}

impl FrequencyScale {
    pub fn is_log(self) -> bool {
        self == FrequencyScale::Logarithmic
    }
}

#[derive(Debug, Clone)]
pub struct FrequencyAxis {
    scale: FrequencyScale,
    fft_size: usize,
    npoints: usize,
    sample_rate: f64,
    beta: f64,
    positions: Vec<f32>,
}

impl FrequencyAxis {
    pub fn new(fft_size: usize, sample_rate: f32, scale: FrequencyScale) -> FrequencyAxis {
        let npoints = bin_count(fft_size);
        let alpha2 = 2f64.ln() / (npoints as f64).ln();
        let mut axis = FrequencyAxis {
            scale,
            fft_size,
            npoints,
            sample_rate: sample_rate as f64,
            beta: alpha2 / (1.0 + alpha2),
            positions: vec![0.0; npoints],
        };
        axis.rebuild();
        axis
    }

    pub fn scale(&self) -> FrequencyScale { self.scale }
    pub fn npoints(&self) -> usize { self.npoints }
    pub fn sample_rate(&self) -> f32 { self.sample_rate as f32 }
    pub fn nyquist(&self) -> f32 { (self.sample_rate / 2.0) as f32 }

    /// Log-scale position of the first bin above DC.
    pub fn beta(&self) -> f32 { self.beta as f32 }

    /// Spacing between adjacent bins in Hz.
    pub fn bin_spacing(&self) -> f32 {
        (self.sample_rate / self.fft_size as f64) as f32
    }

    /// Returns `true` if the scale actually changed.
    pub fn set_scale(&mut self, scale: FrequencyScale) -> bool {
        if scale == self.scale {
            return false;
        }
        self.scale = scale;
        self.rebuild();
        true
    }

    /// Per-bin positions for the current scale.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn bin_position(&self, bin: usize) -> f32 {
        match self.scale {
            FrequencyScale::Linear => (bin as f64 / (self.npoints - 1) as f64) as f32,
            FrequencyScale::Logarithmic => {
                if bin == 0 {
                    0.0
                } else {
                    let alpha = (bin as f64).ln() / (self.npoints as f64).ln();
                    (self.beta + alpha * (1.0 - self.beta)) as f32
                }
            }
        }
    }

    pub fn frequency_position(&self, frequency: f32) -> f32 {
        let f = (frequency as f64).max(0.0);
        let fnyq = self.sample_rate / 2.0;
        match self.scale {
            FrequencyScale::Linear => (f / fnyq) as f32,
            FrequencyScale::Logarithmic => {
                let f1 = self.sample_rate / self.fft_size as f64;
                if f < f1 {
                    (self.beta * f / f1) as f32
                } else {
                    let span = (fnyq / f1).ln();
                    if span <= 0.0 {
                        return 1.0;
                    }
                    (self.beta + (1.0 - self.beta) * (f / f1).ln() / span) as f32
                }
            }
        }
    }

    /// Inverse of [`frequency_position`](Self::frequency_position).
    pub fn frequency_at(&self, position: f32) -> f32 {
        let x = (position as f64).max(0.0);
        let fnyq = self.sample_rate / 2.0;
        match self.scale {
            FrequencyScale::Linear => (x * fnyq) as f32,
            FrequencyScale::Logarithmic => {
                let f1 = self.sample_rate / self.fft_size as f64;
                if x < self.beta {
                    (x / self.beta * f1) as f32
                } else {
                    let span = (fnyq / f1).ln();
                    (f1 * ((x - self.beta) / (1.0 - self.beta) * span).exp()) as f32
                }
            }
        }
    }

    fn rebuild(&mut self) {
        for bin in 0..self.npoints {
            self.positions[bin] = self.bin_position(bin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(scale: FrequencyScale) -> FrequencyAxis {
        FrequencyAxis::new(4800, 48000.0, scale)
    }

    #[test]
    fn endpoints_are_zero_and_one() {
        for scale in [FrequencyScale::Linear, FrequencyScale::Logarithmic] {
            let axis = axis(scale);
            assert_eq!(axis.frequency_position(0.0), 0.0, "{scale:?}");
            assert_eq!(axis.frequency_position(axis.nyquist()), 1.0, "{scale:?}");
            assert_eq!(axis.bin_position(0), 0.0, "{scale:?}");
        }
        assert_eq!(axis(FrequencyScale::Linear).bin_position(2400), 1.0);
    }

    #[test]
    fn frequency_mapping_is_monotonic() {
        for scale in [FrequencyScale::Linear, FrequencyScale::Logarithmic] {
            let axis = axis(scale);
            let mut last = -1.0f32;
            for step in 0..=24000 {
                let x = axis.frequency_position(step as f32);
                assert!(x >= last, "{scale:?} decreased at {step} Hz");
                last = x;
            }
        }
    }

    #[test]
    fn bin_positions_are_monotonic() {
        for scale in [FrequencyScale::Linear, FrequencyScale::Logarithmic] {
            let axis = axis(scale);
            assert!(axis.positions().windows(2).all(|w| w[0] <= w[1]), "{scale:?}");
        }
    }

    #[test]
    fn log_scale_puts_first_bin_at_beta() {
        let axis = axis(FrequencyScale::Logarithmic);
        let beta = axis.beta();
        assert!(beta > 0.0 && beta < 0.5);
        assert_eq!(axis.bin_position(1), beta);
        assert!((axis.frequency_position(axis.bin_spacing()) - beta).abs() < 1e-6);
        // Half a bin sits halfway along the linear segment.
        let half = axis.frequency_position(axis.bin_spacing() / 2.0);
        assert!((half - beta / 2.0).abs() < 1e-6);
    }

    #[test]
    fn frequency_at_inverts_position() {
        for scale in [FrequencyScale::Linear, FrequencyScale::Logarithmic] {
            let axis = axis(scale);
            for &f in &[3.0f32, 10.0, 100.0, 1000.0, 12345.0, 24000.0] {
                let back = axis.frequency_at(axis.frequency_position(f));
                assert!((back - f).abs() / f < 1e-4, "{scale:?}: {f} -> {back}");
            }
        }
    }

    #[test]
    fn switching_scale_rebuilds_positions() {
        let mut axis = axis(FrequencyScale::Linear);
        let linear_mid = axis.positions()[1200];
        assert!(axis.set_scale(FrequencyScale::Logarithmic));
        assert!(!axis.set_scale(FrequencyScale::Logarithmic));
        assert!(axis.positions()[1200] > linear_mid);
    }
}
