//! Windowed real FFT to a per-channel decibel spectrum.

use crate::frame_ring::SampleWindow;
use crate::window::{BlackmanHarris, Window};
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;
use std::sync::Arc;
use tracing::{debug, warn};

/// Smallest magnitude the dB conversion distinguishes; anything at or below
/// it reads as [`DB_FLOOR`].
pub const MAGNITUDE_FLOOR: f32 = 1e-9;
/// `20 * log10(MAGNITUDE_FLOOR)`.
pub const DB_FLOOR: f32 = -180.0;

#[inline]
pub fn magnitude_to_db(magnitude: f32) -> f32 {
    if magnitude <= MAGNITUDE_FLOOR {
        DB_FLOOR
    } else {
        (20.0 * magnitude.log10()).max(DB_FLOOR)
    }
}

/// Number of bins a real transform of `fft_size` samples produces.
#[inline]
pub fn bin_count(fft_size: usize) -> usize {
    fft_size / 2 + 1
}

/// Decibel spectrum of one stereo window.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFrame {
    left: Vec<f32>,
    right: Vec<f32>,
}

impl SpectrumFrame {
    pub fn new(npoints: usize) -> SpectrumFrame {
        SpectrumFrame {
            left: vec![DB_FLOOR; npoints],
            right: vec![DB_FLOOR; npoints],
        }
    }

    pub fn npoints(&self) -> usize { self.left.len() }
    pub fn left(&self) -> &[f32] { &self.left }
    pub fn right(&self) -> &[f32] { &self.right }
}

pub struct SpectralAnalyzer {
    fft: Arc<dyn RealToComplex<f32>>,
    window: BlackmanHarris,
    input: Vec<f32>,
    output: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    norm: f32,
}

impl SpectralAnalyzer {
    pub fn new(fft_size: usize) -> SpectralAnalyzer {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let window = BlackmanHarris::new(fft_size);
        // Undo the window's DC gain and fold in the negative frequencies.
        let norm = 2.0 / (window.coherent_gain() * fft_size as f32);
        debug!(fft_size, bins = bin_count(fft_size), "planned spectral analyzer");
        SpectralAnalyzer {
            input: fft.make_input_vec(),
            output: fft.make_output_vec(),
            scratch: fft.make_scratch_vec(),
            fft,
            window,
            norm,
        }
    }

    pub fn fft_size(&self) -> usize { self.window.size() }
    pub fn npoints(&self) -> usize { self.output.len() }

    pub fn compute(&mut self, window: &SampleWindow, frame: &mut SpectrumFrame) {
        self.compute_channel(window.left(), &mut frame.left);
        self.compute_channel(window.right(), &mut frame.right);
    }

    pub fn compute_channel(&mut self, samples: &[f32], db_out: &mut [f32]) {
        assert_eq!(db_out.len(), self.output.len());
        self.input.copy_from_slice(samples);
        self.window.apply(&mut self.input);

        if let Err(err) = self
            .fft
            .process_with_scratch(&mut self.input, &mut self.output, &mut self.scratch)
        {
            warn!("real FFT failed: {err}");
            db_out.fill(DB_FLOOR);
            return;
        }

        for (db, bin) in db_out.iter_mut().zip(&self.output) {
            *db = magnitude_to_db(bin.norm() * self.norm);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn floor_maps_to_exactly_minus_180() {
        assert_eq!(magnitude_to_db(0.0), DB_FLOOR);
        assert_eq!(magnitude_to_db(MAGNITUDE_FLOOR), DB_FLOOR);
        assert!(magnitude_to_db(1.0).abs() < 1e-6);
    }

    #[test]
    fn silence_is_floor_in_every_bin() {
        let mut analyzer = SpectralAnalyzer::new(1024);
        let mut frame = SpectrumFrame::new(analyzer.npoints());
        let window = SampleWindow::new(1024);
        analyzer.compute(&window, &mut frame);
        assert_eq!(frame.npoints(), 513);
        assert!(frame.left().iter().all(|&db| db == DB_FLOOR));
        assert!(frame.right().iter().all(|&db| db == DB_FLOOR));
    }

    #[test]
    fn bin_centred_sine_peaks_at_its_amplitude() {
        let n = 1024;
        let bin = 64;
        let amplitude = 0.5f32;
        let left: Vec<f32> = (0..n)
            .map(|i| amplitude * (2.0 * PI * bin as f32 * i as f32 / n as f32).sin())
            .collect();
        let right = vec![0.0; n];
        let window = SampleWindow::from_channels(left, right);

        let mut analyzer = SpectralAnalyzer::new(n);
        let mut frame = SpectrumFrame::new(analyzer.npoints());
        analyzer.compute(&window, &mut frame);

        let expected = 20.0 * amplitude.log10();
        let peak = frame.left()[bin];
        assert!((peak - expected).abs() < 0.1, "peak {peak} dB, expected {expected} dB");
        for (i, &db) in frame.left().iter().enumerate() {
            if i != bin {
                assert!(db < peak, "bin {i} at {db} dB is not below the peak");
            }
        }
        assert!(frame.right().iter().all(|&db| db == DB_FLOOR));
    }
}
