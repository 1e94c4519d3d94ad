use std::f64::consts::PI;

/// Blackman-Harris coefficients (4-term, -92 dB sidelobes).
pub const BH_A0: f64 = 0.35875;
pub const BH_A1: f64 = 0.48829;
pub const BH_A2: f64 = 0.14128;
pub const BH_A3: f64 = 0.01168;

pub trait Window {
    fn size(&self) -> usize;
    fn shape(&self) -> &[f32];

    /// Mean of the window over one period, i.e. its DC gain per sample.
    fn coherent_gain(&self) -> f32;

    fn apply(&self, data: &mut [f32]) {
        let shp = self.shape();
        assert_eq!(shp.len(), data.len());
        for (datum, factor) in data.iter_mut().zip(shp.iter()) {
            *datum *= factor;
        }
    }
}

/// Periodic 4-term Blackman-Harris window, sampled at `i / N`.
pub struct BlackmanHarris(Vec<f32>);

impl BlackmanHarris {
    pub fn new(sz: usize) -> BlackmanHarris {
        BlackmanHarris((0..sz).map(|i| blackman_harris(i as f64 / sz as f64) as f32).collect())
    }
}

impl Window for BlackmanHarris {
    fn size(&self) -> usize { self.0.len() }
    fn shape(&self) -> &[f32] { &self.0 }
    fn coherent_gain(&self) -> f32 { BH_A0 as f32 }
}

pub fn blackman_harris(alpha: f64) -> f64 {
    BH_A0 - BH_A1 * (2.0 * PI * alpha).cos() + BH_A2 * (4.0 * PI * alpha).cos()
        - BH_A3 * (6.0 * PI * alpha).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_zero_near_edges_and_one_in_the_middle() {
        let win = BlackmanHarris::new(1024);
        assert_eq!(win.size(), 1024);
        assert!(win.shape()[0].abs() < 1e-4);
        assert!((win.shape()[512] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn mean_of_periodic_window_is_a0() {
        let win = BlackmanHarris::new(4096);
        let mean: f64 = win.shape().iter().map(|&w| w as f64).sum::<f64>() / 4096.0;
        assert!((mean - BH_A0).abs() < 1e-6, "mean was {mean}");
        assert_eq!(win.coherent_gain(), BH_A0 as f32);
    }

    #[test]
    fn apply_scales_in_place() {
        let win = BlackmanHarris::new(8);
        let mut data = vec![2.0f32; 8];
        win.apply(&mut data);
        for (d, w) in data.iter().zip(win.shape()) {
            assert_eq!(*d, 2.0 * w);
        }
    }
}
