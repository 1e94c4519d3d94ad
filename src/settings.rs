//! Persisted view state and the pointer gestures that edit it.

use crate::axis::FrequencyScale;
use crate::error::{Error, Result};
use crate::spectrum::DB_FLOOR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;
/// Narrowest linear view reachable by dragging.
pub const MIN_LINEAR_FREQUENCY: f32 = 1000.0;
/// dB change per scroll unit.
const SCROLL_DB_PER_STEP: f32 = 2.0;
/// Hz removed from the linear view per pixel dragged to the right.
const DRAG_HZ_PER_PIXEL: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub db_min: f32,
    pub db_max: f32,
    /// Highest frequency shown in linear mode.
    pub linear_frequency: f32,
    pub scale: FrequencyScale,
    pub sample_rate: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::for_sample_rate(DEFAULT_SAMPLE_RATE)
    }
}

impl ViewSettings {
    pub fn for_sample_rate(sample_rate: f32) -> Self {
        Self {
            db_min: DB_FLOOR,
            db_max: 0.0,
            linear_frequency: sample_rate / 2.0,
            scale: FrequencyScale::Linear,
            sample_rate,
        }
    }

    pub fn nyquist(&self) -> f32 {
        self.sample_rate / 2.0
    }

    /// Fraction of the spectrum that is visible.
    pub fn view_fraction(&self) -> f32 {
        self.linear_frequency / self.nyquist()
    }

    /// Zoom the dB range around the pointer. `y_fraction` is the pointer's
    /// depth into the plot, 0 at the top edge and 1 at the bottom, so the
    /// dB value under the pointer stays put. Pointers outside the plot are
    /// ignored; returns whether the range changed.
    pub fn scroll_db(&mut self, y_fraction: f32, dy: f32) -> bool {
        if !(0.0..=1.0).contains(&y_fraction) {
            return false;
        }
        let y = y_fraction;
        let delta = dy * SCROLL_DB_PER_STEP;
        self.db_min = (self.db_min + delta * (1.0 - y)).clamp(DB_FLOOR, 0.0);
        self.db_max = (self.db_max - delta * y).clamp(DB_FLOOR, 0.0);
        if self.db_max < self.db_min {
            std::mem::swap(&mut self.db_min, &mut self.db_max);
        }
        true
    }

    /// Narrow (drag right) or widen (drag left) the linear view. Ignored in
    /// log mode, which always shows the full band.
    pub fn drag_width(&mut self, dx: f32) {
        if self.scale.is_log() {
            return;
        }
        let nyquist = self.nyquist();
        self.linear_frequency = (self.linear_frequency - dx * DRAG_HZ_PER_PIXEL)
            .max(MIN_LINEAR_FREQUENCY)
            .min(nyquist);
    }

    pub fn toggle_scale(&mut self) {
        self.scale = match self.scale {
            FrequencyScale::Linear => FrequencyScale::Logarithmic,
            FrequencyScale::Logarithmic => FrequencyScale::Linear,
        };
        if self.scale.is_log() {
            self.linear_frequency = self.nyquist();
        }
    }

    /// Clamp values that came from disk back into range.
    pub fn normalize(&mut self) {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            self.sample_rate = DEFAULT_SAMPLE_RATE;
        }
        self.db_min = self.db_min.clamp(DB_FLOOR, 0.0);
        self.db_max = self.db_max.clamp(DB_FLOOR, 0.0);
        if self.db_max < self.db_min {
            std::mem::swap(&mut self.db_min, &mut self.db_max);
        }
        let nyquist = self.nyquist();
        if !self.linear_frequency.is_finite() {
            self.linear_frequency = nyquist;
        }
        self.linear_frequency = self.linear_frequency.max(MIN_LINEAR_FREQUENCY.min(nyquist)).min(nyquist);
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::SettingsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: ViewSettings = serde_json::from_str(&text)?;
        settings.normalize();
        debug!(?path, ?settings, "loaded view settings");
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| Error::SettingsIo {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_everything() {
        let s = ViewSettings::default();
        assert_eq!((s.db_min, s.db_max), (-180.0, 0.0));
        assert_eq!(s.linear_frequency, 24000.0);
        assert_eq!(s.view_fraction(), 1.0);
        assert_eq!(s.scale, FrequencyScale::Linear);
    }

    #[test]
    fn scroll_keeps_the_edge_under_the_pointer() {
        // Pointer at the top: the top of the range stays, the floor rises.
        let mut s = ViewSettings::default();
        assert!(s.scroll_db(0.0, 10.0));
        assert_eq!((s.db_min, s.db_max), (-160.0, 0.0));
        // Pointer at the bottom: the floor stays, the ceiling drops.
        assert!(s.scroll_db(1.0, 10.0));
        assert_eq!((s.db_min, s.db_max), (-160.0, -20.0));
        // Halfway: both ends move by half a step.
        assert!(s.scroll_db(0.5, 10.0));
        assert_eq!((s.db_min, s.db_max), (-150.0, -30.0));
    }

    #[test]
    fn scroll_outside_the_plot_is_ignored() {
        let mut s = ViewSettings::default();
        assert!(!s.scroll_db(-0.1, 10.0));
        assert!(!s.scroll_db(1.5, 10.0));
        assert!(!s.scroll_db(f32::NAN, 10.0));
        assert_eq!((s.db_min, s.db_max), (-180.0, 0.0));
    }

    #[test]
    fn scroll_clamps_and_keeps_order() {
        let mut s = ViewSettings::default();
        s.scroll_db(0.5, -500.0);
        assert_eq!((s.db_min, s.db_max), (-180.0, 0.0));
        s.scroll_db(0.5, 500.0);
        assert!(s.db_min <= s.db_max);
        assert!(s.db_min >= -180.0 && s.db_max <= 0.0);
    }

    #[test]
    fn drag_is_clamped_and_ignored_in_log_mode() {
        let mut s = ViewSettings::default();
        s.drag_width(100.0);
        assert_eq!(s.linear_frequency, 19000.0);
        s.drag_width(10_000.0);
        assert_eq!(s.linear_frequency, MIN_LINEAR_FREQUENCY);
        s.drag_width(-10_000.0);
        assert_eq!(s.linear_frequency, 24000.0);

        s.drag_width(100.0);
        s.toggle_scale();
        assert_eq!(s.linear_frequency, 24000.0);
        s.drag_width(100.0);
        assert_eq!(s.linear_frequency, 24000.0);
    }

    #[test]
    fn round_trips_through_json_with_missing_fields() {
        let s: ViewSettings = serde_json::from_str(r#"{"db_min": -90.0, "scale": "logarithmic"}"#).unwrap();
        assert_eq!(s.db_min, -90.0);
        assert_eq!(s.db_max, 0.0);
        assert!(s.scale.is_log());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!("signalview-settings-{}.json", std::process::id()));
        let mut s = ViewSettings::for_sample_rate(44100.0);
        s.scroll_db(0.25, 4.0);
        s.save(&path).unwrap();
        let loaded = ViewSettings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, s);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ViewSettings::load(Path::new("/nonexistent/signalview.json")).unwrap_err();
        assert!(matches!(err, Error::SettingsIo { .. }));
    }
}
