//! Scrolling spectrogram history kept in two alternating row buffers.
//!
//! Rows fill the active buffer from the bottom up. Once it is full the roles
//! swap, so a renderer drawing the active buffer above the trailing one and
//! shifting both by [`WaterfallHistory::scroll_offset`] sees a continuous
//! scroll without re-uploading the whole image on every line.

use crate::error::{Error, Result};
use crate::spectrum::DB_FLOOR;
use tracing::debug;

/// Largest texture edge most GL drivers accept.
pub const DEFAULT_MAX_TEXTURE_SIZE: usize = 16384;

/// Intensity pair for one column: `[left, right]`.
pub type WaterfallPixel = [u8; 2];

/// Map a decibel value onto `[0, 255]`, squared for perceptual weighting.
pub fn db_to_intensity(db: f32, db_min: f32, db_max: f32) -> u8 {
    if db >= db_max {
        return 255;
    }
    if db <= db_min || db_max <= db_min {
        return 0;
    }
    let t = (db - db_min) / (db_max - db_min);
    (t * t * 255.0) as u8
}

#[derive(Debug, Clone)]
pub struct WaterfallHistory {
    npoints: usize,
    nlines: usize,
    buffers: [Vec<WaterfallPixel>; 2],
    active: usize,
    line: usize,
    db_min: f32,
    db_max: f32,
}

impl WaterfallHistory {
    pub fn new(npoints: usize, nlines: usize, max_texture_size: usize) -> Result<WaterfallHistory> {
        if nlines == 0 {
            return Err(Error::NoWaterfallLines);
        }
        if npoints > max_texture_size || nlines > max_texture_size {
            return Err(Error::TextureTooLarge {
                width: npoints,
                height: nlines,
                max: max_texture_size,
            });
        }
        debug!(npoints, nlines, "allocated waterfall history");
        Ok(WaterfallHistory {
            npoints,
            nlines,
            buffers: [vec![[0, 0]; npoints * nlines], vec![[0, 0]; npoints * nlines]],
            active: 0,
            line: 0,
            db_min: DB_FLOOR,
            db_max: 0.0,
        })
    }

    pub fn npoints(&self) -> usize { self.npoints }
    pub fn nlines(&self) -> usize { self.nlines }

    /// Rows written into the active buffer since the last swap.
    pub fn line(&self) -> usize { self.line }

    /// Index (0 or 1) of the buffer currently receiving rows.
    pub fn active_index(&self) -> usize { self.active }

    pub fn db_limits(&self) -> (f32, f32) { (self.db_min, self.db_max) }

    pub fn set_db_limits(&mut self, db_min: f32, db_max: f32) {
        self.db_min = db_min;
        self.db_max = db_max;
    }

    pub fn active(&self) -> &[WaterfallPixel] {
        &self.buffers[self.active]
    }

    pub fn trailing(&self) -> &[WaterfallPixel] {
        &self.buffers[self.active ^ 1]
    }

    /// Row `row` (top to bottom) of the active or trailing buffer.
    pub fn row(&self, trailing: bool, row: usize) -> &[WaterfallPixel] {
        let buf = if trailing { self.trailing() } else { self.active() };
        &buf[row * self.npoints..(row + 1) * self.npoints]
    }

    /// Vertical translation, in buffer heights, that lines the seam between
    /// the two buffers up with the newest row.
    pub fn scroll_offset(&self) -> f32 {
        -(self.line as f32 / self.nlines as f32)
    }

    pub fn insert_line(&mut self, db_left: &[f32], db_right: &[f32]) {
        assert_eq!(db_left.len(), self.npoints);
        assert_eq!(db_right.len(), self.npoints);
        let row = self.nlines - self.line - 1;
        let (db_min, db_max) = (self.db_min, self.db_max);
        let start = row * self.npoints;
        let dst = &mut self.buffers[self.active][start..start + self.npoints];
        for ((px, &l), &r) in dst.iter_mut().zip(db_left).zip(db_right) {
            *px = [db_to_intensity(l, db_min, db_max), db_to_intensity(r, db_min, db_max)];
        }

        self.line += 1;
        if self.line == self.nlines {
            self.line = 0;
            self.active ^= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_endpoints() {
        assert_eq!(db_to_intensity(0.0, -120.0, 0.0), 255);
        assert_eq!(db_to_intensity(10.0, -120.0, 0.0), 255);
        assert_eq!(db_to_intensity(-120.0, -120.0, 0.0), 0);
        assert_eq!(db_to_intensity(-180.0, -120.0, 0.0), 0);
        // Halfway up is a quarter of full scale after squaring.
        assert_eq!(db_to_intensity(-60.0, -120.0, 0.0), 63);
    }

    #[test]
    fn empty_or_inverted_range_does_not_divide() {
        assert_eq!(db_to_intensity(-50.0, -50.0, -50.0), 255);
        assert_eq!(db_to_intensity(-51.0, -50.0, -50.0), 0);
        // An inverted range degrades to a threshold at `db_max`.
        assert_eq!(db_to_intensity(-60.0, -40.0, -80.0), 255);
        assert_eq!(db_to_intensity(-90.0, -40.0, -80.0), 0);
    }

    #[test]
    fn rejects_oversized_textures() {
        assert!(matches!(
            WaterfallHistory::new(20000, 128, DEFAULT_MAX_TEXTURE_SIZE),
            Err(Error::TextureTooLarge { width: 20000, .. })
        ));
        assert!(matches!(WaterfallHistory::new(16, 0, 64), Err(Error::NoWaterfallLines)));
    }

    #[test]
    fn rows_fill_bottom_up_then_buffers_swap() {
        let mut wf = WaterfallHistory::new(3, 4, 64).unwrap();
        wf.set_db_limits(-100.0, 0.0);
        let loud = [0.0f32; 3];
        let quiet = [-100.0f32; 3];

        wf.insert_line(&loud, &quiet);
        assert_eq!(wf.line(), 1);
        assert_eq!(wf.row(false, 3), &[[255, 0]; 3]);
        assert_eq!(wf.row(false, 2), &[[0, 0]; 3]);
        assert_eq!(wf.scroll_offset(), -0.25);

        for _ in 0..3 {
            wf.insert_line(&quiet, &loud);
        }
        assert_eq!(wf.line(), 0);
        assert_eq!(wf.active_index(), 1);
        assert_eq!(wf.scroll_offset(), 0.0);
        // The filled buffer is now trailing, newest row on top.
        assert_eq!(wf.row(true, 0), &[[0, 255]; 3]);
        assert_eq!(wf.row(true, 3), &[[255, 0]; 3]);

        for _ in 0..4 {
            wf.insert_line(&loud, &loud);
        }
        assert_eq!(wf.active_index(), 0);
        assert_eq!(wf.line(), 0);
    }
}
