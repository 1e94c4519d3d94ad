//! The two halves of a running analyzer.
//!
//! [`Producer`] lives on the audio callback and only ever copies samples and
//! moves preallocated windows onto the handoff queue. [`Consumer`] lives on
//! the render thread: each [`Consumer::tick`] drains the queue, analyses every
//! window it finds, feeds the waterfall and rebuilds the display curve.

use crate::axis::{FrequencyAxis, FrequencyScale};
use crate::decimate::{decimate_into, DisplayCurve};
use crate::error::{Error, Result};
use crate::frame_ring::{window_queue, FrameRing, HopOutcome, SampleWindow, WindowQueue};
use crate::grid::{self, GridLine};
use crate::settings::{ViewSettings, DEFAULT_SAMPLE_RATE};
use crate::spectrum::{SpectralAnalyzer, SpectrumFrame, DB_FLOOR};
use crate::waterfall::{WaterfallHistory, DEFAULT_MAX_TEXTURE_SIZE};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_COPIES: usize = 2;
pub const DEFAULT_WATERFALL_LINES: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub fft_size: usize,
    /// Overlapping windows per `fft_size` samples.
    pub copies: usize,
    pub sample_rate: f32,
    pub waterfall_lines: usize,
    pub max_texture_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::for_sample_rate(DEFAULT_SAMPLE_RATE)
    }
}

impl AnalyzerConfig {
    /// A tenth of a second per window, two copies.
    pub fn for_sample_rate(sample_rate: f32) -> Self {
        let mut fft_size = (sample_rate / 10.0) as usize;
        fft_size -= fft_size % DEFAULT_COPIES;
        Self {
            fft_size,
            copies: DEFAULT_COPIES,
            sample_rate,
            waterfall_lines: DEFAULT_WATERFALL_LINES,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
        }
    }
}

/// Wire a producer and a consumer together around a fresh handoff queue.
pub fn build(config: &AnalyzerConfig) -> Result<(Producer, Consumer)> {
    if !(config.sample_rate.is_finite() && config.sample_rate > 0.0) {
        return Err(Error::InvalidSampleRate(config.sample_rate));
    }
    let queue = window_queue(config.fft_size, config.copies)?;
    let ring = FrameRing::new(config.fft_size, config.copies, queue.clone())?;
    let scope = Arc::new(Mutex::new(SampleWindow::new(config.fft_size)));

    let analyzer = SpectralAnalyzer::new(config.fft_size);
    let npoints = analyzer.npoints();
    let waterfall = match WaterfallHistory::new(npoints, config.waterfall_lines, config.max_texture_size) {
        Ok(wf) => Some(wf),
        Err(err) => {
            warn!("waterfall disabled: {err}");
            None
        }
    };
    info!(
        fft_size = config.fft_size,
        copies = config.copies,
        hop = ring.hop(),
        sample_rate = config.sample_rate,
        "analyzer pipeline ready"
    );

    let producer = Producer { ring, scope: scope.clone() };
    let consumer = Consumer {
        queue,
        copies: config.copies,
        analyzer,
        axis: FrequencyAxis::new(config.fft_size, config.sample_rate, FrequencyScale::Linear),
        frame: SpectrumFrame::new(npoints),
        curve: DisplayCurve::with_capacity(npoints),
        waterfall,
        scope,
        view_fraction: 1.0,
        db_min: DB_FLOOR,
        db_max: 0.0,
    };
    Ok((producer, consumer))
}

/// Hop outcomes over one block of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockReport {
    pub queued: usize,
    pub skipped: usize,
}

pub struct Producer {
    ring: FrameRing,
    scope: Arc<Mutex<SampleWindow>>,
}

impl Producer {
    pub fn fft_size(&self) -> usize { self.ring.size() }

    /// Feed one stereo frame.
    #[inline]
    pub fn submit(&mut self, left: f32, right: f32) -> Option<HopOutcome> {
        let submitted = self.ring.submit(left, right);
        if submitted.scope_flipped {
            // Drop the snapshot rather than wait on a reader.
            if let Some(mut snapshot) = self.scope.try_lock() {
                snapshot.copy_from(self.ring.scope().front());
            }
        }
        submitted.hop
    }

    /// Feed an interleaved `[l, r, l, r, ...]` block. A trailing odd sample
    /// is ignored.
    pub fn submit_interleaved(&mut self, samples: &[f32]) -> BlockReport {
        let mut report = BlockReport::default();
        for frame in samples.chunks_exact(2) {
            match self.submit(frame[0], frame[1]) {
                Some(HopOutcome::Queued) => report.queued += 1,
                Some(HopOutcome::Skipped) => report.skipped += 1,
                None => (),
            }
        }
        report
    }

    /// Latest complete oscilloscope block held by the producer.
    pub fn scope(&self) -> &SampleWindow {
        self.ring.scope().front()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Windows analysed this tick.
    pub drained: usize,
}

pub struct Consumer {
    queue: Arc<WindowQueue>,
    copies: usize,
    analyzer: SpectralAnalyzer,
    axis: FrequencyAxis,
    frame: SpectrumFrame,
    curve: DisplayCurve,
    waterfall: Option<WaterfallHistory>,
    scope: Arc<Mutex<SampleWindow>>,
    view_fraction: f32,
    db_min: f32,
    db_max: f32,
}

impl Consumer {
    /// Analyse whatever the producer has queued, then re-decimate the latest
    /// spectrum for a viewport `pixel_width` columns wide.
    pub fn tick(&mut self, pixel_width: usize) -> TickReport {
        let _g = hprof::enter("Consumer::tick");
        let mut drained = 0;
        while drained < self.copies {
            let Some(window) = self.queue.pop() else { break };
            self.analyzer.compute(&window, &mut self.frame);
            self.queue.recycle(window);
            if let Some(wf) = self.waterfall.as_mut() {
                wf.insert_line(self.frame.left(), self.frame.right());
            }
            drained += 1;
        }

        decimate_into(
            self.axis.positions(),
            self.frame.left(),
            self.frame.right(),
            pixel_width,
            self.view_fraction,
            &mut self.curve,
        );
        TickReport { drained }
    }

    pub fn frame(&self) -> &SpectrumFrame { &self.frame }
    pub fn curve(&self) -> &DisplayCurve { &self.curve }
    pub fn waterfall(&self) -> Option<&WaterfallHistory> { self.waterfall.as_ref() }
    pub fn axis(&self) -> &FrequencyAxis { &self.axis }
    pub fn view_fraction(&self) -> f32 { self.view_fraction }
    pub fn db_limits(&self) -> (f32, f32) { (self.db_min, self.db_max) }

    /// Highest frequency on screen.
    pub fn visible_frequency(&self) -> f32 {
        self.axis.nyquist() * self.view_fraction
    }

    /// Copy the most recent oscilloscope block into `out`.
    pub fn copy_scope(&self, out: &mut SampleWindow) {
        out.copy_from(&self.scope.lock());
    }

    pub fn set_db_limits(&mut self, db_min: f32, db_max: f32) {
        self.db_min = db_min;
        self.db_max = db_max;
        if let Some(wf) = self.waterfall.as_mut() {
            wf.set_db_limits(db_min, db_max);
        }
    }

    pub fn set_visible_frequency(&mut self, frequency: f32) {
        let nyquist = self.axis.nyquist();
        self.view_fraction = if nyquist > 0.0 { (frequency / nyquist).clamp(0.0, 1.0) } else { 1.0 };
    }

    pub fn set_scale(&mut self, scale: FrequencyScale) {
        if self.axis.set_scale(scale) {
            debug!(?scale, "frequency axis rebuilt");
        }
    }

    pub fn apply_settings(&mut self, settings: &ViewSettings) {
        self.set_db_limits(settings.db_min, settings.db_max);
        self.set_scale(settings.scale);
        if settings.scale.is_log() {
            self.view_fraction = 1.0;
        } else {
            self.set_visible_frequency(settings.linear_frequency);
        }
    }

    /// Horizontal (dB) gridlines for the current limits.
    pub fn db_gridlines(&self) -> Vec<GridLine> {
        grid::db_lines(self.db_max, self.db_min)
    }

    /// Vertical (frequency) gridlines for the current scale and view.
    pub fn frequency_gridlines(&self) -> Vec<GridLine> {
        grid::frequency_lines(&self.axis, self.visible_frequency())
    }
}
