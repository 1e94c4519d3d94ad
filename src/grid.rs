//! Overlay gridline placement for the spectrum plot. Only geometry and label
//! text live here; drawing is up to the renderer.

use crate::axis::{FrequencyAxis, FrequencyScale};

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    /// Normalized position across (frequency) or up (dB) the plot.
    pub position: f32,
    /// Value the line marks, in Hz or dB.
    pub value: f32,
    pub label: Option<String>,
    pub major: bool,
}

/// Lines aimed for across the dB range.
const DB_LINES_TARGET: f32 = 7.5;

/// Spacing between dB gridlines for a range of `range_db`.
pub fn db_step(range_db: f32) -> f32 {
    let per_line = range_db / DB_LINES_TARGET;
    if per_line < 3.0 {
        3.0
    } else if per_line < 6.0 {
        6.0
    } else if per_line < 12.0 {
        12.0
    } else {
        24.0
    }
}

/// Horizontal lines at multiples of [`db_step`] between `db_bottom` and
/// `db_top`, positioned from the bottom (0) to the top (1).
pub fn db_lines(db_top: f32, db_bottom: f32) -> Vec<GridLine> {
    let range = db_top - db_bottom;
    if range <= 0.0 {
        return Vec::new();
    }
    let step = db_step(range);
    let first = (-db_top / step).ceil() as i32;
    let last = (-db_bottom / step).floor() as i32;
    (first..=last)
        .map(|d| {
            let db = 0.0 - d as f32 * step;
            GridLine {
                position: (db - db_bottom) / range,
                value: db,
                label: Some(format!("{:.0}", db)),
                major: true,
            }
        })
        .collect()
}

struct LinearRange {
    frequency: f32,
    per_line: f32,
}

const LINEAR_RANGES: [LinearRange; 7] = [
    LinearRange { frequency: 1001.0, per_line: 100.0 },
    LinearRange { frequency: 2000.0, per_line: 200.0 },
    LinearRange { frequency: 5000.0, per_line: 500.0 },
    LinearRange { frequency: 10000.0, per_line: 1000.0 },
    LinearRange { frequency: 20000.0, per_line: 2000.0 },
    LinearRange { frequency: 50000.0, per_line: 5000.0 },
    LinearRange { frequency: 100000.0, per_line: 10000.0 },
];

/// Up to nine evenly spaced lines across a linear view ending at
/// `visible_frequency`.
pub fn linear_frequency_lines(visible_frequency: f32) -> Vec<GridLine> {
    if !(visible_frequency > 0.0) {
        return Vec::new();
    }
    let range = LINEAR_RANGES
        .iter()
        .find(|r| visible_frequency <= r.frequency)
        .unwrap_or(&LINEAR_RANGES[LINEAR_RANGES.len() - 1]);

    let mut lines = Vec::with_capacity(9);
    for k in 1..=9 {
        let f = range.per_line * k as f32;
        let x = f / visible_frequency;
        if x >= 1.0 {
            break;
        }
        lines.push(GridLine {
            position: x,
            value: f,
            label: Some(format!("{:.1}k", f / 1000.0)),
            major: true,
        });
    }
    lines
}

/// Decade lines (labelled) and the 2..9 multiples between them, up to 20 kHz,
/// placed with the axis' frequency mapping. Lines past Nyquist are omitted.
pub fn log_frequency_lines(axis: &FrequencyAxis) -> Vec<GridLine> {
    const DECADES: [(f32, &str); 4] = [(10.0, "10"), (100.0, "100"), (1000.0, "1k"), (10000.0, "10k")];
    let nyquist = axis.nyquist();
    let mut lines = Vec::with_capacity(29);

    for (f, label) in DECADES {
        if f <= nyquist {
            lines.push(GridLine {
                position: axis.frequency_position(f),
                value: f,
                label: Some(label.to_string()),
                major: true,
            });
        }
    }
    for (d, (base, _)) in DECADES.iter().enumerate() {
        let top = if d == DECADES.len() - 1 { 2 } else { 9 };
        for m in 2..=top {
            let f = base * m as f32;
            if f > nyquist {
                break;
            }
            lines.push(GridLine {
                position: axis.frequency_position(f),
                value: f,
                label: None,
                major: false,
            });
        }
    }
    lines
}

/// Vertical lines for whichever scale `axis` is in.
pub fn frequency_lines(axis: &FrequencyAxis, visible_frequency: f32) -> Vec<GridLine> {
    match axis.scale() {
        FrequencyScale::Linear => linear_frequency_lines(visible_frequency),
        FrequencyScale::Logarithmic => log_frequency_lines(axis),
    }
}
