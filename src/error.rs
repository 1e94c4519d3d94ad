use std::io;
use std::path::PathBuf;

/// Errors raised while configuring the analysis pipeline or loading view
/// settings. Nothing on the audio path returns an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("overlap factor must be at least 1")]
    ZeroCopies,
    #[error("analysis window of {0} samples is too small (need at least 2)")]
    WindowTooSmall(usize),
    #[error("window of {fft_size} samples does not split into {copies} equal hops")]
    UnevenHop { fft_size: usize, copies: usize },
    #[error("window queue does not hold {copies} windows of {fft_size} samples")]
    QueueMismatch { fft_size: usize, copies: usize },
    #[error("sample rate {0} Hz is not a positive, finite number")]
    InvalidSampleRate(f32),
    #[error("waterfall needs at least one line")]
    NoWaterfallLines,
    #[error("waterfall texture of {width}x{height} exceeds the {max} texel limit")]
    TextureTooLarge { width: usize, height: usize, max: usize },
    #[error("reading or writing settings at {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
