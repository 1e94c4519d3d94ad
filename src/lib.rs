//! Real-time stereo spectrum, oscilloscope and waterfall analysis.
//!
//! The audio thread feeds a [`Producer`]; a render loop calls
//! [`Consumer::tick`] and draws what it exposes. Everything between them
//! moves through a bounded, non-blocking handoff queue.

pub mod axis;
pub mod decimate;
pub mod error;
pub mod fifo;
pub mod frame_ring;
pub mod grid;
pub mod handoff;
pub mod palette;
pub mod pipeline;
pub mod scheduler;
pub mod settings;
pub mod spectrum;
pub mod telemetry;
pub mod waterfall;
pub mod window;

pub use axis::{FrequencyAxis, FrequencyScale};
pub use decimate::{decimate_into, DisplayCurve};
pub use error::{Error, Result};
pub use frame_ring::{FrameRing, HopOutcome, SampleWindow};
pub use handoff::HandoffQueue;
pub use pipeline::{build, AnalyzerConfig, Consumer, Producer, TickReport};
pub use scheduler::{CancelFlag, TickLoop};
pub use settings::ViewSettings;
pub use spectrum::{SpectralAnalyzer, SpectrumFrame};
pub use waterfall::WaterfallHistory;
