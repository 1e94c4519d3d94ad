//! Producer-side assembly of overlapping analysis windows.
//!
//! Everything in here runs on the audio thread: no allocation, no waiting
//! beyond the handoff queue's list locks.

use crate::error::{Error, Result};
use crate::fifo::Fifo;
use crate::handoff::HandoffQueue;
use std::sync::Arc;

/// One stereo block of `len()` samples per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow {
    left: Box<[f32]>,
    right: Box<[f32]>,
}

impl SampleWindow {
    pub fn new(len: usize) -> SampleWindow {
        SampleWindow {
            left: vec![0.0; len].into_boxed_slice(),
            right: vec![0.0; len].into_boxed_slice(),
        }
    }

    pub fn from_channels(left: Vec<f32>, right: Vec<f32>) -> SampleWindow {
        assert_eq!(left.len(), right.len(), "stereo channels must have equal length");
        SampleWindow {
            left: left.into_boxed_slice(),
            right: right.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize { self.left.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.left.is_empty() }

    pub fn left(&self) -> &[f32] { &self.left }
    pub fn right(&self) -> &[f32] { &self.right }

    pub fn copy_from(&mut self, other: &SampleWindow) {
        self.left.copy_from_slice(&other.left);
        self.right.copy_from_slice(&other.right);
    }
}

pub type WindowQueue = HandoffQueue<SampleWindow>;

/// Hop length for `copies` overlapping windows of `fft_size` samples.
pub fn hop_length(fft_size: usize, copies: usize) -> Result<usize> {
    if copies == 0 {
        return Err(Error::ZeroCopies);
    }
    if fft_size < 2 {
        return Err(Error::WindowTooSmall(fft_size));
    }
    if fft_size % copies != 0 {
        return Err(Error::UnevenHop { fft_size, copies });
    }
    Ok(fft_size / copies)
}

/// Queue sized for `copies` windows, with every window buffer preallocated
/// on the spare list.
pub fn window_queue(fft_size: usize, copies: usize) -> Result<Arc<WindowQueue>> {
    hop_length(fft_size, copies)?;
    Ok(Arc::new(HandoffQueue::with_spares(
        copies,
        (0..copies).map(|_| SampleWindow::new(fft_size)),
    )))
}

/// Oscilloscope double buffer: the back half fills sample by sample and the
/// halves trade places every `len()` samples.
#[derive(Debug, Clone)]
pub struct ScopeBuffer {
    blocks: [SampleWindow; 2],
    front: usize,
    fill: usize,
}

impl ScopeBuffer {
    pub fn new(len: usize) -> ScopeBuffer {
        ScopeBuffer {
            blocks: [SampleWindow::new(len), SampleWindow::new(len)],
            front: 0,
            fill: 0,
        }
    }

    /// Returns `true` when this sample completed a block and the halves swapped.
    #[inline]
    pub fn write(&mut self, left: f32, right: f32) -> bool {
        let back = &mut self.blocks[self.front ^ 1];
        back.left[self.fill] = left;
        back.right[self.fill] = right;
        self.fill += 1;
        if self.fill == back.len() {
            self.fill = 0;
            self.front ^= 1;
            true
        } else {
            false
        }
    }

    /// Most recent complete block.
    pub fn front(&self) -> &SampleWindow {
        &self.blocks[self.front]
    }
}

/// What happened at the end of a hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopOutcome {
    /// A fresh window went onto the queue.
    Queued,
    /// The consumer is behind; this hop's window is dropped for good.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Submitted {
    pub scope_flipped: bool,
    pub hop: Option<HopOutcome>,
}

fn check_queue(queue: &WindowQueue, fft_size: usize, copies: usize) -> Result<()> {
    let mismatch = Error::QueueMismatch { fft_size, copies };
    if queue.capacity() != copies {
        return Err(mismatch);
    }
    let spares: Vec<SampleWindow> = std::iter::from_fn(|| queue.claim()).collect();
    let fits = spares.iter().all(|w| w.len() == fft_size);
    for window in spares {
        queue.recycle(window);
    }
    if fits { Ok(()) } else { Err(mismatch) }
}

pub struct FrameRing {
    hop: usize,
    countdown: usize,
    left: Fifo<f32>,
    right: Fifo<f32>,
    scope: ScopeBuffer,
    queue: Arc<WindowQueue>,
}

impl FrameRing {
    /// `queue` must hold `copies` windows of `fft_size` samples, as
    /// [`window_queue`] builds it.
    pub fn new(fft_size: usize, copies: usize, queue: Arc<WindowQueue>) -> Result<FrameRing> {
        let hop = hop_length(fft_size, copies)?;
        check_queue(&queue, fft_size, copies)?;
        Ok(FrameRing {
            hop,
            countdown: hop,
            left: Fifo::new(fft_size),
            right: Fifo::new(fft_size),
            scope: ScopeBuffer::new(fft_size),
            queue,
        })
    }

    pub fn size(&self) -> usize { self.left.size() }
    pub fn hop(&self) -> usize { self.hop }
    pub fn queue(&self) -> &Arc<WindowQueue> { &self.queue }
    pub fn scope(&self) -> &ScopeBuffer { &self.scope }

    #[inline]
    pub fn submit(&mut self, left: f32, right: f32) -> Submitted {
        self.left.push(left);
        self.right.push(right);
        let scope_flipped = self.scope.write(left, right);

        self.countdown -= 1;
        let hop = if self.countdown == 0 {
            self.countdown = self.hop;
            Some(self.materialize())
        } else {
            None
        };

        Submitted { scope_flipped, hop }
    }

    fn materialize(&mut self) -> HopOutcome {
        if self.queue.is_full() {
            return HopOutcome::Skipped;
        }
        let Some(mut window) = self.queue.claim() else {
            // Every buffer is either queued or still being read.
            return HopOutcome::Skipped;
        };
        self.left.unroll_into(&mut window.left);
        self.right.unroll_into(&mut window.right);
        match self.queue.try_push(window) {
            Ok(()) => HopOutcome::Queued,
            Err(window) => {
                self.queue.recycle(window);
                HopOutcome::Skipped
            }
        }
    }
}
