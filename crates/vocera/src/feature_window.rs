//! Rolling feature window feeding the network input tensor.

use crate::common::{NUM_FEATURES, WINDOW_FRAMES};
use crate::tensor::Array4d;

/// Ring buffer holding the most recent [`WINDOW_FRAMES`] feature frames,
/// stored directly in the layout the first convolution stage consumes.
///
/// Frames are written in place at `write_offset`, which then advances
/// modulo the window length; the buffer is handed to the network exactly
/// as stored, i.e. rotated so that physical index `write_offset` holds the
/// oldest frame. The trained weights expect this rotated layout — any
/// re-linearization to chronological order must be verified against the
/// weight-export pipeline first.
#[derive(derive_more::Debug)]
pub(crate) struct FeatureWindow {
    #[debug(skip)]
    buffer: Box<Array4d<1, WINDOW_FRAMES, 1, NUM_FEATURES>>,
    write_offset: usize,
}

impl FeatureWindow {
    pub(crate) fn new() -> Self {
        Self {
            buffer: Box::new([[[[0.0; NUM_FEATURES]; 1]; WINDOW_FRAMES]; 1]),
            write_offset: 0,
        }
    }

    /// Overwrites the slot at `write_offset` with `frame` and advances.
    ///
    /// `frame` must already carry the network's input scaling. Always in
    /// bounds; there is no failure mode.
    pub(crate) fn write(&mut self, frame: &[f32; NUM_FEATURES]) {
        self.buffer[0][self.write_offset][0].copy_from_slice(frame);
        self.write_offset = (self.write_offset + 1) % WINDOW_FRAMES;
    }

    /// Rewinds the write cursor without touching buffer contents.
    ///
    /// Stale frames are unreachable afterwards: warmup guarantees a full
    /// window of fresh writes before the next inference.
    pub(crate) fn reset(&mut self) {
        self.write_offset = 0;
    }

    /// The window in network-input layout (rotated, see type docs).
    pub(crate) fn frames(&self) -> &Array4d<1, WINDOW_FRAMES, 1, NUM_FEATURES> {
        &self.buffer
    }

    #[cfg(test)]
    pub(crate) fn write_offset(&self) -> usize {
        self.write_offset
    }
}
