//! Streaming voice activity detection — fixed-topology micro-CNN inference.
//!
//! Converts a stream of 10 ms audio chunks into per-chunk speech
//! probabilities. Feature extraction is delegated to a pluggable front end;
//! this crate owns the feature window, the eight-layer network executor,
//! and the per-chunk state machine.
//!
//! # Quick Start
//!
//! ```ignore
//! use vocera::{Vad, VadModel};
//!
//! let mut vad = Vad::new(model, Box::new(front_end))?;
//!
//! // For each 10 ms chunk (160 samples @ 16 kHz):
//! match vad.process_10ms(&samples) {
//!     Some(probability) => { /* speech probability in (0, 1) */ }
//!     None => { /* no decision yet: warming up or front end buffering */ }
//! }
//! ```

pub mod common;
pub(crate) mod feature_window;
pub mod frontend;
pub mod model;
pub(crate) mod network;
pub mod tensor;
mod vad;

// Public re-exports.
pub use frontend::{FeatureExtractor, FrontendConfig};
pub use model::{ModelError, VadModel};
pub use vad::Vad;
