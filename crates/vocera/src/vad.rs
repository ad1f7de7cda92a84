//! Per-chunk engine state machine.

use tracing::trace;

use crate::common::{FEATURE_SCALE, NUM_FEATURES, SAMPLES_PER_CHUNK, WINDOW_FRAMES};
use crate::feature_window::FeatureWindow;
use crate::frontend::FeatureExtractor;
use crate::model::{ModelError, VadModel};
use crate::network::Network;

/// Streaming voice-activity engine.
///
/// Feed 10 ms chunks via [`process_10ms`](Self::process_10ms); each call
/// returns either a speech probability or `None` while no decision is
/// possible (the front end is still buffering, or fewer than a full
/// window of feature frames has been observed since construction/reset).
///
/// One engine serves one audio stream. Calls mutate the feature window and
/// scratch tensors with no internal locking; concurrent streams need
/// separate engines.
#[derive(derive_more::Debug)]
pub struct Vad {
    #[debug(skip)]
    model: Box<VadModel>,
    #[debug(skip)]
    extractor: Box<dyn FeatureExtractor>,
    window: FeatureWindow,
    #[debug(skip)]
    network: Network,
    warmup_remaining: usize,
}

impl Vad {
    /// Creates an engine from validated model parameters and a front end.
    ///
    /// The front end must match the default
    /// [`FrontendConfig`](crate::FrontendConfig) for the stock weights to
    /// be meaningful.
    pub fn new(
        model: VadModel,
        extractor: Box<dyn FeatureExtractor>,
    ) -> Result<Self, ModelError> {
        model.validate()?;
        Ok(Self {
            model: Box::new(model),
            extractor,
            window: FeatureWindow::new(),
            network: Network::new(),
            warmup_remaining: WINDOW_FRAMES - 1,
        })
    }

    /// Processes one 10 ms chunk of 16 kHz, 16-bit mono audio.
    ///
    /// Returns `None` when the front end produced no frame for this chunk
    /// (engine state is untouched) or while warming up; otherwise the
    /// speech probability for the current window.
    pub fn process_10ms(&mut self, samples: &[i16; SAMPLES_PER_CHUNK]) -> Option<f32> {
        let frame = self.extractor.extract(samples)?;
        self.process_frame(&frame)
    }

    /// Absorbs one raw feature frame, bypassing the front end.
    ///
    /// For hosts that run their own feature pipeline. `features` are
    /// unscaled front-end values; the engine applies the input scaling.
    pub fn process_frame(&mut self, features: &[f32; NUM_FEATURES]) -> Option<f32> {
        let mut scaled = [0.0f32; NUM_FEATURES];
        for (dst, &src) in scaled.iter_mut().zip(features) {
            *dst = FEATURE_SCALE * src;
        }
        self.window.write(&scaled);

        if self.warmup_remaining > 0 {
            self.warmup_remaining -= 1;
            if self.warmup_remaining == 0 {
                trace!("feature window primed; decisions start next chunk");
            }
            return None;
        }

        Some(self.network.infer(&self.model, self.window.frames()))
    }

    /// Returns the engine to its freshly constructed state.
    ///
    /// Rewinds the feature window, re-arms warmup, and resets the front
    /// end. The next `WINDOW_FRAMES - 1` produced frames yield no decision,
    /// exactly as after construction.
    pub fn reset(&mut self) {
        self.window.reset();
        self.extractor.reset();
        self.warmup_remaining = WINDOW_FRAMES - 1;
        trace!("engine reset; warming up");
    }

    /// `true` once a full window has been observed and decisions flow.
    pub fn is_ready(&self) -> bool {
        self.warmup_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Front end double that yields a constant frame on a fixed cadence.
    struct ScriptedFrontend {
        /// Yield a frame every `period` chunks (1 = every chunk).
        period: usize,
        calls: usize,
        frame: [f32; NUM_FEATURES],
    }

    impl ScriptedFrontend {
        fn every_chunk(value: f32) -> Self {
            Self {
                period: 1,
                calls: 0,
                frame: [value; NUM_FEATURES],
            }
        }
    }

    impl FeatureExtractor for ScriptedFrontend {
        fn extract(&mut self, _samples: &[i16; SAMPLES_PER_CHUNK]) -> Option<[f32; NUM_FEATURES]> {
            self.calls += 1;
            (self.calls % self.period == 0).then_some(self.frame)
        }

        fn reset(&mut self) {
            self.calls = 0;
        }
    }

    const SILENCE: [i16; SAMPLES_PER_CHUNK] = [0; SAMPLES_PER_CHUNK];

    #[test]
    fn warmup_swallows_first_window_minus_one_frames() {
        let mut vad = Vad::new(
            VadModel::zeroed(),
            Box::new(ScriptedFrontend::every_chunk(0.0)),
        )
        .unwrap();

        for i in 0..WINDOW_FRAMES - 1 {
            assert_eq!(vad.process_10ms(&SILENCE), None, "chunk {i}");
            assert!(!vad.is_ready() || i == WINDOW_FRAMES - 2);
        }
        let p = vad.process_10ms(&SILENCE).expect("window is full");
        assert_eq!(p, 0.5);
        assert!(vad.is_ready());
    }

    #[test]
    fn starved_frontend_does_not_consume_warmup() {
        // One frame every three chunks: warmup advances a third as fast.
        let frontend = ScriptedFrontend {
            period: 3,
            calls: 0,
            frame: [0.0; NUM_FEATURES],
        };
        let mut vad = Vad::new(VadModel::zeroed(), Box::new(frontend)).unwrap();

        let mut decisions = 0;
        for _ in 0..3 * WINDOW_FRAMES {
            if vad.process_10ms(&SILENCE).is_some() {
                decisions += 1;
            }
        }
        // 3 * 74 chunks produce 74 frames; the last one yields a decision.
        assert_eq!(decisions, 1);
    }

    #[test]
    fn reset_rearms_warmup_and_resets_frontend() {
        let mut vad = Vad::new(
            VadModel::zeroed(),
            Box::new(ScriptedFrontend::every_chunk(0.25)),
        )
        .unwrap();

        for _ in 0..WINDOW_FRAMES + 5 {
            vad.process_10ms(&SILENCE);
        }
        assert!(vad.is_ready());

        vad.reset();
        assert!(!vad.is_ready());
        for i in 0..WINDOW_FRAMES - 1 {
            assert_eq!(vad.process_10ms(&SILENCE), None, "post-reset chunk {i}");
        }
        assert!(vad.process_10ms(&SILENCE).is_some());
    }

    #[test]
    fn rejects_non_finite_model() {
        let mut model = VadModel::zeroed();
        model.conv5.bias[7] = f32::NAN;
        let err = Vad::new(model, Box::new(ScriptedFrontend::every_chunk(0.0))).unwrap_err();
        assert_eq!(err, ModelError::NonFiniteParameter { layer: "conv5" });
    }
}
