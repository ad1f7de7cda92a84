//! Acoustic front-end boundary.
//!
//! The engine does not compute log-mel features itself; a front end
//! implementing [`FeatureExtractor`] is injected at construction. The
//! stock weights were trained against a specific front-end configuration,
//! captured by [`FrontendConfig::default`] so embedders can configure
//! their DSP chain to match.

use crate::common::{
    FEATURE_DURATION_MS, FEATURE_STEP_MS, NUM_FEATURES, SAMPLE_RATE_HZ, SAMPLES_PER_CHUNK,
};

/// Produces one feature frame per analysis step from raw 16 kHz audio.
///
/// The front end buffers internally: a 10 ms chunk may return `None` when
/// its analysis window still needs more context (the window is longer than
/// the step). The engine treats `None` as "nothing happened this chunk".
pub trait FeatureExtractor {
    /// Feeds one 10 ms chunk; returns a full frame when one is ready.
    fn extract(&mut self, samples: &[i16; SAMPLES_PER_CHUNK]) -> Option<[f32; NUM_FEATURES]>;

    /// Discards buffered audio and smoothing state.
    fn reset(&mut self);
}

/// Analysis-window geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisWindow {
    pub size_ms: u32,
    pub step_size_ms: u32,
}

/// Mel filterbank placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filterbank {
    pub num_channels: usize,
    pub lower_band_limit_hz: f32,
    pub upper_band_limit_hz: f32,
}

/// Spectral-subtraction noise reduction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseReduction {
    pub smoothing_bits: u32,
    pub even_smoothing: f32,
    pub odd_smoothing: f32,
    pub min_signal_remaining: f32,
}

/// Per-channel automatic gain control parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainControl {
    pub enabled: bool,
    pub strength: f32,
    pub offset: f32,
    pub gain_bits: u32,
}

/// Log compression applied to filterbank energies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogScale {
    pub enabled: bool,
    pub scale_shift: u32,
}

/// The front-end configuration the stock model expects.
///
/// `Default` yields the training-time values; a front end configured
/// differently will produce features the weights were never fitted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontendConfig {
    pub sample_rate_hz: u32,
    pub window: AnalysisWindow,
    pub filterbank: Filterbank,
    pub noise_reduction: NoiseReduction,
    pub gain_control: GainControl,
    pub log_scale: LogScale,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            window: AnalysisWindow {
                size_ms: FEATURE_DURATION_MS,
                step_size_ms: FEATURE_STEP_MS,
            },
            filterbank: Filterbank {
                num_channels: NUM_FEATURES,
                lower_band_limit_hz: 125.0,
                upper_band_limit_hz: 7500.0,
            },
            noise_reduction: NoiseReduction {
                smoothing_bits: 10,
                even_smoothing: 0.025,
                odd_smoothing: 0.06,
                min_signal_remaining: 0.05,
            },
            gain_control: GainControl {
                enabled: true,
                strength: 0.95,
                offset: 80.0,
                gain_bits: 21,
            },
            log_scale: LogScale {
                enabled: true,
                scale_shift: 6,
            },
        }
    }
}
