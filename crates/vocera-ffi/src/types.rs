//! C-compatible type definitions for the VAD C API.
//!
//! All types here are `#[repr(C)]` and safe to pass across FFI boundaries.

use std::ffi::c_void;

use vocera::common::{NUM_FEATURES, SAMPLES_PER_CHUNK};
use vocera::model::{ConvParams, DenseParams, DepthwiseParams};
use vocera::{FeatureExtractor, Vad, VadModel};

// ---------------------------------------------------------------------------
// Result values
// ---------------------------------------------------------------------------

/// No decision available for this chunk (warmup, or front end buffering).
pub const VOCERA_NO_DECISION: f32 = -1.0;

/// Invalid argument: null pointer or a buffer shorter than one chunk.
pub const VOCERA_INVALID_ARGUMENT: f32 = -2.0;

/// Internal error (panic caught at the FFI boundary).
pub const VOCERA_INTERNAL_ERROR: f32 = -3.0;

// ---------------------------------------------------------------------------
// Front-end callbacks
// ---------------------------------------------------------------------------

/// Front-end feature callback.
///
/// Receives `num_samples` 16 kHz samples (one 10 ms chunk). Returns `true`
/// after writing one full frame of [`NUM_FEATURES`] values to
/// `features_out`; returns `false` when more audio is needed. The engine
/// calls it exactly once per processed chunk.
pub type VoceraExtractFn = Option<
    unsafe extern "C" fn(
        ctx: *mut c_void,
        samples: *const i16,
        num_samples: usize,
        features_out: *mut f32,
    ) -> bool,
>;

/// Front-end reset callback, invoked by `vocera_reset`. May be null.
pub type VoceraResetFn = Option<unsafe extern "C" fn(ctx: *mut c_void)>;

/// Adapts the C callbacks to the engine's front-end trait.
pub(crate) struct CallbackFrontend {
    pub(crate) extract: unsafe extern "C" fn(*mut c_void, *const i16, usize, *mut f32) -> bool,
    pub(crate) reset: VoceraResetFn,
    pub(crate) ctx: *mut c_void,
}

impl FeatureExtractor for CallbackFrontend {
    fn extract(&mut self, samples: &[i16; SAMPLES_PER_CHUNK]) -> Option<[f32; NUM_FEATURES]> {
        let mut features = [0.0f32; NUM_FEATURES];
        // Safety: the callback contract promises `features_out` holds
        // NUM_FEATURES floats, which is exactly what we pass.
        let produced = unsafe {
            (self.extract)(self.ctx, samples.as_ptr(), samples.len(), features.as_mut_ptr())
        };
        produced.then_some(features)
    }

    fn reset(&mut self) {
        if let Some(reset) = self.reset {
            // Safety: caller-supplied callback with its own context.
            unsafe { reset(self.ctx) };
        }
    }
}

// ---------------------------------------------------------------------------
// Model parameters
// ---------------------------------------------------------------------------

/// Flat model-parameter struct mirroring the exporter's layout.
///
/// Dimensions are `[filters][filter_width][height = 1][channels]` for the
/// convolution stages. Copied into the engine at `vocera_create`; the
/// caller may free it afterwards.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct VoceraModel {
    pub conv1_filter: [[[[f32; 40]; 1]; 5]; 32],
    pub conv1_bias: [f32; 32],
    pub dconv2_filter: [[[[f32; 32]; 1]; 5]; 1],
    pub dconv2_bias: [f32; 32],
    pub conv3_filter: [[[[f32; 32]; 1]; 1]; 48],
    pub conv3_bias: [f32; 48],
    pub dconv4_filter: [[[[f32; 48]; 1]; 8]; 1],
    pub dconv4_bias: [f32; 48],
    pub conv5_filter: [[[[f32; 48]; 1]; 1]; 48],
    pub conv5_bias: [f32; 48],
    pub dconv6_filter: [[[[f32; 48]; 1]; 13]; 1],
    pub dconv6_bias: [f32; 48],
    pub conv7_filter: [[[[f32; 48]; 1]; 1]; 48],
    pub conv7_bias: [f32; 48],
    pub dense8_weights: [[f32; 48]; 1],
    pub dense8_bias: [f32; 1],
}

impl VoceraModel {
    pub(crate) fn to_rust(&self) -> VadModel {
        VadModel {
            conv1: ConvParams {
                filter: self.conv1_filter,
                bias: self.conv1_bias,
            },
            dconv2: DepthwiseParams {
                filter: self.dconv2_filter,
                bias: self.dconv2_bias,
            },
            conv3: ConvParams {
                filter: self.conv3_filter,
                bias: self.conv3_bias,
            },
            dconv4: DepthwiseParams {
                filter: self.dconv4_filter,
                bias: self.dconv4_bias,
            },
            conv5: ConvParams {
                filter: self.conv5_filter,
                bias: self.conv5_bias,
            },
            dconv6: DepthwiseParams {
                filter: self.dconv6_filter,
                bias: self.dconv6_bias,
            },
            conv7: ConvParams {
                filter: self.conv7_filter,
                bias: self.conv7_bias,
            },
            dense8: DenseParams {
                weights: self.dense8_weights,
                bias: self.dense8_bias,
            },
        }
    }

    /// All-zero parameters, the exporter's starting template.
    pub const fn zeroed() -> Self {
        Self {
            conv1_filter: [[[[0.0; 40]; 1]; 5]; 32],
            conv1_bias: [0.0; 32],
            dconv2_filter: [[[[0.0; 32]; 1]; 5]; 1],
            dconv2_bias: [0.0; 32],
            conv3_filter: [[[[0.0; 32]; 1]; 1]; 48],
            conv3_bias: [0.0; 48],
            dconv4_filter: [[[[0.0; 48]; 1]; 8]; 1],
            dconv4_bias: [0.0; 48],
            conv5_filter: [[[[0.0; 48]; 1]; 1]; 48],
            conv5_bias: [0.0; 48],
            dconv6_filter: [[[[0.0; 48]; 1]; 13]; 1],
            dconv6_bias: [0.0; 48],
            conv7_filter: [[[[0.0; 48]; 1]; 1]; 48],
            conv7_bias: [0.0; 48],
            dense8_weights: [[0.0; 48]; 1],
            dense8_bias: [0.0; 1],
        }
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Opaque engine handle. Create with `vocera_create`, free with
/// `vocera_destroy`.
#[derive(Debug)]
pub struct VoceraVad {
    pub(crate) inner: Vad,
}
