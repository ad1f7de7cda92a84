//! Shared constants for the streaming VAD pipeline.

/// Sample rate the engine operates at.
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Front-end analysis window length.
pub const FEATURE_DURATION_MS: u32 = 30;

/// Front-end step size; one feature frame is produced per step.
pub const FEATURE_STEP_MS: u32 = 10;

/// Log-mel channels per feature frame.
pub const NUM_FEATURES: usize = 40;

/// Feature frames held in the rolling inference window.
pub const WINDOW_FRAMES: usize = 74;

/// Samples per 10 ms chunk.
pub const SAMPLES_PER_CHUNK: usize = (FEATURE_STEP_MS * (SAMPLE_RATE_HZ / 1000)) as usize;

/// Bytes per 10 ms chunk (16-bit mono).
pub const BYTES_PER_CHUNK: usize = SAMPLES_PER_CHUNK * 2;

/// Scale applied to raw front-end features before they enter the window.
///
/// The network was trained on features quantized to 1/256 steps over a
/// 10x range; raw front-end values map onto that grid via 10/256.
pub const FEATURE_SCALE: f32 = 0.0390625;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_geometry() {
        assert_eq!(SAMPLES_PER_CHUNK, 160);
        assert_eq!(BYTES_PER_CHUNK, 320);
    }

    #[test]
    fn feature_scale_is_exact_in_f32() {
        // 10 / 256 is a dyadic rational times ten; must round-trip exactly.
        assert_eq!(FEATURE_SCALE, 10.0 / 256.0);
    }
}
