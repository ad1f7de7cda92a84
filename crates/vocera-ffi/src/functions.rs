//! Exported `extern "C"` functions for the VAD C API.
//!
//! # Symbol prefix
//!
//! All public symbols use the `vocera_` prefix.

use std::ffi::c_void;
use std::ptr;
use std::slice;

use vocera::Vad;
use vocera::common::{BYTES_PER_CHUNK, SAMPLES_PER_CHUNK};

use super::panic_guard::{ffi_guard_or, ffi_guard_ptr};
use super::types::{
    CallbackFrontend, VOCERA_INTERNAL_ERROR, VOCERA_INVALID_ARGUMENT, VOCERA_NO_DECISION,
    VoceraExtractFn, VoceraModel, VoceraResetFn, VoceraVad,
};

// ─── Version ─────────────────────────────────────────────────────────

/// Returns a pointer to a static null-terminated version string.
///
/// The returned pointer is valid for the lifetime of the process.
#[unsafe(no_mangle)]
pub extern "C" fn vocera_version() -> *const std::ffi::c_char {
    c"0.1.0".as_ptr()
}

// ─── Lifecycle ───────────────────────────────────────────────────────

/// Creates a VAD engine from model parameters and a front-end callback.
///
/// `model` is copied; the caller may free it after this returns. `extract`
/// is invoked once per processed chunk with `extract_ctx`; `reset` (may be
/// null) is invoked by [`vocera_reset()`].
///
/// Returns `NULL` if `model` or `extract` is null, if the parameters fail
/// validation (non-finite values), or on internal error. The caller owns
/// the returned pointer and must free it with [`vocera_destroy()`].
#[unsafe(no_mangle)]
pub extern "C" fn vocera_create(
    model: *const VoceraModel,
    extract: VoceraExtractFn,
    extract_ctx: *mut c_void,
    reset: VoceraResetFn,
) -> *mut VoceraVad {
    ffi_guard_ptr! {
        let Some(extract) = extract else {
            return ptr::null_mut();
        };
        if model.is_null() {
            return ptr::null_mut();
        }
        // Safety: the caller guarantees `model` points to a valid
        // VoceraModel for the duration of this call.
        let model = unsafe { &*model }.to_rust();
        let frontend = CallbackFrontend {
            extract,
            reset,
            ctx: extract_ctx,
        };
        match Vad::new(model, Box::new(frontend)) {
            Ok(vad) => Box::into_raw(Box::new(VoceraVad { inner: vad })),
            Err(_) => ptr::null_mut(),
        }
    }
}

/// Destroys an engine and frees its memory.
///
/// Passing `NULL` is a safe no-op. After this call the pointer is invalid.
#[unsafe(no_mangle)]
pub extern "C" fn vocera_destroy(vad: *mut VoceraVad) {
    if !vad.is_null() {
        // Safety: we created this pointer via Box::into_raw in
        // vocera_create, and the caller guarantees single ownership.
        let _ = unsafe { Box::from_raw(vad) };
    }
}

// ─── Processing ──────────────────────────────────────────────────────

/// Processes one 10 ms chunk of 16 kHz, 16-bit little-endian mono PCM.
///
/// `data` must hold at least [`vocera_bytes_per_chunk()`] bytes; only the
/// first chunk's worth is consumed.
///
/// Returns the speech probability in (0, 1), or:
/// - [`VOCERA_NO_DECISION`] while the engine cannot decide yet,
/// - [`VOCERA_INVALID_ARGUMENT`] for null pointers or a short buffer,
/// - [`VOCERA_INTERNAL_ERROR`] if a panic was caught at the boundary.
#[unsafe(no_mangle)]
pub extern "C" fn vocera_process_10ms(vad: *mut VoceraVad, data: *const u8, len: usize) -> f32 {
    ffi_guard_or!(VOCERA_INTERNAL_ERROR, {
        if vad.is_null() || data.is_null() || len < BYTES_PER_CHUNK {
            return VOCERA_INVALID_ARGUMENT;
        }
        // Safety: the caller guarantees `vad` is valid and not aliased,
        // and `data` holds at least `len >= BYTES_PER_CHUNK` bytes.
        let vad = unsafe { &mut *vad };
        let bytes = unsafe { slice::from_raw_parts(data, BYTES_PER_CHUNK) };

        let mut samples = [0i16; SAMPLES_PER_CHUNK];
        for (sample, pair) in samples.iter_mut().zip(bytes.chunks_exact(2)) {
            *sample = i16::from_le_bytes([pair[0], pair[1]]);
        }

        match vad.inner.process_10ms(&samples) {
            Some(probability) => probability,
            None => VOCERA_NO_DECISION,
        }
    })
}

/// Bytes consumed per call by [`vocera_process_10ms()`].
#[unsafe(no_mangle)]
pub extern "C" fn vocera_bytes_per_chunk() -> usize {
    BYTES_PER_CHUNK
}

/// Returns the engine to its freshly constructed state.
///
/// Re-arms warmup and resets the caller's front end via the `reset`
/// callback. Passing `NULL` is a safe no-op.
#[unsafe(no_mangle)]
pub extern "C" fn vocera_reset(vad: *mut VoceraVad) {
    if vad.is_null() {
        return;
    }
    let _ = ffi_guard_or!((), {
        // Safety: the caller guarantees the pointer is valid and not aliased.
        let vad = unsafe { &mut *vad };
        vad.inner.reset();
    });
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use vocera::common::{NUM_FEATURES, WINDOW_FRAMES};

    extern "C" fn emit_flat_frame(
        ctx: *mut c_void,
        _samples: *const i16,
        num_samples: usize,
        features_out: *mut f32,
    ) -> bool {
        assert_eq!(num_samples, SAMPLES_PER_CHUNK);
        let value = if ctx.is_null() {
            0.0
        } else {
            // Safety: tests pass a valid *mut f32 as context.
            unsafe { *ctx.cast::<f32>() }
        };
        for i in 0..NUM_FEATURES {
            // Safety: the engine hands us room for NUM_FEATURES floats.
            unsafe { *features_out.add(i) = value };
        }
        true
    }

    extern "C" fn never_ready(
        _ctx: *mut c_void,
        _samples: *const i16,
        _num_samples: usize,
        _features_out: *mut f32,
    ) -> bool {
        false
    }

    fn create_engine() -> *mut VoceraVad {
        let model = VoceraModel::zeroed();
        let vad = vocera_create(&model, Some(emit_flat_frame), ptr::null_mut(), None);
        assert!(!vad.is_null());
        vad
    }

    #[test]
    fn create_requires_model_and_callback() {
        let model = VoceraModel::zeroed();
        assert!(vocera_create(ptr::null(), Some(emit_flat_frame), ptr::null_mut(), None).is_null());
        assert!(vocera_create(&model, None, ptr::null_mut(), None).is_null());
    }

    #[test]
    fn create_rejects_non_finite_model() {
        let mut model = VoceraModel::zeroed();
        model.conv3_bias[1] = f32::NAN;
        assert!(vocera_create(&model, Some(emit_flat_frame), ptr::null_mut(), None).is_null());
    }

    #[test]
    fn short_buffer_is_invalid_argument() {
        let vad = create_engine();
        let data = [0u8; BYTES_PER_CHUNK - 2];
        assert_eq!(
            vocera_process_10ms(vad, data.as_ptr(), data.len()),
            VOCERA_INVALID_ARGUMENT
        );
        vocera_destroy(vad);
    }

    #[test]
    fn null_arguments_are_invalid() {
        let vad = create_engine();
        let data = [0u8; BYTES_PER_CHUNK];
        assert_eq!(
            vocera_process_10ms(ptr::null_mut(), data.as_ptr(), data.len()),
            VOCERA_INVALID_ARGUMENT
        );
        assert_eq!(
            vocera_process_10ms(vad, ptr::null(), BYTES_PER_CHUNK),
            VOCERA_INVALID_ARGUMENT
        );
        vocera_destroy(vad);
    }

    #[test]
    fn warmup_then_probability_then_reset() {
        let vad = create_engine();
        let data = [0u8; BYTES_PER_CHUNK];

        for chunk in 0..WINDOW_FRAMES - 1 {
            assert_eq!(
                vocera_process_10ms(vad, data.as_ptr(), data.len()),
                VOCERA_NO_DECISION,
                "chunk {chunk}"
            );
        }
        let p = vocera_process_10ms(vad, data.as_ptr(), data.len());
        assert_eq!(p, 0.5, "zero model on zero audio");

        vocera_reset(vad);
        assert_eq!(
            vocera_process_10ms(vad, data.as_ptr(), data.len()),
            VOCERA_NO_DECISION
        );
        vocera_destroy(vad);
    }

    #[test]
    fn starved_frontend_reports_no_decision() {
        let model = VoceraModel::zeroed();
        let vad = vocera_create(&model, Some(never_ready), ptr::null_mut(), None);
        assert!(!vad.is_null());
        let data = [0u8; BYTES_PER_CHUNK];
        for _ in 0..2 * WINDOW_FRAMES {
            assert_eq!(
                vocera_process_10ms(vad, data.as_ptr(), data.len()),
                VOCERA_NO_DECISION
            );
        }
        vocera_destroy(vad);
    }

    #[test]
    fn destroy_and_reset_tolerate_null() {
        vocera_destroy(ptr::null_mut());
        vocera_reset(ptr::null_mut());
    }

    #[test]
    fn chunk_size_matches_contract() {
        assert_eq!(vocera_bytes_per_chunk(), 320);
    }
}
