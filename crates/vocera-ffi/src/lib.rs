//! C-compatible FFI layer for the vocera VAD engine.
//!
//! Exposes `extern "C"` functions and `#[repr(C)]` types for C and C++
//! consumers, and for host-language wrappers (Python, etc.) built on a C
//! ABI.
//!
//! # Symbol prefix
//!
//! - Functions: `vocera_*`
//! - Types: `Vocera*`
//!
//! # Thread safety
//!
//! **NOT thread-safe.** All calls on the same [`types::VoceraVad`] handle
//! must be serialized by the caller; independent streams use independent
//! handles.

mod functions;
mod panic_guard;
pub mod types;

pub use functions::*;
