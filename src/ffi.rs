// src/ffi.rs

//! C ABI entry point for hosts that load the library dynamically.

use crate::notifier::{ResizeCallback, ResizeNotifier};

/// Registers `callback` to be called as `callback(rows, cols)` whenever the
/// controlling terminal is resized.
///
/// Replaces any previously registered callback. `NULL` is accepted and
/// disables delivery. On Unix the callback runs in signal-handler context;
/// elsewhere it is never called and a one-line advisory is printed instead.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn RegisterResizeCallback(callback: Option<ResizeCallback>) {
    ResizeNotifier::global().register(callback);
}
