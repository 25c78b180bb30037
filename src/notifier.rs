// src/notifier.rs

//! The resize notifier: one callback slot plus the OS hook that feeds it.
//!
//! The slot is a single atomic word holding a C function pointer. Writes come
//! from [`ResizeNotifier::register`] on the host thread, reads come from the
//! SIGWINCH handler, which may interrupt the host at any point. A reader sees
//! either the old or the new pointer, never a torn value.
//!
//! Only [`ResizeNotifier::global`] is wired to the OS signal. Private
//! instances are driven by their owner through [`ResizeNotifier::dispatch`].

use libc::c_int;
use log::{debug, info};
use std::io::Write;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

#[cfg(unix)]
use log::warn;
#[cfg(unix)]
use std::os::unix::io::RawFd;
#[cfg(unix)]
use std::sync::atomic::AtomicI32;

use crate::size::TerminalSize;

/// Host callback, invoked as `callback(rows, cols)`.
///
/// On Unix it runs inside the SIGWINCH handler, so it inherits the same
/// restrictions: async-signal-safe operations only.
pub type ResizeCallback = extern "C" fn(rows: c_int, cols: c_int);

/// Line printed on each registration on Windows, which has no resize signal.
pub const PLATFORM_ADVISORY: &str = "Windows: Use native console events for resize detection.";

static GLOBAL: ResizeNotifier = ResizeNotifier::new();

pub struct ResizeNotifier {
    callback: AtomicPtr<()>,
    #[cfg(unix)]
    query_fd: AtomicI32,
}

impl ResizeNotifier {
    /// An unregistered notifier that queries stdout for the terminal size.
    pub const fn new() -> Self {
        Self {
            callback: AtomicPtr::new(ptr::null_mut()),
            #[cfg(unix)]
            query_fd: AtomicI32::new(libc::STDOUT_FILENO),
        }
    }

    /// The process-wide notifier that the OS resize signal is delivered to.
    pub fn global() -> &'static ResizeNotifier {
        &GLOBAL
    }

    /// Stores `callback`, replacing any previous one, and subscribes to resize
    /// notifications.
    ///
    /// A `None` callback is stored as-is and turns later dispatches into
    /// no-ops. This never fails observably: a subscription error is logged
    /// and the callback stays stored.
    pub fn register(&self, callback: Option<ResizeCallback>) {
        self.register_with_output(callback, &mut std::io::stdout());
    }

    /// [`register`](Self::register) with the advisory line sent to `out`.
    fn register_with_output(&self, callback: Option<ResizeCallback>, out: &mut impl Write) {
        self.set_callback(callback);
        info!(
            "Resize callback {}",
            if callback.is_some() { "registered" } else { "cleared" }
        );
        self.subscribe(out);
    }

    #[cfg(unix)]
    fn subscribe(&self, _out: &mut impl Write) {
        if !ptr::eq(self, Self::global()) {
            debug!("Private ResizeNotifier: dispatch is driven by its owner, not SIGWINCH");
            return;
        }
        if let Err(e) = crate::os::signal::install_sigwinch_handler() {
            warn!("Resize notifications unavailable: {:#}", e);
        }
    }

    #[cfg(windows)]
    fn subscribe(&self, out: &mut impl Write) {
        write_advisory(out);
        debug!("No resize signal on Windows; callback stored for manual use");
    }

    #[cfg(not(any(unix, windows)))]
    fn subscribe(&self, _out: &mut impl Write) {
        debug!("No resize notification on this platform; callback stored for manual use");
    }

    /// Replaces the stored callback without touching the OS subscription.
    pub fn set_callback(&self, callback: Option<ResizeCallback>) {
        let raw = callback.map_or(ptr::null_mut(), |cb| cb as *mut ());
        self.callback.store(raw, Ordering::Release);
    }

    /// The currently stored callback, if any.
    pub fn callback(&self) -> Option<ResizeCallback> {
        let raw = self.callback.load(Ordering::Acquire);
        if raw.is_null() {
            return None;
        }
        // SAFETY: non-null values only ever come from `set_callback`, which
        // stores a `ResizeCallback`.
        Some(unsafe { std::mem::transmute::<*mut (), ResizeCallback>(raw) })
    }

    pub fn is_registered(&self) -> bool {
        !self.callback.load(Ordering::Acquire).is_null()
    }

    /// Delivers one resize to the stored callback.
    ///
    /// Does nothing when the size query failed (`None`) or no callback is
    /// stored. Returns whether the callback ran. Async-signal-safe.
    pub fn dispatch(&self, size: Option<TerminalSize>) -> bool {
        let Some(size) = size else {
            return false;
        };
        let Some(callback) = self.callback() else {
            return false;
        };
        callback(c_int::from(size.rows), c_int::from(size.cols));
        true
    }

    /// Points the size query at another terminal fd (stdout by default).
    #[cfg(unix)]
    pub fn set_query_fd(&self, fd: RawFd) {
        self.query_fd.store(fd, Ordering::Release);
    }

    #[cfg(unix)]
    pub fn query_fd(&self) -> RawFd {
        self.query_fd.load(Ordering::Acquire)
    }

    /// Body of the SIGWINCH handler: query the size, then dispatch.
    ///
    /// A failed query skips the callback.
    #[cfg(unix)]
    pub fn on_resize_signal(&self) -> bool {
        let size = crate::os::winsize::query_winsize(self.query_fd()).ok();
        self.dispatch(size)
    }
}

/// Writes [`PLATFORM_ADVISORY`] as one line. Write errors are ignored: stdout
/// may be closed and registration must not fail.
#[cfg(any(windows, test))]
fn write_advisory(out: &mut impl Write) {
    let _ = writeln!(out, "{}", PLATFORM_ADVISORY);
    let _ = out.flush();
}

impl Default for ResizeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod notifier_tests;
