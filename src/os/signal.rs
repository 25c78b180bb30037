// src/os/signal.rs

//! SIGWINCH subscription.
//!
//! The handler runs in signal context: it may interrupt the host thread at
//! any instruction. Everything reachable from `handle_sigwinch` must be
//! async-signal-safe (no allocation, no locks, no logging).

use anyhow::{Context, Result};
use nix::errno::Errno;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

use crate::notifier::ResizeNotifier;

extern "C" fn handle_sigwinch(_signal: libc::c_int) {
    // ioctl may clobber errno of whatever code we interrupted.
    let saved_errno = Errno::last_raw();
    ResizeNotifier::global().on_resize_signal();
    Errno::set_raw(saved_errno);
}

/// Installs the SIGWINCH handler for the process.
///
/// Installing again replaces the disposition with the same handler, so
/// repeated calls never produce more than one dispatch per signal.
pub fn install_sigwinch_handler() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(handle_sigwinch),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    // SAFETY: the handler only performs async-signal-safe operations.
    unsafe { sigaction(Signal::SIGWINCH, &action) }
        .context("sigaction(SIGWINCH) failed")?;
    log::debug!("SIGWINCH handler installed");
    Ok(())
}
