// src/watcher.rs

//! Polling resize detection for hosts that cannot rely on SIGWINCH.
//!
//! A background thread samples a [`SizeSource`] at a fixed interval and calls
//! the host closure only when the size changed since the previous sample.
//! Sizes that come and go between two samples are never seen; the closure
//! always gets the most recent one. This is opt-in: registering a callback on
//! the notifier never starts a watcher.
//!
//! [`default_source`] picks the stdout terminal on Unix and the console window
//! on Windows.

use anyhow::{Context, Result};
use log::*;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::io::RawFd;

use crate::size::TerminalSize;

/// Anything that can report the current terminal size.
pub trait SizeSource: Send {
    fn current_size(&mut self) -> Result<TerminalSize>;
}

impl<F> SizeSource for F
where
    F: FnMut() -> Result<TerminalSize> + Send,
{
    fn current_size(&mut self) -> Result<TerminalSize> {
        self()
    }
}

/// Size of the terminal behind a file descriptor.
#[cfg(unix)]
#[derive(Debug, Clone, Copy)]
pub struct TtySizeSource {
    fd: RawFd,
}

#[cfg(unix)]
impl TtySizeSource {
    pub fn new(fd: RawFd) -> Self {
        Self { fd }
    }

    pub fn stdout() -> Self {
        Self::new(libc::STDOUT_FILENO)
    }
}

#[cfg(unix)]
impl SizeSource for TtySizeSource {
    fn current_size(&mut self) -> Result<TerminalSize> {
        crate::os::winsize::terminal_size(self.fd)
    }
}

/// Size of the console window attached to the process.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSizeSource;

#[cfg(windows)]
impl SizeSource for ConsoleSizeSource {
    fn current_size(&mut self) -> Result<TerminalSize> {
        let (cols, rows) =
            crossterm::terminal::size().context("Failed to query console window size")?;
        Ok(TerminalSize::new(rows, cols))
    }
}

/// The terminal the process is attached to.
#[cfg(unix)]
pub fn default_source() -> TtySizeSource {
    TtySizeSource::stdout()
}

#[cfg(windows)]
pub fn default_source() -> ConsoleSizeSource {
    ConsoleSizeSource
}

/// Remembers the last sampled size and reports changes.
///
/// The first sample only sets the baseline.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last: Option<TerminalSize>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Some(size)` if `size` differs from the previous sample.
    pub fn observe(&mut self, size: TerminalSize) -> Option<TerminalSize> {
        let changed = matches!(self.last, Some(prev) if prev != size);
        self.last = Some(size);
        changed.then_some(size)
    }

    pub fn last(&self) -> Option<TerminalSize> {
        self.last
    }
}

/// Handle to a running watcher thread. Dropping it stops the thread.
pub struct ResizeWatcher {
    shutdown_tx: Option<Sender<()>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl ResizeWatcher {
    /// Spawns the watcher thread.
    ///
    /// `on_resize` runs on the watcher thread, so unlike a SIGWINCH callback
    /// it may allocate, lock and log.
    pub fn spawn<S, F>(interval: Duration, source: S, on_resize: F) -> Result<Self>
    where
        S: SizeSource + 'static,
        F: FnMut(TerminalSize) + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let thread_handle = thread::Builder::new()
            .name("resize-watcher".to_string())
            .spawn(move || Self::watcher_thread_main(interval, source, on_resize, shutdown_rx))
            .context("Failed to spawn resize watcher thread")?;

        info!("Resize watcher started (interval {:?})", interval);

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            thread_handle: Some(thread_handle),
        })
    }

    fn watcher_thread_main<S, F>(
        interval: Duration,
        mut source: S,
        mut on_resize: F,
        shutdown_rx: mpsc::Receiver<()>,
    ) where
        S: SizeSource,
        F: FnMut(TerminalSize),
    {
        let mut detector = ChangeDetector::new();
        loop {
            match source.current_size() {
                Ok(size) => {
                    if let Some(size) = detector.observe(size) {
                        debug!("Resize watcher: terminal resized to {}", size);
                        on_resize(size);
                    }
                }
                Err(e) => {
                    // Keep the previous baseline; the next good sample decides.
                    debug!("Resize watcher: size query failed: {:#}", e);
                }
            }

            match shutdown_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    debug!("Resize watcher received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Stops the watcher thread and waits for it to exit.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                error!("Resize watcher thread panicked");
            } else {
                info!("Resize watcher stopped");
            }
        }
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
