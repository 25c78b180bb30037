// src/main.rs

//! Demo host: prints every terminal resize it is told about.
//!
//! Usage: `resize-notify [config.json]`

use anyhow::Result;
use libc::c_int;
use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};

use resize_notify::config::{Config, WatchMode};
use resize_notify::RegisterResizeCallback;

/// Latest size stored by the signal callback: generation in the high 32 bits,
/// rows and cols in the low two 16-bit halves.
static LAST_RESIZE: AtomicU64 = AtomicU64::new(0);

fn pack(generation: u64, rows: c_int, cols: c_int) -> u64 {
    let clamp = |v: c_int| v.clamp(0, u16::MAX as c_int) as u64;
    (generation << 32) | (clamp(rows) << 16) | clamp(cols)
}

fn unpack(word: u64) -> (u64, u16, u16) {
    (word >> 32, (word >> 16) as u16, word as u16)
}

// Runs in signal context: atomics only.
extern "C" fn on_window_resized(rows: c_int, cols: c_int) {
    let (generation, _, _) = unpack(LAST_RESIZE.load(Ordering::Acquire));
    LAST_RESIZE.store(pack(generation + 1, rows, cols), Ordering::Release);
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    info!("Configuration: {:?}", config);

    println!("Listening for resize events... (Press Ctrl+C to exit)");

    match config.mode {
        WatchMode::Signal => run_signal_mode(&config),
        WatchMode::Poll => run_poll_mode(&config),
    }
}

/// The mode actually used: without a resize signal, polling is the only way
/// this host hears about resizes.
fn effective_mode(requested: WatchMode) -> WatchMode {
    if cfg!(unix) {
        requested
    } else {
        WatchMode::Poll
    }
}

fn run_signal_mode(config: &Config) -> Result<()> {
    RegisterResizeCallback(Some(on_window_resized));

    if effective_mode(WatchMode::Signal) == WatchMode::Poll {
        warn!("No resize signal on this platform; falling back to polling");
        return run_poll_mode(config);
    }

    let mut seen_generation = 0;
    loop {
        std::thread::sleep(config.report_interval());
        let (generation, rows, cols) = unpack(LAST_RESIZE.load(Ordering::Acquire));
        if generation != seen_generation {
            seen_generation = generation;
            println!("[Signal] Terminal resized to: {} rows x {} cols", rows, cols);
        }
    }
}

#[cfg(any(unix, windows))]
fn run_poll_mode(config: &Config) -> Result<()> {
    use anyhow::Context;
    use resize_notify::watcher::{default_source, ResizeWatcher};

    let _watcher = ResizeWatcher::spawn(
        config.poll_interval(),
        default_source(),
        |size| println!("[Poll] Terminal resized to: {}", size),
    )
    .context("Failed to start resize watcher")?;

    loop {
        std::thread::park();
    }
}

#[cfg(not(any(unix, windows)))]
fn run_poll_mode(_config: &Config) -> Result<()> {
    anyhow::bail!("Poll mode needs a terminal size source, which this platform build lacks")
}
