// src/os/winsize.rs

//! Terminal window size queries via `ioctl(TIOCGWINSZ)` / `ioctl(TIOCSWINSZ)`.

use anyhow::{Context, Result};
use nix::pty::Winsize;
use std::os::unix::io::RawFd;

use crate::size::TerminalSize;

nix::ioctl_read_bad!(tiocgwinsz, nix::libc::TIOCGWINSZ, Winsize);
nix::ioctl_write_ptr_bad!(tiocswinsz, nix::libc::TIOCSWINSZ, Winsize);

/// Reads the window size of the terminal behind `fd`.
///
/// Async-signal-safe: one `ioctl`, no allocation, no logging. This is the
/// form the SIGWINCH handler calls.
pub fn query_winsize(fd: RawFd) -> nix::Result<TerminalSize> {
    let mut ws = Winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    unsafe { tiocgwinsz(fd, &mut ws) }?;
    Ok(TerminalSize::from(ws))
}

/// Reads the window size of the terminal behind `fd`, with error context.
///
/// Not for use from signal handlers.
pub fn terminal_size(fd: RawFd) -> Result<TerminalSize> {
    let size = query_winsize(fd)
        .with_context(|| format!("ioctl(TIOCGWINSZ) failed for fd {}", fd))?;
    log::trace!("Terminal fd {} reports {}", fd, size);
    Ok(size)
}

/// Sets the window size of the terminal behind `fd`.
///
/// On a pty master this makes the kernel deliver SIGWINCH to the foreground
/// process group of the slave side.
pub fn set_terminal_size(fd: RawFd, size: TerminalSize) -> Result<()> {
    let ws = Winsize {
        ws_row: size.rows,
        ws_col: size.cols,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    unsafe { tiocswinsz(fd, &ws) }
        .with_context(|| format!("ioctl(TIOCSWINSZ) failed for fd {}", fd))?;
    log::trace!("Set terminal fd {} size to {}", fd, size);
    Ok(())
}
