// src/size.rs

//! Terminal dimensions as reported by the OS at the moment a resize is seen.

use std::fmt;

/// A `(rows, cols)` pair in character cells.
///
/// Values are passed through exactly as the OS reports them; a terminal that
/// reports `0x0` produces a `TerminalSize` of `0x0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TerminalSize {
    pub rows: u16,
    pub cols: u16,
}

impl TerminalSize {
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { rows, cols }
    }
}

impl fmt::Display for TerminalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows x {} cols", self.rows, self.cols)
    }
}

#[cfg(unix)]
impl From<libc::winsize> for TerminalSize {
    fn from(ws: libc::winsize) -> Self {
        Self::new(ws.ws_row, ws.ws_col)
    }
}
