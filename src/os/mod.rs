// src/os/mod.rs
//
// OS glue for resize detection. Only Unix-like targets have a push
// notification for terminal size changes.

#[cfg(unix)]
pub mod signal;
#[cfg(unix)]
pub mod winsize;
