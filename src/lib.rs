//! Terminal resize notifications for a single host callback.
//!
//! On Unix-like targets the process subscribes to SIGWINCH and the registered
//! callback is called with the new `(rows, cols)` from the signal handler. On
//! other targets registration only stores the callback and prints an advisory;
//! hosts there detect resizes themselves, for example with [`watcher`].

pub mod config;
pub mod ffi;
pub mod notifier;
pub mod os;
pub mod size;
pub mod watcher;

pub use ffi::RegisterResizeCallback;
pub use notifier::{ResizeCallback, ResizeNotifier};
pub use size::TerminalSize;
pub use watcher::{ResizeWatcher, SizeSource};
