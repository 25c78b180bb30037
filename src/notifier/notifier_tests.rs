// src/notifier/notifier_tests.rs

use super::{write_advisory, ResizeCallback, ResizeNotifier, PLATFORM_ADVISORY};
use crate::size::TerminalSize;
use libc::c_int;
use std::cell::RefCell;

thread_local! {
    static FIRST_CALLS: RefCell<Vec<(c_int, c_int)>> = const { RefCell::new(Vec::new()) };
    static SECOND_CALLS: RefCell<Vec<(c_int, c_int)>> = const { RefCell::new(Vec::new()) };
}

extern "C" fn record_first(rows: c_int, cols: c_int) {
    FIRST_CALLS.with(|calls| calls.borrow_mut().push((rows, cols)));
}

extern "C" fn record_second(rows: c_int, cols: c_int) {
    SECOND_CALLS.with(|calls| calls.borrow_mut().push((rows, cols)));
}

fn first_calls() -> Vec<(c_int, c_int)> {
    FIRST_CALLS.with(|calls| calls.borrow().clone())
}

fn second_calls() -> Vec<(c_int, c_int)> {
    SECOND_CALLS.with(|calls| calls.borrow().clone())
}

#[test_log::test]
fn dispatch_before_registration_is_a_noop() {
    let notifier = ResizeNotifier::new();
    assert!(!notifier.is_registered());
    assert!(!notifier.dispatch(Some(TerminalSize::new(24, 80))));
    assert!(first_calls().is_empty());
}

#[test_log::test]
fn dispatch_passes_rows_and_cols_unchanged() {
    let notifier = ResizeNotifier::new();
    notifier.register(Some(record_first));
    assert!(notifier.dispatch(Some(TerminalSize::new(40, 120))));
    assert_eq!(first_calls(), vec![(40, 120)]);
}

#[test_log::test]
fn registering_again_replaces_the_callback() {
    let notifier = ResizeNotifier::new();
    notifier.register(Some(record_first));
    notifier.register(Some(record_second));
    notifier.dispatch(Some(TerminalSize::new(30, 100)));
    assert!(first_calls().is_empty());
    assert_eq!(second_calls(), vec![(30, 100)]);
}

#[test_log::test]
fn same_callback_registered_twice_fires_once_per_resize() {
    let notifier = ResizeNotifier::new();
    notifier.register(Some(record_first));
    notifier.register(Some(record_first));
    notifier.dispatch(Some(TerminalSize::new(24, 80)));
    assert_eq!(first_calls(), vec![(24, 80)]);
}

#[test_log::test]
fn resizes_are_delivered_in_order_without_gaps() {
    let notifier = ResizeNotifier::new();
    notifier.register(Some(record_first));
    notifier.dispatch(Some(TerminalSize::new(24, 80)));
    notifier.dispatch(Some(TerminalSize::new(50, 200)));
    assert_eq!(first_calls(), vec![(24, 80), (50, 200)]);
}

#[test_log::test]
fn failed_size_query_skips_the_callback() {
    let notifier = ResizeNotifier::new();
    notifier.register(Some(record_first));
    assert!(!notifier.dispatch(None));
    assert!(first_calls().is_empty());
}

#[test_log::test]
fn empty_registration_is_stored_and_ignored() {
    let notifier = ResizeNotifier::new();
    notifier.register(Some(record_first));
    notifier.register(None);
    assert!(!notifier.is_registered());
    assert!(notifier.callback().is_none());
    assert!(!notifier.dispatch(Some(TerminalSize::new(24, 80))));
    assert!(first_calls().is_empty());
}

#[test_log::test]
fn stored_callback_round_trips_through_the_slot() {
    let notifier = ResizeNotifier::new();
    let expected: ResizeCallback = record_second;
    notifier.set_callback(Some(expected));
    let stored = notifier.callback().expect("callback should be stored");
    stored(1, 2);
    assert_eq!(second_calls(), vec![(1, 2)]);
}

#[cfg(unix)]
mod signal_body {
    use super::*;
    use crate::os::winsize::set_terminal_size;
    use nix::pty::{openpty, Winsize};
    use std::os::unix::io::AsRawFd;

    #[test_log::test]
    fn on_resize_signal_reads_the_query_fd() {
        let ws = Winsize {
            ws_row: 40,
            ws_col: 120,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        let pty = openpty(Some(&ws), None).expect("openpty failed");
        let notifier = ResizeNotifier::new();
        notifier.set_query_fd(pty.slave.as_raw_fd());
        notifier.register(Some(record_first));

        assert!(notifier.on_resize_signal());
        set_terminal_size(pty.master.as_raw_fd(), TerminalSize::new(50, 200))
            .expect("resize failed");
        assert!(notifier.on_resize_signal());

        assert_eq!(first_calls(), vec![(40, 120), (50, 200)]);
    }

    #[test_log::test]
    fn on_resize_signal_before_registration_is_a_noop() {
        let ws = Winsize {
            ws_row: 24,
            ws_col: 80,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        let pty = openpty(Some(&ws), None).expect("openpty failed");
        let notifier = ResizeNotifier::new();
        notifier.set_query_fd(pty.slave.as_raw_fd());

        assert!(!notifier.is_registered());
        assert!(!notifier.on_resize_signal());
        assert!(first_calls().is_empty());
    }

    #[test_log::test]
    fn on_resize_signal_without_terminal_skips_the_callback() {
        let file = tempfile::tempfile().expect("tempfile failed");
        let notifier = ResizeNotifier::new();
        notifier.set_query_fd(file.as_raw_fd());
        notifier.register(Some(record_first));

        assert!(!notifier.on_resize_signal());
        assert!(first_calls().is_empty());
    }

    #[test_log::test]
    fn default_query_fd_is_stdout() {
        assert_eq!(ResizeNotifier::new().query_fd(), libc::STDOUT_FILENO);
    }
}

fn advisory_lines(output: &[u8]) -> usize {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|line| *line == PLATFORM_ADVISORY)
        .count()
}

#[test_log::test]
fn advisory_is_written_as_a_single_line() {
    let mut output = Vec::new();
    write_advisory(&mut output);
    assert_eq!(String::from_utf8(output).unwrap(), format!("{}\n", PLATFORM_ADVISORY));
}

#[test_log::test]
fn advisory_is_emitted_once_per_registration_on_windows_only() {
    let notifier = ResizeNotifier::new();
    let mut output = Vec::new();
    notifier.register_with_output(Some(record_first), &mut output);
    notifier.register_with_output(Some(record_first), &mut output);

    let expected = if cfg!(windows) { 2 } else { 0 };
    assert_eq!(advisory_lines(&output), expected);
    assert!(notifier.is_registered());
    assert!(first_calls().is_empty());
}
