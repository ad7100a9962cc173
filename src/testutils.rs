//! Helpers for tests.
//!
//! Tests should only exercise the public API in general, with the exceptions
//! provided here.
use std::cell::Cell;

thread_local! {
    /// Buffer of all debugging output logged internally while tokenizing.
    pub static OUTPUT: Cell<String> = Cell::default();
}

/// Simple debug logger for tests. Collects state-machine transitions in a
/// thread-local buffer instead of printing them; only active with
/// `debug_assertions`.
pub fn trace_log(msg: &str) {
    OUTPUT.with(|cell| {
        let mut buf = cell.take();
        buf.push_str(msg);
        buf.push('\n');

        // cap the buffer so pathological inputs don't hoard memory
        if buf.len() > 16 * 1024 * 1024 {
            buf.clear();
            buf.push_str("[trace truncated]\n");
        }

        cell.set(buf);
    });
}
