//! Best-effort diagnostics for terminal-layer failures.
//!
//! Raw-mode and write errors must never interrupt editing, so they are
//! appended to the file named by `PROMPTLINE_DEBUG_LOG` instead. With the
//! variable unset every call is a no-op.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::config::EnvConfig;

static DEBUG_SINK: Lazy<Mutex<Option<File>>> = Lazy::new(|| {
    let file = EnvConfig::from_env().debug_log.and_then(|path| {
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    Mutex::new(file)
});

/// Append one line to the debug log. A write failure disables the sink.
pub fn debug_log(message: &str) {
    let mut sink = match DEBUG_SINK.lock() {
        Ok(sink) => sink,
        Err(_) => return,
    };
    let Some(file) = sink.as_mut() else {
        return;
    };
    if writeln!(file, "{message}").is_err() {
        *sink = None;
    }
}
