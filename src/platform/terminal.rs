//! Terminal driver contract and raw-mode lifecycle helpers.

use std::io;
use std::ops::{Deref, DerefMut};

use crate::logging;

/// Outcome of a single byte read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadByte {
    Byte(u8),
    TimedOut,
    Eof,
}

/// Minimal terminal interface for the editing engine.
///
/// Implementations are synchronous: `read_byte` blocks until a byte arrives,
/// the timeout elapses, or the input reaches end-of-file. Writes are
/// best-effort; failures are logged, never surfaced to the edit loop.
pub trait TerminalIo {
    /// Read one byte. A `timeout_seconds` of 0 blocks indefinitely.
    fn read_byte(&mut self, timeout_seconds: u32) -> ReadByte;

    /// Write raw bytes to the output.
    fn write(&mut self, data: &[u8]);

    /// Terminal width in columns. 0 means "not a terminal / unknown".
    fn width(&self) -> usize;

    /// Whether the input side is an interactive terminal.
    fn is_interactive(&self) -> bool;

    /// Switch the input to raw mode: no echo, no canonical buffering, no
    /// signal generation, one-byte read granularity.
    fn enter_raw_mode(&mut self) -> io::Result<()>;

    /// Restore the mode saved by the last `enter_raw_mode`.
    fn restore_mode(&mut self) -> io::Result<()>;
}

/// Scoped raw-mode bracket around one edit call.
///
/// The saved mode is restored on drop, so every exit path out of the edit
/// loop (success, cancel, timeout, EOF, error, panic in a callback) puts the
/// terminal back. Raw-mode failures leave the guard inactive and are logged;
/// editing proceeds in whatever mode resulted.
pub struct RawModeGuard<'a> {
    term: &'a mut dyn TerminalIo,
    active: bool,
}

impl<'a> RawModeGuard<'a> {
    pub fn new(term: &'a mut dyn TerminalIo, enable: bool) -> Self {
        let mut active = false;
        if enable {
            match term.enter_raw_mode() {
                Ok(()) => active = true,
                Err(err) => logging::debug_log(&format!("failed to enter raw mode: {err}")),
            }
        }
        Self { term, active }
    }

    pub fn is_raw(&self) -> bool {
        self.active
    }
}

impl<'a> Deref for RawModeGuard<'a> {
    type Target = dyn TerminalIo + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.term
    }
}

impl<'a> DerefMut for RawModeGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.term
    }
}

impl Drop for RawModeGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            if let Err(err) = self.term.restore_mode() {
                logging::debug_log(&format!("failed to restore terminal mode: {err}"));
            }
        }
    }
}
