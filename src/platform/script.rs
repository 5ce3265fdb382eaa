//! Scripted in-memory terminal for deterministic tests.
//!
//! Feed it input bytes (with optional timeout/EOF events spliced in), run an
//! edit call against it, and assert on the captured output. The input queue
//! yields `Eof` once exhausted.

use std::collections::VecDeque;
use std::io;

use crate::platform::terminal::{ReadByte, TerminalIo};

#[derive(Debug)]
pub struct ScriptedTerminal {
    input: VecDeque<ReadByte>,
    output: Vec<u8>,
    width: usize,
    interactive: bool,
    raw_enters: u32,
    raw_restores: u32,
}

impl ScriptedTerminal {
    /// Interactive terminal with the given column width.
    pub fn new(width: usize) -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            width,
            interactive: true,
            raw_enters: 0,
            raw_restores: 0,
        }
    }

    /// Non-interactive input, as when reading a plain file.
    pub fn non_interactive() -> Self {
        let mut term = Self::new(0);
        term.interactive = false;
        term
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().map(|&byte| ReadByte::Byte(byte)));
    }

    pub fn push_timeout(&mut self) {
        self.input.push_back(ReadByte::TimedOut);
    }

    pub fn push_eof(&mut self) {
        self.input.push_back(ReadByte::Eof);
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    pub fn raw_enters(&self) -> u32 {
        self.raw_enters
    }

    pub fn raw_restores(&self) -> u32 {
        self.raw_restores
    }

    /// Every raw-mode enter has been matched by a restore.
    pub fn raw_mode_balanced(&self) -> bool {
        self.raw_enters == self.raw_restores
    }
}

impl TerminalIo for ScriptedTerminal {
    fn read_byte(&mut self, _timeout_seconds: u32) -> ReadByte {
        self.input.pop_front().unwrap_or(ReadByte::Eof)
    }

    fn write(&mut self, data: &[u8]) {
        self.output.extend_from_slice(data);
    }

    fn width(&self) -> usize {
        self.width
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        self.raw_enters += 1;
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        self.raw_restores += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ScriptedTerminal;
    use crate::platform::terminal::{ReadByte, TerminalIo};

    #[test]
    fn input_drains_then_reports_eof() {
        let mut term = ScriptedTerminal::new(80);
        term.push_bytes(b"ab");
        term.push_timeout();
        assert_eq!(term.read_byte(0), ReadByte::Byte(b'a'));
        assert_eq!(term.read_byte(0), ReadByte::Byte(b'b'));
        assert_eq!(term.read_byte(0), ReadByte::TimedOut);
        assert_eq!(term.read_byte(0), ReadByte::Eof);
    }

    #[test]
    fn output_is_captured() {
        let mut term = ScriptedTerminal::new(80);
        term.write(b"prompt> ");
        assert_eq!(term.output_str(), "prompt> ");
    }
}
