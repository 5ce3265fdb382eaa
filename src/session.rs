//! Session controller: wires the decoder, line model, history, completion,
//! and help engines into one blocking edit call.

use crate::core::complete::{self, Completer};
use crate::core::decoder::{self, Decoded, Key};
use crate::core::help::{self, HelpProvider};
use crate::core::history::History;
use crate::core::line::LineContext;
use crate::core::tokens;
use crate::platform::fd::FdTerminal;
use crate::platform::terminal::{RawModeGuard, ReadByte, TerminalIo};

/// Terminal status of one edit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    EndOfInput,
    Cancelled,
    TimedOut,
    Error,
}

/// Per-session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub history_enabled: bool,
    /// Byte echoed in place of every buffer byte; masking disables
    /// completion (password entry).
    pub mask_character: Option<u8>,
    /// Field-separator bytes handed to the tokenizer.
    pub field_separators: String,
    /// Maximum line length in bytes; 0 means unlimited.
    pub max_line_length: usize,
    /// Return a non-empty partial line when input hits end-of-file.
    pub capture_on_eof: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_enabled: true,
            mask_character: None,
            field_separators: String::new(),
            max_line_length: 0,
            capture_on_eof: true,
        }
    }
}

const fn ctrl(byte: u8) -> u8 {
    byte & 0x1f
}

const CTRL_A: u8 = ctrl(b'a');
const CTRL_B: u8 = ctrl(b'b');
const CTRL_D: u8 = ctrl(b'd');
const CTRL_E: u8 = ctrl(b'e');
const CTRL_F: u8 = ctrl(b'f');
const CTRL_K: u8 = ctrl(b'k');
const CTRL_L: u8 = ctrl(b'l');
const CTRL_T: u8 = ctrl(b't');
const CTRL_U: u8 = ctrl(b'u');
const CTRL_W: u8 = ctrl(b'w');

/// One line-editing session: a terminal, a history, configuration, and the
/// registered callbacks. Sessions are not concurrent; each edit call
/// occupies the session (and the calling thread) for its whole duration.
pub struct Session<T: TerminalIo> {
    terminal: T,
    history: History,
    config: SessionConfig,
    completer: Option<Box<dyn Completer>>,
    help: Option<Box<dyn HelpProvider>>,
    help_key: Option<u8>,
    insert_mode: bool,
}

impl Session<FdTerminal> {
    /// Session on stdin/stdout.
    pub fn stdio(history_capacity: usize) -> Self {
        Self::new(FdTerminal::stdio(), history_capacity)
    }

    pub fn from_fds(in_fd: i32, out_fd: i32, history_capacity: usize) -> Self {
        Self::new(FdTerminal::from_fds(in_fd, out_fd), history_capacity)
    }
}

impl<T: TerminalIo> Session<T> {
    pub fn new(terminal: T, history_capacity: usize) -> Self {
        Self {
            terminal,
            history: History::new(history_capacity),
            config: SessionConfig::default(),
            completer: None,
            help: None,
            help_key: None,
            insert_mode: true,
        }
    }

    /// Register a completion callback. Without one, the built-in filename
    /// completer runs.
    pub fn set_completer(&mut self, completer: Box<dyn Completer>) {
        self.completer = Some(completer);
    }

    /// Register a help callback, triggered by typing `help_key`.
    pub fn set_help(&mut self, provider: Box<dyn HelpProvider>, help_key: u8) {
        self.help = Some(provider);
        self.help_key = Some(help_key);
    }

    pub fn configure(&mut self, config: SessionConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Toggle history capture, returning the previous state.
    pub fn set_history_enabled(&mut self, enabled: bool) -> bool {
        let previous = self.config.history_enabled;
        self.config.history_enabled = enabled;
        previous
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Insert vs. overwrite. The Insert key toggles this during editing and
    /// the setting persists across edit calls.
    pub fn insert_mode(&self) -> bool {
        self.insert_mode
    }

    pub fn set_insert_mode(&mut self, insert: bool) {
        self.insert_mode = insert;
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Blocking edit call. Returns the terminal status plus the completed
    /// line on success (and, per configuration, a non-empty partial line on
    /// end-of-input).
    pub fn edit_line(&mut self, timeout_seconds: u32, prompt: &str) -> (Status, Option<String>) {
        let interactive = self.terminal.is_interactive();
        let width = if interactive { self.terminal.width() } else { 0 };
        self.history.reset();
        self.history.clear_saved();

        let line = LineContext::new(
            width,
            prompt,
            self.config.mask_character,
            self.config.max_line_length,
        );
        let mut edit = EditCall {
            term: RawModeGuard::new(&mut self.terminal, interactive),
            history: &mut self.history,
            completer: self.completer.as_deref_mut(),
            help: self.help.as_deref_mut(),
            help_key: self.help_key,
            insert_mode: &mut self.insert_mode,
            config: &self.config,
            interactive,
            timeout_seconds,
            line,
        };
        let status = edit.run();
        let line = edit.finish(status);
        (status, line)
    }

    /// Like `edit_line`, but the completed line is tokenized with the
    /// configured field separators into an argument vector.
    pub fn edit_line_as_args(
        &mut self,
        timeout_seconds: u32,
        prompt: &str,
    ) -> (Status, Option<Vec<String>>) {
        let (status, line) = self.edit_line(timeout_seconds, prompt);
        let args = line.map(|line| {
            tokens::tokenise(line.as_bytes(), self.config.field_separators.as_bytes()).texts()
        });
        (status, args)
    }
}

/// State for one in-flight edit call. Raw mode is restored when the guard
/// inside drops, on every exit path.
struct EditCall<'a> {
    term: RawModeGuard<'a>,
    history: &'a mut History,
    completer: Option<&'a mut (dyn Completer + 'static)>,
    help: Option<&'a mut (dyn HelpProvider + 'static)>,
    help_key: Option<u8>,
    insert_mode: &'a mut bool,
    config: &'a SessionConfig,
    interactive: bool,
    timeout_seconds: u32,
    line: LineContext,
}

impl EditCall<'_> {
    fn run(&mut self) -> Status {
        if self.interactive {
            self.line.print_prompt(&mut *self.term);
            loop {
                match decoder::read_key(&mut *self.term, self.timeout_seconds) {
                    Decoded::TimedOut => return Status::TimedOut,
                    Decoded::Eof => return Status::EndOfInput,
                    Decoded::Ignored => {}
                    Decoded::Key(key) => {
                        if let Some(status) = self.apply_key(key) {
                            return status;
                        }
                    }
                }
            }
        } else {
            // File input: no echo, no escape decoding; a newline completes
            // the line and every other byte is taken verbatim.
            loop {
                match self.term.read_byte(self.timeout_seconds) {
                    ReadByte::TimedOut => return Status::TimedOut,
                    ReadByte::Eof => return Status::EndOfInput,
                    ReadByte::Byte(b'\n') => return Status::Success,
                    ReadByte::Byte(byte) => self.insert_or_help(byte, false),
                }
            }
        }
    }

    fn apply_key(&mut self, key: Key) -> Option<Status> {
        match key {
            Key::Enter => {
                self.term.write(b"\n");
                return Some(Status::Success);
            }
            Key::Interrupt => return Some(Status::Cancelled),
            Key::Tab => {
                if self.config.mask_character.is_none() {
                    let completer = self.completer.as_deref_mut();
                    complete::run_completion(
                        &mut *self.term,
                        &mut self.line,
                        completer,
                        self.config.field_separators.as_bytes(),
                    );
                }
            }
            Key::Backspace => self.line.delete_left(&mut *self.term),
            Key::Delete => self.line.delete_right(&mut *self.term, true),
            Key::Left => self.line.move_cursor_left(&mut *self.term, 1),
            Key::Right => self.line.move_cursor_right(&mut *self.term, 1),
            Key::Home => self.line.move_to_start(&mut *self.term),
            Key::End => self.line.move_to_end(&mut *self.term),
            Key::Up => self.recall_older(),
            Key::Down => self.recall_newer(),
            Key::Insert => *self.insert_mode = !*self.insert_mode,
            Key::WordLeft => self.line.word_left(&mut *self.term),
            Key::WordRight => self.line.word_right(&mut *self.term),
            Key::RowUp => {
                let stride = self.line.width();
                self.line.move_cursor_left(&mut *self.term, stride);
            }
            Key::RowDown => {
                let stride = self.line.width();
                self.line.move_cursor_right(&mut *self.term, stride);
            }
            Key::PageUp | Key::PageDown => {}
            Key::Printable(byte) => self.insert_or_help(byte, true),
            Key::Control(byte) => self.apply_control(byte),
        }
        None
    }

    fn apply_control(&mut self, byte: u8) {
        match byte {
            CTRL_A => self.line.move_to_start(&mut *self.term),
            CTRL_B => self.line.move_cursor_left(&mut *self.term, 1),
            CTRL_D => self.line.delete_right(&mut *self.term, true),
            CTRL_E => self.line.move_to_end(&mut *self.term),
            CTRL_F => self.line.move_cursor_right(&mut *self.term, 1),
            CTRL_K => self.line.delete_to_end(&mut *self.term),
            CTRL_L => self.line.redisplay(&mut *self.term),
            CTRL_T => self.line.transpose(&mut *self.term),
            CTRL_U => self.line.delete_to_start(&mut *self.term),
            CTRL_W => self.line.delete_word_left(&mut *self.term),
            _ => {} // silently ignore
        }
    }

    fn insert_or_help(&mut self, byte: u8, update_terminal: bool) {
        if self.help_key == Some(byte) {
            if let Some(provider) = self.help.as_mut().map(|provider| &mut **provider) {
                help::run_help(
                    &mut *self.term,
                    &mut self.line,
                    provider,
                    self.config.field_separators.as_bytes(),
                );
            }
            return;
        }
        self.line
            .write_char(&mut *self.term, byte, *self.insert_mode, update_terminal);
    }

    fn recall_older(&mut self) {
        let live = self.line.text();
        if let Some(entry) = self.history.older(&live) {
            let entry = entry.as_bytes().to_vec();
            self.line.replace_line(&mut *self.term, &entry);
        }
    }

    fn recall_newer(&mut self) {
        let live = self.line.text();
        if let Some(entry) = self.history.newer(&live) {
            self.line.replace_line(&mut *self.term, entry.as_bytes());
        }
    }

    fn finish(self, status: Status) -> Option<String> {
        let return_line = match status {
            Status::Success => true,
            Status::EndOfInput => self.config.capture_on_eof && !self.line.is_empty(),
            Status::Cancelled | Status::TimedOut | Status::Error => false,
        };
        if !return_line {
            return None;
        }
        let should_add = self.config.history_enabled
            && self.interactive
            && self.config.mask_character.is_none();
        let text = self.line.into_line();
        if should_add {
            self.history.add(&text);
        }
        Some(text)
    }
}
