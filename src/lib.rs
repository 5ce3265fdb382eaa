//! promptline: an interactive line-editing engine for terminal applications.
//!
//! Turns a raw byte stream from a terminal (or a plain file) into a complete
//! input line or argument vector, with in-place multi-row-aware editing,
//! history recall, tab completion, and an on-demand help callback.
//!
//! # Public API Overview
//! - Create a [`Session`] over a terminal, configure it, and call
//!   [`Session::edit_line`] or [`Session::edit_line_as_args`].
//! - Plug in completion via [`Completer`] and help via [`HelpProvider`];
//!   [`complete_filenames`] is the built-in filename completer, exported for
//!   embedding inside user callbacks.
//! - Implement [`TerminalIo`] to drive the engine over any byte transport;
//!   [`FdTerminal`] covers raw file descriptors and [`ScriptedTerminal`]
//!   covers deterministic tests.
//!
//! One edit call occupies the calling thread for its whole duration; raw
//! mode is restored on every exit path.

pub mod config;
pub mod logging;

pub mod core;
pub mod platform;

mod fs_complete;
mod session;

/// Session entry points and configuration.
pub use crate::session::{Session, SessionConfig, Status};

/// Completion and help callback surfaces.
pub use crate::core::complete::{Completer, CompletionRequest};
pub use crate::core::help::{HelpProvider, TokenView};
pub use crate::fs_complete::complete_filenames;

/// Line, history, and tokenizer primitives.
pub use crate::core::buffer::EditBuffer;
pub use crate::core::history::History;
pub use crate::core::line::LineContext;
pub use crate::core::screen::ScreenCursor;
pub use crate::core::tokens::{tokenise, tokenise_at, Token, TokenSet};

/// Input decoding.
pub use crate::core::decoder::{read_key, Decoded, Key};

/// Terminal interfaces and implementations.
pub use crate::platform::fd::FdTerminal;
pub use crate::platform::script::ScriptedTerminal;
pub use crate::platform::terminal::{RawModeGuard, ReadByte, TerminalIo};
