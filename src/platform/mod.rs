//! Platform-specific terminal integrations.

pub mod fd;
pub mod script;
pub mod terminal;

pub use fd::FdTerminal;
pub use script::ScriptedTerminal;
pub use terminal::{RawModeGuard, ReadByte, TerminalIo};
