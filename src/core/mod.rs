//! Core editing machinery: buffers, cursor model, decoding, history,
//! tokenizing, completion, and help.

pub mod buffer;
pub mod columns;
pub mod complete;
pub mod decoder;
pub mod help;
pub mod history;
pub mod line;
pub mod screen;
pub mod tokens;
