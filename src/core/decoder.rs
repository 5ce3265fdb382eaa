//! Byte-stream input decoding: control characters and escape sequences.
//!
//! Best-effort decoder, not a validator: unrecognized sequences are silently
//! discarded. A timeout or end-of-input in the middle of a multi-byte
//! sequence aborts the whole edit call; sequences never resume across calls.

use crate::platform::terminal::{ReadByte, TerminalIo};

const ESC: u8 = 0x1b;
const BACKSPACE: u8 = 0x7f;
const BACKSPACE_ALT: u8 = 0x08;
const CTRL_C: u8 = 0x03;

/// Logical edit command decoded from the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Tab,
    Interrupt,
    Control(u8),
    Printable(u8),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    WordLeft,
    WordRight,
    RowUp,
    RowDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Key(Key),
    /// An unrecognized sequence was consumed and dropped.
    Ignored,
    TimedOut,
    Eof,
}

/// Read and classify the next logical key.
pub fn read_key(term: &mut dyn TerminalIo, timeout_seconds: u32) -> Decoded {
    let byte = match term.read_byte(timeout_seconds) {
        ReadByte::Byte(byte) => byte,
        ReadByte::TimedOut => return Decoded::TimedOut,
        ReadByte::Eof => return Decoded::Eof,
    };
    match byte {
        b'\r' | b'\n' => Decoded::Key(Key::Enter),
        BACKSPACE | BACKSPACE_ALT => Decoded::Key(Key::Backspace),
        b'\t' => Decoded::Key(Key::Tab),
        CTRL_C => Decoded::Key(Key::Interrupt),
        ESC => decode_escape(term, timeout_seconds),
        byte if byte < 0x20 => Decoded::Key(Key::Control(byte)),
        byte => Decoded::Key(Key::Printable(byte)),
    }
}

fn next_byte(term: &mut dyn TerminalIo, timeout_seconds: u32) -> Result<u8, Decoded> {
    match term.read_byte(timeout_seconds) {
        ReadByte::Byte(byte) => Ok(byte),
        ReadByte::TimedOut => Err(Decoded::TimedOut),
        ReadByte::Eof => Err(Decoded::Eof),
    }
}

fn decode_escape(term: &mut dyn TerminalIo, timeout_seconds: u32) -> Decoded {
    let byte = match next_byte(term, timeout_seconds) {
        Ok(byte) => byte,
        Err(status) => return status,
    };
    match byte {
        b'O' => {
            let command = match next_byte(term, timeout_seconds) {
                Ok(byte) => byte,
                Err(status) => return status,
            };
            match command {
                b'H' => Decoded::Key(Key::Home),
                b'F' => Decoded::Key(Key::End),
                _ => Decoded::Ignored,
            }
        }
        b'[' => decode_csi(term, timeout_seconds),
        _ => Decoded::Ignored,
    }
}

fn decode_csi(term: &mut dyn TerminalIo, timeout_seconds: u32) -> Decoded {
    let byte = match next_byte(term, timeout_seconds) {
        Ok(byte) => byte,
        Err(status) => return status,
    };
    match byte {
        b'A' => Decoded::Key(Key::Up),
        b'B' => Decoded::Key(Key::Down),
        b'C' => Decoded::Key(Key::Right),
        b'D' => Decoded::Key(Key::Left),
        b'H' => Decoded::Key(Key::Home),
        b'F' => Decoded::Key(Key::End),
        b'0'..=b'9' => decode_csi_number(term, timeout_seconds, byte),
        _ => Decoded::Ignored,
    }
}

fn decode_csi_number(term: &mut dyn TerminalIo, timeout_seconds: u32, first: u8) -> Decoded {
    let mut number = u32::from(first - b'0');
    loop {
        let byte = match next_byte(term, timeout_seconds) {
            Ok(byte) => byte,
            Err(status) => return status,
        };
        match byte {
            b'0'..=b'9' => {
                number = number
                    .saturating_mul(10)
                    .saturating_add(u32::from(byte - b'0'));
            }
            b'~' => {
                return match number {
                    1 | 7 => Decoded::Key(Key::Home),
                    2 => Decoded::Key(Key::Insert),
                    3 => Decoded::Key(Key::Delete),
                    4 | 8 => Decoded::Key(Key::End),
                    5 => Decoded::Key(Key::PageUp),
                    6 => Decoded::Key(Key::PageDown),
                    _ => Decoded::Ignored,
                };
            }
            b';' => return decode_csi_modifier(term, timeout_seconds, number),
            _ => return Decoded::Ignored,
        }
    }
}

fn decode_csi_modifier(term: &mut dyn TerminalIo, timeout_seconds: u32, number: u32) -> Decoded {
    let modifier = match next_byte(term, timeout_seconds) {
        Ok(byte) => byte,
        Err(status) => return status,
    };
    let final_byte = match next_byte(term, timeout_seconds) {
        Ok(byte) => byte,
        Err(status) => return status,
    };
    if number != 1 {
        return Decoded::Ignored;
    }
    match (modifier, final_byte) {
        // Ctrl+Arrow: word motion.
        (b'5', b'C') => Decoded::Key(Key::WordRight),
        (b'5', b'D') => Decoded::Key(Key::WordLeft),
        // Shift+Arrow: wrapped-row motion.
        (b'2', b'A') => Decoded::Key(Key::RowUp),
        (b'2', b'B') => Decoded::Key(Key::RowDown),
        _ => Decoded::Ignored,
    }
}
