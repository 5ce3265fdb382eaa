//! Help engine: one-shot token view plus a counted write-back channel.

use std::io::{self, Write};

use crate::core::line::LineContext;
use crate::core::tokens::{tokenise_at, TokenSet};
use crate::logging;
use crate::platform::terminal::TerminalIo;

/// Read-only view of the tokenized edit line handed to the help callback.
#[derive(Debug)]
pub struct TokenView<'a> {
    tokens: &'a TokenSet,
}

impl TokenView<'_> {
    pub fn current_token_index(&self) -> usize {
        self.tokens.current_index()
    }

    /// Text of the token containing the cursor, truncated at the cursor.
    pub fn current_token(&self) -> &str {
        self.tokens.current_text()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn token_at(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|token| token.text())
    }
}

/// User-supplied help callback. Whatever it writes to `out` lands on the
/// terminal; the edit line is redisplayed afterwards iff any bytes were
/// written. Closures with the matching signature implement this
/// automatically.
pub trait HelpProvider {
    fn help(&mut self, view: &TokenView<'_>, out: &mut dyn Write) -> io::Result<()>;
}

impl<F> HelpProvider for F
where
    F: FnMut(&TokenView<'_>, &mut dyn Write) -> io::Result<()>,
{
    fn help(&mut self, view: &TokenView<'_>, out: &mut dyn Write) -> io::Result<()> {
        self(view, out)
    }
}

struct CountingWriter<'a> {
    term: &'a mut dyn TerminalIo,
    written: usize,
}

impl Write for CountingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.term.write(buf);
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub(crate) fn run_help(
    term: &mut dyn TerminalIo,
    line: &mut LineContext,
    provider: &mut dyn HelpProvider,
    separators: &[u8],
) {
    let tokens = tokenise_at(line.buffer().bytes(), line.cursor(), separators);
    let view = TokenView { tokens: &tokens };

    let written = {
        let mut writer = CountingWriter {
            term: &mut *term,
            written: 0,
        };
        if let Err(err) = provider.help(&view, &mut writer) {
            logging::debug_log(&format!("help callback failed: {err}"));
        }
        writer.written
    };

    if written > 0 {
        line.redisplay(term);
    }
}
