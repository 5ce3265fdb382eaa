//! Completion engine: the callback capability object and result processing.

use std::io::{self, Write};

use crate::core::columns::print_words_in_columns;
use crate::core::line::LineContext;
use crate::core::tokens::{tokenise_at, TokenSet};
use crate::logging;
use crate::platform::terminal::TerminalIo;

/// User-supplied completion callback.
///
/// The callback inspects the token context, adds candidate words, and may
/// set a unique match or move the anchor. Closures with the matching
/// signature implement this automatically.
pub trait Completer {
    fn complete(&mut self, request: &mut CompletionRequest) -> io::Result<()>;
}

impl<F> Completer for F
where
    F: FnMut(&mut CompletionRequest) -> io::Result<()>,
{
    fn complete(&mut self, request: &mut CompletionRequest) -> io::Result<()> {
        self(request)
    }
}

/// Transient capability object handed to the completion callback.
///
/// Lives for a single completion invocation; the candidate list, anchor, and
/// free-form output channel are consumed when the engine post-processes.
#[derive(Debug)]
pub struct CompletionRequest {
    tokens: TokenSet,
    candidates: Vec<String>,
    unique_match: Option<String>,
    anchor: usize,
    note: Vec<u8>,
}

impl CompletionRequest {
    pub(crate) fn new(tokens: TokenSet) -> Self {
        Self {
            tokens,
            candidates: Vec::new(),
            unique_match: None,
            anchor: 0,
            note: Vec::new(),
        }
    }

    /// Add one candidate word.
    pub fn add_candidate(&mut self, word: impl Into<String>) {
        self.candidates.push(word.into());
    }

    /// Set a single match that overrides candidate-based completion.
    pub fn set_unique_match(&mut self, word: impl Into<String>) {
        self.unique_match = Some(word.into());
    }

    /// Offset within the current token where completion text begins. Values
    /// outside the current token are ignored.
    pub fn set_anchor(&mut self, anchor: usize) {
        if anchor <= self.tokens.current_text().len() {
            self.anchor = anchor;
        }
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn unique_match(&self) -> Option<&str> {
        self.unique_match.as_deref()
    }

    /// Index of the token containing the cursor.
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

    /// Free-form output channel, printed above the candidate listing.
    pub fn writer(&mut self) -> &mut dyn Write {
        &mut self.note
    }
}

/// Length of the prefix shared by every word, compared byte-by-byte against
/// the first.
pub(crate) fn common_prefix_length(words: &[String]) -> usize {
    let first = words[0].as_bytes();
    for index in 0..first.len() {
        let expected = first.get(index);
        if words
            .iter()
            .skip(1)
            .any(|word| word.as_bytes().get(index) != expected)
        {
            return index;
        }
    }
    first.len()
}

/// The suffix to splice in for a completion, given how much of the current
/// token already sits beyond the anchor.
pub(crate) fn completion_suffix(stem_len: usize, words: &[String]) -> Option<Vec<u8>> {
    if words.is_empty() {
        return None;
    }
    if words.len() == 1 {
        let word = words[0].as_bytes();
        if word.len() < stem_len {
            return None;
        }
        return Some(word[stem_len..].to_vec());
    }
    let prefix_length = common_prefix_length(words);
    if stem_len == 0 || prefix_length <= stem_len {
        return None;
    }
    Some(words[0].as_bytes()[stem_len..prefix_length].to_vec())
}

pub(crate) fn run_completion(
    term: &mut dyn TerminalIo,
    line: &mut LineContext,
    completer: Option<&mut (dyn Completer + 'static)>,
    separators: &[u8],
) {
    let tokens = tokenise_at(line.buffer().bytes(), line.cursor(), separators);
    let mut request = CompletionRequest::new(tokens);

    let result = match completer {
        Some(callback) => callback.complete(&mut request),
        None => crate::fs_complete::complete_filenames(&mut request),
    };
    if let Err(err) = result {
        logging::debug_log(&format!("completion callback failed: {err}"));
    }

    process_results(term, line, request);
}

fn process_results(term: &mut dyn TerminalIo, line: &mut LineContext, request: CompletionRequest) {
    let CompletionRequest {
        tokens,
        mut candidates,
        unique_match,
        anchor,
        note,
    } = request;
    let stem_len = tokens.current_text().len().saturating_sub(anchor);

    if let Some(matched) = unique_match {
        if let Some(suffix) = completion_suffix(stem_len, std::slice::from_ref(&matched)) {
            line.complete_word(term, &suffix, true);
        }
        return;
    }

    let mut dirty = false;
    if !note.is_empty() {
        term.write(b"\n");
        term.write(&note);
        dirty = true;
    }

    if !candidates.is_empty() {
        let mut printed_listing = false;
        if candidates.len() > 1 {
            candidates.sort();
            print_words_in_columns(term, line.width(), &candidates);
            dirty = true;
            printed_listing = true;
        }
        if let Some(suffix) = completion_suffix(stem_len, &candidates) {
            // With a listing on screen the splice happens buffer-only; the
            // redisplay below repaints everything.
            line.complete_word(term, &suffix, !printed_listing);
        }
    }

    if dirty {
        line.redisplay(term);
    }
}
