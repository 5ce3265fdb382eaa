//! Quote/separator-aware line tokenizer with cursor-token tracking.
//!
//! One left-to-right scan produces three kinds of spans: plain runs,
//! double-quoted runs (an unterminated quote consumes to end of line), and
//! field separators, each always emitted as its own one-byte token. Quote
//! delimiters are kept in the span offsets but excluded from materialized
//! text. With cursor tracking the scan also records which token holds the
//! cursor and the text up to it; a cursor in inter-token whitespace gets a
//! synthetic empty token so a current token always exists.

const QUOTE: u8 = b'"';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    start: usize,
    end: usize,
    text: String,
}

impl Token {
    /// Byte offset of the span start (includes a leading quote).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the span end (includes a trailing quote).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Default)]
pub struct TokenSet {
    tokens: Vec<Token>,
    current_index: Option<usize>,
    current_text: Option<String>,
}

impl TokenSet {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Materialized text of every token, in order.
    pub fn texts(&self) -> Vec<String> {
        self.tokens.iter().map(|token| token.text.clone()).collect()
    }

    /// Index of the token containing the cursor. 0 when no cursor tracking
    /// was requested.
    pub fn current_index(&self) -> usize {
        self.current_index.unwrap_or(0)
    }

    /// Text of the current token, truncated at the cursor.
    pub fn current_text(&self) -> &str {
        self.current_text.as_deref().unwrap_or("")
    }
}

/// Tokenize without cursor tracking.
pub fn tokenise(line: &[u8], separators: &[u8]) -> TokenSet {
    scan(line, None, separators)
}

/// Tokenize and determine which token contains `cursor`.
pub fn tokenise_at(line: &[u8], cursor: usize, separators: &[u8]) -> TokenSet {
    scan(line, Some(cursor), separators)
}

fn materialize(line: &[u8], start: usize, end: usize) -> String {
    String::from_utf8_lossy(&line[start..end]).into_owned()
}

#[derive(Clone, Copy)]
enum State {
    None,
    Plain(usize),
    Quoted(usize),
}

struct Scan<'a> {
    line: &'a [u8],
    cursor: Option<usize>,
    set: TokenSet,
    assigned: bool,
}

impl<'a> Scan<'a> {
    /// Push a token whose span is `start..end` and whose materialized
    /// content lives at `content_start..content_end` (they differ only for
    /// quoted tokens). Assigns the cursor on a first closed-span hit.
    fn push(&mut self, start: usize, end: usize, content_start: usize, content_end: usize) {
        let token = Token {
            start,
            end,
            text: materialize(self.line, content_start, content_end),
        };
        self.set.tokens.push(token);
        if self.assigned {
            return;
        }
        if let Some(cursor) = self.cursor {
            if cursor >= start && cursor <= end {
                let upto = cursor.clamp(content_start, content_end);
                self.set.current_index = Some(self.set.tokens.len() - 1);
                self.set.current_text = Some(materialize(self.line, content_start, upto));
                self.assigned = true;
            }
        }
    }

    fn push_empty(&mut self, at: usize) {
        self.set.tokens.push(Token {
            start: at,
            end: at,
            text: String::new(),
        });
        self.set.current_index = Some(self.set.tokens.len() - 1);
        self.set.current_text = Some(String::new());
        self.assigned = true;
    }
}

fn scan(line: &[u8], cursor: Option<usize>, separators: &[u8]) -> TokenSet {
    let mut scan = Scan {
        line,
        cursor,
        set: TokenSet::default(),
        assigned: cursor.is_none(),
    };
    let mut state = State::None;
    let mut end = line.len();

    for (index, &byte) in line.iter().enumerate() {
        if byte == b'\n' {
            end = index;
            break;
        }
        if let State::Quoted(start) = state {
            if byte == QUOTE {
                scan.push(start, index + 1, start + 1, index);
                state = State::None;
            }
            continue;
        }
        if separators.contains(&byte) {
            if let State::Plain(start) = state {
                scan.push(start, index, start, index);
            }
            scan.push(index, index + 1, index, index + 1);
            state = State::None;
        } else if byte.is_ascii_whitespace() {
            match state {
                State::Plain(start) => {
                    scan.push(start, index, start, index);
                    state = State::None;
                }
                State::None => {
                    if !scan.assigned && cursor == Some(index) {
                        scan.push_empty(index);
                    }
                }
                State::Quoted(_) => unreachable!("quoted runs are consumed above"),
            }
        } else if byte == QUOTE {
            // Quotes embedded mid-word stay part of the plain token.
            if let State::None = state {
                state = State::Quoted(index);
            }
        } else if let State::None = state {
            state = State::Plain(index);
        }
    }

    match state {
        State::Plain(start) => scan.push(start, end, start, end),
        // Unterminated quote: one token to end of line.
        State::Quoted(start) => scan.push(start, end, start + 1, end),
        State::None => {}
    }

    if !scan.assigned {
        if let Some(cursor) = cursor {
            scan.push_empty(cursor);
        }
    }

    scan.set
}
