//! Row-major multi-column listing for completion candidates.

use crate::platform::terminal::TerminalIo;

const COLUMN_GAP: usize = 2;

/// Print `words` in row-major columns sized to `width`. Column width is the
/// longest word plus two spacer columns; widths too small for one column
/// degrade to one word per row.
pub fn print_words_in_columns(term: &mut dyn TerminalIo, width: usize, words: &[String]) {
    if words.is_empty() {
        return;
    }
    let longest = words.iter().map(|word| word.len()).max().unwrap_or(0);
    let column_width = longest + COLUMN_GAP;
    let per_row = if width > column_width {
        width / column_width
    } else {
        1
    };
    let rows = words.len().div_ceil(per_row);

    term.write(b"\n");
    for row in 0..rows {
        let mut index = row;
        while index < words.len() {
            term.write(words[index].as_bytes());
            if index + rows < words.len() {
                let padding = column_width - words[index].len();
                term.write(&vec![b' '; padding]);
            }
            index += rows;
        }
        if row + 1 < rows {
            term.write(b"\n");
        }
    }
}
