//! Bounded command history with a browse cursor and a saved in-progress line.

/// Ordered oldest-to-newest store of past lines.
///
/// The browse cursor is an index into the entries, or `None` for the
/// unbrowsed bottom. The first step away from the bottom snapshots the live
/// buffer so it can be offered back when browsing returns.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    max_entries: usize,
    browse: Option<usize>,
    saved_line: Option<String>,
}

impl History {
    /// A `max_entries` of 0 means unlimited.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries,
            browse: None,
            saved_line: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn at_bottom(&self) -> bool {
        self.browse.is_none()
    }

    /// Append a line. Whitespace-only lines and exact duplicates of the
    /// newest entry are rejected; at capacity the oldest entry is evicted
    /// first. Resets the browse cursor.
    pub fn add(&mut self, line: &str) -> bool {
        if line.bytes().all(|byte| byte.is_ascii_whitespace()) {
            return false;
        }
        if self.entries.last().map(String::as_str) == Some(line) {
            return false;
        }
        if self.max_entries > 0 && self.entries.len() == self.max_entries {
            self.entries.remove(0);
        }
        self.entries.push(line.to_string());
        self.browse = None;
        true
    }

    /// Force the browse cursor back to the unbrowsed bottom.
    pub fn reset(&mut self) {
        self.browse = None;
    }

    pub fn clear_saved(&mut self) {
        self.saved_line = None;
    }

    /// Step toward the oldest entry. Leaving the bottom snapshots `live`.
    pub fn older(&mut self, live: &str) -> Option<&str> {
        match self.browse {
            None => {
                self.saved_line = Some(live.to_string());
                if self.entries.is_empty() {
                    return None;
                }
                self.browse = Some(self.entries.len() - 1);
            }
            Some(0) => return None,
            Some(index) => self.browse = Some(index - 1),
        }
        self.browse.map(|index| self.entries[index].as_str())
    }

    /// Step toward the newest entry. Falling off the newest end lands back
    /// at the bottom: the saved line is cleared, and returned when it still
    /// differs from `live`.
    pub fn newer(&mut self, live: &str) -> Option<String> {
        if let Some(index) = self.browse {
            if index + 1 < self.entries.len() {
                self.browse = Some(index + 1);
                return Some(self.entries[index + 1].clone());
            }
            self.browse = None;
        }
        match self.saved_line.take() {
            Some(saved) if saved != live => Some(saved),
            _ => None,
        }
    }
}
