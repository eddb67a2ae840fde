//! Bounded error journal (spec §4.9): a FIFO-evicted ring of recent job
//! errors, queryable by kind for diagnostics and by export for bug reports.

use std::collections::VecDeque;

/// Default journal capacity (spec §4.9).
pub const DEFAULT_CAPACITY: usize = 100;

/// A single journaled failure.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub kind: String,
    pub message: String,
    pub batch_index: Option<usize>,
}

/// Bounded, FIFO-evicted error journal.
pub struct ErrorJournal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
}

impl ErrorJournal {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn record(&mut self, kind: impl Into<String>, message: impl Into<String>, batch_index: Option<usize>) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(JournalEntry { kind: kind.into(), message: message.into(), batch_index });
    }

    pub fn recent(&self, n: usize) -> Vec<&JournalEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    pub fn by_kind(&self, kind: &str) -> Vec<&JournalEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the journal as newline-delimited `kind: message` lines, most
    /// recent first, for inclusion in a bug report or log dump.
    pub fn export(&self) -> String {
        self.entries
            .iter()
            .rev()
            .map(|e| match e.batch_index {
                Some(i) => format!("[batch {i}] {}: {}", e.kind, e.message),
                None => format!("{}: {}", e.kind, e.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ErrorJournal {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_eviction_drops_oldest_first() {
        let mut journal = ErrorJournal::new(2);
        journal.record("transient", "first", None);
        journal.record("transient", "second", None);
        journal.record("transient", "third", None);
        assert_eq!(journal.len(), 2);
        let recent = journal.recent(10);
        assert_eq!(recent[0].message, "third");
        assert_eq!(recent[1].message, "second");
    }

    #[test]
    fn by_kind_filters() {
        let mut journal = ErrorJournal::new(10);
        journal.record("auth", "missing key", None);
        journal.record("transient", "timeout", Some(3));
        assert_eq!(journal.by_kind("auth").len(), 1);
        assert_eq!(journal.by_kind("transient")[0].batch_index, Some(3));
    }

    #[test]
    fn clear_empties_the_journal() {
        let mut journal = ErrorJournal::new(10);
        journal.record("auth", "x", None);
        journal.clear();
        assert!(journal.is_empty());
    }

    #[test]
    fn export_lists_most_recent_first() {
        let mut journal = ErrorJournal::new(10);
        journal.record("a", "one", None);
        journal.record("b", "two", Some(1));
        let exported = journal.export();
        assert_eq!(exported, "[batch 1] b: two\na: one");
    }
}
