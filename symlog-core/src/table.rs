//! Format-string table recovered from the firmware debug binary.

use std::collections::HashMap;

/// Mapping from format-string memory address to its recovered text.
///
/// Built once at session start from the debug binary's log-format section
/// and never modified afterwards. An empty table is valid: lookups simply
/// miss and every record falls back to numeric rendering.
#[derive(Debug, Clone, Default)]
pub struct FormatTable {
    entries: HashMap<u32, String>,
}

impl FormatTable {
    pub fn new() -> Self {
        FormatTable {
            entries: HashMap::new(),
        }
    }

    /// Build a table by scanning raw section content for null-terminated
    /// strings.
    ///
    /// Each non-empty string starting at byte offset `o` is keyed by
    /// `base_addr + o`, the address the firmware uses as the event id.
    /// Runs of null padding between strings are skipped. Invalid UTF-8 is
    /// replaced character-by-character instead of discarding the entry.
    pub fn from_section(base_addr: u32, data: &[u8]) -> Self {
        let mut table = FormatTable::new();
        let mut i = 0;
        while i < data.len() {
            if data[i] == 0 {
                i += 1;
                continue;
            }
            let start = i;
            while i < data.len() && data[i] != 0 {
                i += 1;
            }
            let text = String::from_utf8_lossy(&data[start..i]).into_owned();
            table.insert(base_addr.wrapping_add(start as u32), text);
            i += 1;
        }
        table
    }

    /// Insert an entry. The first entry for an address wins; later
    /// duplicates are dropped.
    pub fn insert(&mut self, addr: u32, text: String) {
        self.entries.entry(addr).or_insert(text);
    }

    /// Look up the format string for an event id.
    pub fn get(&self, event_id: u32) -> Option<&str> {
        self.entries.get(&event_id).map(String::as_str)
    }

    /// Number of recovered format strings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
