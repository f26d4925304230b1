//! Bounded buffer of previously entered command lines.

/// Maximum number of lines the shell remembers.
pub const CAPACITY: usize = 128;

/// Fixed-capacity history of raw input lines.
///
/// Stored as a ring: `slots` grows until it reaches [`CAPACITY`], after which
/// `head` marks the oldest slot and each new entry overwrites it, so eviction
/// is O(1) and no per-entry nodes are allocated. Entries live only for the
/// process lifetime.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    slots: Vec<String>,
    /// Index of the oldest entry once the ring is full; next overwrite target.
    head: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of remembered lines, never more than [`CAPACITY`].
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Remember one input line as the most recent entry, evicting the oldest
    /// one when the buffer is full.
    pub fn record(&mut self, line: impl Into<String>) {
        let line = line.into();
        if self.slots.len() < CAPACITY {
            self.slots.push(line);
        } else {
            self.slots[self.head] = line;
            self.head = (self.head + 1) % CAPACITY;
        }
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.head = 0;
    }

    /// Entries in chronological order, oldest first.
    pub fn iter_oldest_first(&self) -> impl DoubleEndedIterator<Item = &str> {
        let filled = self.slots.len();
        (0..filled).map(move |i| {
            let idx = if filled < CAPACITY {
                i
            } else {
                (self.head + i) % CAPACITY
            };
            self.slots[idx].as_str()
        })
    }
}
