//! Deduplication for filter-mode output
//!
//! An exact, first-seen tracker scoped to a single run. Memory grows with the
//! number of distinct entries emitted.

use ahash::RandomState;
use hashbrown::HashSet;

/// Trait for deduplication implementations
pub trait Deduplicator: Send {
    /// Returns true (and records `text`) the first time it is seen,
    /// false on every later occurrence
    fn should_emit(&mut self, text: &str) -> bool;

    /// Number of distinct entries recorded
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Repeats suppressed so far
    fn duplicates(&self) -> u64;

    /// Approximate memory usage in bytes
    fn memory_usage(&self) -> usize;
}

/// In-memory exact deduplicator
pub struct ExactDeduplicator {
    seen: HashSet<Box<str>, RandomState>,
    duplicates: u64,
    bytes: usize,
}

impl ExactDeduplicator {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashSet::with_capacity_and_hasher(capacity, RandomState::new()),
            duplicates: 0,
            bytes: 0,
        }
    }
}

impl Default for ExactDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deduplicator for ExactDeduplicator {
    fn should_emit(&mut self, text: &str) -> bool {
        if self.seen.contains(text) {
            self.duplicates += 1;
            return false;
        }
        self.bytes += text.len();
        self.seen.insert(text.into());
        true
    }

    fn len(&self) -> usize {
        self.seen.len()
    }

    fn duplicates(&self) -> u64 {
        self.duplicates
    }

    fn memory_usage(&self) -> usize {
        // Box<str> header plus one control byte per bucket
        self.bytes + self.seen.capacity() * (std::mem::size_of::<Box<str>>() + 1)
    }
}

/// Pass-through used when deduplication is disabled
#[derive(Default)]
pub struct NoOpDeduplicator {
    count: usize,
}

impl NoOpDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Deduplicator for NoOpDeduplicator {
    fn should_emit(&mut self, _text: &str) -> bool {
        self.count += 1;
        true
    }

    fn len(&self) -> usize {
        self.count
    }

    fn duplicates(&self) -> u64 {
        0
    }

    fn memory_usage(&self) -> usize {
        std::mem::size_of::<usize>()
    }
}

/// Pick the tracker for a run
pub fn create_deduplicator(keep_unique: bool, expected_items: usize) -> Box<dyn Deduplicator> {
    if keep_unique {
        Box::new(ExactDeduplicator::with_capacity(expected_items))
    } else {
        Box::new(NoOpDeduplicator::new())
    }
}
