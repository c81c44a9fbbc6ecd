//! Common-entries set
//!
//! A bounded, case-folded set of frequently occurring entries, loaded once
//! from an auxiliary list and read-only afterwards.

use crate::error::Result;
use crate::source::{Decoder, EntryReader, DEFAULT_READ_BUFFER};
use ahash::RandomState;
use hashbrown::HashSet;
use std::path::Path;

/// Default number of lines read from the auxiliary list
pub const DEFAULT_COMMON_LIMIT: usize = 10_000;

/// Used when no auxiliary list is available
pub const BUILTIN_COMMON: [&str; 5] = ["123456", "password", "123456789", "12345", "qwerty"];

/// Immutable membership set of common entries
#[derive(Debug, Clone)]
pub struct CommonEntries {
    set: HashSet<String, RandomState>,
}

impl Default for CommonEntries {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommonEntries {
    /// The small built-in fallback set
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_COMMON)
    }

    /// Build from arbitrary entries (case-folded on insert)
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HashSet::with_hasher(RandomState::new());
        for entry in entries {
            let folded = entry.as_ref().trim().to_lowercase();
            if !folded.is_empty() {
                set.insert(folded);
            }
        }
        Self { set }
    }

    /// Load the first `limit` lines of a list file
    pub fn load(path: &Path, limit: usize) -> Result<Self> {
        let reader = EntryReader::open(path, Decoder::default(), DEFAULT_READ_BUFFER)?;

        let mut set = HashSet::with_capacity_and_hasher(limit.min(1 << 16), RandomState::new());
        for entry in reader.take(limit) {
            let entry = entry?;
            let folded = entry.text().to_lowercase();
            if !folded.is_empty() {
                set.insert(folded);
            }
        }

        log::info!("Loaded {} common entries from {:?}", set.len(), path);
        Ok(Self { set })
    }

    /// Load from `path`, falling back to the built-in set if it is unavailable
    pub fn load_or_default(path: &Path, limit: usize) -> Self {
        match Self::load(path, limit) {
            Ok(common) => common,
            Err(e) => {
                log::warn!("{}; using built-in common entries", e);
                Self::builtin()
            }
        }
    }

    /// Case-insensitive membership test
    #[inline]
    pub fn contains(&self, text: &str) -> bool {
        if text.bytes().any(|b| b.is_ascii_uppercase()) || !text.is_ascii() {
            self.set.contains(text.to_lowercase().as_str())
        } else {
            self.set.contains(text)
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_fallback() {
        let common = CommonEntries::load_or_default(Path::new("/nonexistent/top-entries.txt"), 100);
        assert_eq!(common.len(), BUILTIN_COMMON.len());
        assert!(common.contains("qwerty"));
    }

    #[test]
    fn test_contains_is_case_folded() {
        let common = CommonEntries::from_entries(["Dragon", "monkey"]);
        assert!(common.contains("DRAGON"));
        assert!(common.contains("dragon"));
        assert!(common.contains("MonKey"));
        assert!(!common.contains("dragon1"));
    }

    #[test]
    fn test_load_respects_limit() {
        let mut file = NamedTempFile::new().unwrap();
        for word in ["alpha", "Beta", "gamma", "delta"] {
            writeln!(file, "{}", word).unwrap();
        }
        file.flush().unwrap();

        let common = CommonEntries::load(file.path(), 2).unwrap();
        assert_eq!(common.len(), 2);
        assert!(common.contains("beta"));
        assert!(!common.contains("gamma"));
    }
}
