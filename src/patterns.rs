//! Weak-pattern set
//!
//! Fixed structural checks that mark an entry as low-entropy: literal numeric
//! runs, keyboard walks, a character repeated three or more times, and overall
//! short length. Built once and shared read-only for the life of the engine.

use regex::RegexSet;

/// Entries at or below this many characters are structurally weak
pub const SHORT_ENTRY_MAX: usize = 7;

/// Ascending and descending numeric runs (literal, not a general run detector)
const NUMERIC_SEQUENCES: [&str; 2] = [r"12345678?9?0?", r"98765432?1?0?"];

/// Keyboard-adjacency walks, matched against the lowercased entry
const KEYBOARD_SEQUENCES: [&str; 6] = [
    "qwertyuiop",
    "asdfghjkl",
    "zxcvbnm",
    "1qaz2wsx",
    "1q2w3e4r",
    "123qwe",
];

/// Which weak pattern an entry matched first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeakPatternKind {
    NumericSequence,
    ReverseNumericSequence,
    KeyboardSequence,
    RepeatedCharacters,
    ShortLength,
}

impl WeakPatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NumericSequence => "numeric_sequence",
            Self::ReverseNumericSequence => "reverse_numeric",
            Self::KeyboardSequence => "keyboard_pattern",
            Self::RepeatedCharacters => "repeated_chars",
            Self::ShortLength => "short_length",
        }
    }
}

/// Immutable collection of structural weak-pattern checks
#[derive(Debug, Clone)]
pub struct WeakPatternSet {
    sequences: RegexSet,
}

impl Default for WeakPatternSet {
    fn default() -> Self {
        Self::new()
    }
}

impl WeakPatternSet {
    pub fn new() -> Self {
        let patterns = NUMERIC_SEQUENCES.iter().chain(KEYBOARD_SEQUENCES.iter());
        // Built-in literals; a failure here is a programming error.
        let sequences = RegexSet::new(patterns).expect("built-in weak patterns compile");
        Self { sequences }
    }

    /// True if the entry matches any weak pattern
    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// The first matching pattern, checked in declaration order
    pub fn first_match(&self, text: &str) -> Option<WeakPatternKind> {
        let lowered = text.to_lowercase();
        let hits = self.sequences.matches(&lowered);
        if hits.matched(0) {
            return Some(WeakPatternKind::NumericSequence);
        }
        if hits.matched(1) {
            return Some(WeakPatternKind::ReverseNumericSequence);
        }
        if hits.matched_any() {
            return Some(WeakPatternKind::KeyboardSequence);
        }

        if has_repeated_run(text, 3) {
            return Some(WeakPatternKind::RepeatedCharacters);
        }

        let len = crate::source::char_len(text);
        if (1..=SHORT_ENTRY_MAX).contains(&len) {
            return Some(WeakPatternKind::ShortLength);
        }

        None
    }
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True if some word character occurs `min_run` or more times in a row
fn has_repeated_run(text: &str, min_run: usize) -> bool {
    let mut prev = None;
    let mut run = 0;

    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= min_run && is_word_char(c) {
            return true;
        }
    }

    false
}
