//! Classifier module
//!
//! Evaluates entries against a rule set with short-circuit semantics, and
//! independently buckets entries by character-class composition.

use crate::common::CommonEntries;
use crate::patterns::WeakPatternSet;
use crate::rules::{Rule, RuleSet};
use crate::source::{char_len, Entry};
use std::fmt;

/// Which ASCII character classes occur in an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharClasses {
    pub upper: bool,
    pub lower: bool,
    pub digit: bool,
    /// Anything outside ASCII letters and digits
    pub special: bool,
}

impl CharClasses {
    pub fn scan(text: &str) -> Self {
        let mut classes = Self::default();
        for c in text.chars() {
            match c {
                'A'..='Z' => classes.upper = true,
                'a'..='z' => classes.lower = true,
                '0'..='9' => classes.digit = true,
                _ => classes.special = true,
            }
        }
        classes
    }
}

/// Mutually exclusive composition buckets, most specific first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Composition {
    MixedAll,
    MixedAlphaNum,
    MixedAlpha,
    LowerDigit,
    LowerOnly,
    UpperOnly,
    DigitOnly,
    SpecialOnly,
}

impl Composition {
    /// Every bucket, in priority order
    pub const ALL: [Composition; 8] = [
        Self::MixedAll,
        Self::MixedAlphaNum,
        Self::MixedAlpha,
        Self::LowerDigit,
        Self::LowerOnly,
        Self::UpperOnly,
        Self::DigitOnly,
        Self::SpecialOnly,
    ];

    pub fn classify(text: &str) -> Self {
        Self::from_classes(CharClasses::scan(text))
    }

    pub fn from_classes(c: CharClasses) -> Self {
        if c.upper && c.lower && c.digit && c.special {
            Self::MixedAll
        } else if c.upper && c.lower && c.digit {
            Self::MixedAlphaNum
        } else if c.upper && c.lower {
            Self::MixedAlpha
        } else if c.lower && c.digit {
            Self::LowerDigit
        } else if c.lower {
            Self::LowerOnly
        } else if c.upper {
            Self::UpperOnly
        } else if c.digit {
            Self::DigitOnly
        } else {
            Self::SpecialOnly
        }
    }

    /// Position in [`Composition::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MixedAll => "mixed_all",
            Self::MixedAlphaNum => "mixed_alpha_num",
            Self::MixedAlpha => "mixed_alpha",
            Self::LowerDigit => "lower_num",
            Self::LowerOnly => "lower_only",
            Self::UpperOnly => "upper_only",
            Self::DigitOnly => "numbers_only",
            Self::SpecialOnly => "special_only",
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view over a rule set and its reference data.
///
/// `Copy` and `Sync`, so it can be handed to worker threads freely.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    rules: &'a RuleSet,
    common: &'a CommonEntries,
    weak: &'a WeakPatternSet,
}

impl<'a> Classifier<'a> {
    pub fn new(rules: &'a RuleSet, common: &'a CommonEntries, weak: &'a WeakPatternSet) -> Self {
        Self {
            rules,
            common,
            weak,
        }
    }

    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// True iff the text passes every active rule
    #[inline]
    pub fn evaluate(&self, text: &str) -> bool {
        self.first_failure(text).is_none()
    }

    /// Index of the first failing rule, stopping at that rule
    pub fn first_failure(&self, text: &str) -> Option<usize> {
        self.rules
            .rules()
            .iter()
            .position(|rule| !self.check(rule, text))
    }

    /// Does `text` pass a single rule?
    pub fn check(&self, rule: &Rule, text: &str) -> bool {
        match rule {
            Rule::MinLength(n) => char_len(text) >= *n,
            Rule::MaxLength(n) => char_len(text) <= *n,
            Rule::RequireUpper => text.bytes().any(|b| b.is_ascii_uppercase()),
            Rule::RequireLower => text.bytes().any(|b| b.is_ascii_lowercase()),
            Rule::RequireDigit => text.bytes().any(|b| b.is_ascii_digit()),
            Rule::RequireSpecial => text.chars().any(|c| !c.is_ascii_alphanumeric()),
            Rule::ExcludeCommon => !self.common.contains(text),
            Rule::ExcludeWeakPattern => !self.weak.matches(text),
            Rule::CustomPattern(re) => !re.is_match(text),
        }
    }

    pub fn is_common(&self, text: &str) -> bool {
        self.common.contains(text)
    }

    pub fn is_weak(&self, text: &str) -> bool {
        self.weak.matches(text)
    }
}

/// Evaluate one entry against a rule set and its reference data
pub fn evaluate(
    entry: &Entry,
    rule_set: &RuleSet,
    common_set: &CommonEntries,
    weak_patterns: &WeakPatternSet,
) -> bool {
    Classifier::new(rule_set, common_set, weak_patterns).evaluate(entry.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::FilterOptions;

    fn classify_with(options: FilterOptions, text: &str) -> bool {
        let rules = RuleSet::from_options(&options).unwrap();
        let common = CommonEntries::builtin();
        let weak = WeakPatternSet::new();
        evaluate(&Entry::from_text(text), &rules, &common, &weak)
    }

    #[test]
    fn test_no_rules_accepts_everything() {
        assert!(classify_with(FilterOptions::default(), ""));
        assert!(classify_with(FilterOptions::default(), "anything"));
    }

    #[test]
    fn test_length_bounds_use_chars() {
        let options = FilterOptions {
            min_length: Some(5),
            max_length: Some(5),
            ..Default::default()
        };
        assert!(classify_with(options.clone(), "hëllo"));
        assert!(!classify_with(options.clone(), "hell"));
        assert!(!classify_with(options, "hello!"));
    }

    #[test]
    fn test_character_class_requirements() {
        let upper = FilterOptions { require_upper: true, ..Default::default() };
        let lower = FilterOptions { require_lower: true, ..Default::default() };
        let special = FilterOptions { require_special: true, ..Default::default() };

        assert!(classify_with(upper.clone(), "abcD"));
        assert!(!classify_with(upper, "abcd1"));
        assert!(classify_with(lower.clone(), "ABCd1"));
        assert!(!classify_with(lower.clone(), "ABC123!"));
        assert!(!classify_with(lower, "ÉÀÖ"));
        assert!(classify_with(special.clone(), "pass word"));
        assert!(classify_with(special.clone(), "passé"));
        assert!(!classify_with(special, "Password1"));
    }

    #[test]
    fn test_exclude_common_is_case_insensitive() {
        let options = FilterOptions { exclude_common: true, ..Default::default() };
        assert!(!classify_with(options.clone(), "PassWord"));
        assert!(classify_with(options, "password1"));
    }

    #[test]
    fn test_custom_pattern_excludes_matches() {
        let options = FilterOptions {
            custom_pattern: Some("^admin".to_string()),
            ..Default::default()
        };
        assert!(!classify_with(options.clone(), "admin2024"));
        assert!(classify_with(options, "sysadmin"));
    }

    #[test]
    fn test_first_failure_short_circuits_in_order() {
        let rules = RuleSet::new(vec![Rule::RequireDigit, Rule::MinLength(10)]);
        let common = CommonEntries::builtin();
        let weak = WeakPatternSet::new();
        let classifier = Classifier::new(&rules, &common, &weak);

        assert_eq!(classifier.first_failure("short"), Some(0));
        assert_eq!(classifier.first_failure("short1"), Some(1));
        assert_eq!(classifier.first_failure("longer12345"), None);
    }

    #[test]
    fn test_adding_rules_never_grows_accepted_set() {
        let corpus = ["abc123", "ABC123!", "aaaaaaa", "Tr0ub4dor&3", "password", "Xk29#mQ7z", ""];
        let common = CommonEntries::builtin();
        let weak = WeakPatternSet::new();

        let mut rules = RuleSet::default();
        let mut accepted: Vec<&str> = corpus.to_vec();
        for rule in [
            Rule::MinLength(6),
            Rule::RequireDigit,
            Rule::ExcludeCommon,
            Rule::ExcludeWeakPattern,
            Rule::RequireSpecial,
        ] {
            rules.push(rule);
            let classifier = Classifier::new(&rules, &common, &weak);
            let next: Vec<&str> =
                corpus.iter().copied().filter(|t| classifier.evaluate(t)).collect();
            assert!(next.iter().all(|t| accepted.contains(t)));
            accepted = next;
        }
        assert_eq!(accepted, vec!["Tr0ub4dor&3", "Xk29#mQ7z"]);
    }

    #[test]
    fn test_verdict_is_and_of_individual_rules() {
        let rules = RuleSet::from_options(&FilterOptions {
            min_length: Some(8),
            require_upper: true,
            exclude_weak_pattern: true,
            ..Default::default()
        })
        .unwrap();
        let common = CommonEntries::builtin();
        let weak = WeakPatternSet::new();
        let classifier = Classifier::new(&rules, &common, &weak);

        for text in ["Tr0ub4dor&3", "qwertyuiopA", "lowercase99", "SHORT", "Zebra_Crossing"] {
            let individually = rules.rules().iter().all(|r| classifier.check(r, text));
            assert_eq!(classifier.evaluate(text), individually, "{}", text);
        }
    }

    #[test]
    fn test_composition_buckets() {
        assert_eq!(Composition::classify("Ab1!"), Composition::MixedAll);
        assert_eq!(Composition::classify("Ab1"), Composition::MixedAlphaNum);
        assert_eq!(Composition::classify("Ab"), Composition::MixedAlpha);
        assert_eq!(Composition::classify("ab1"), Composition::LowerDigit);
        assert_eq!(Composition::classify("ab!"), Composition::LowerOnly);
        assert_eq!(Composition::classify("AB1"), Composition::UpperOnly);
        assert_eq!(Composition::classify("123"), Composition::DigitOnly);
        assert_eq!(Composition::classify("!@#"), Composition::SpecialOnly);
        assert_eq!(Composition::classify(""), Composition::SpecialOnly);
    }

    #[test]
    fn test_composition_index_matches_all() {
        for (i, bucket) in Composition::ALL.iter().enumerate() {
            assert_eq!(bucket.index(), i);
        }
    }
}
