//! Rule set module
//!
//! Compiles resolved filter options into an ordered list of predicates.
//! A rule that is absent from the set is simply not applied.

use crate::error::{Result, SieveError};
use regex::Regex;
use std::fmt;

/// Filter options supplied by the caller. Absent options disable their rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub require_upper: bool,
    pub require_lower: bool,
    pub require_digit: bool,
    pub require_special: bool,
    pub exclude_common: bool,
    pub exclude_weak_pattern: bool,
    /// Regex describing entries to EXCLUDE
    pub custom_pattern: Option<String>,
    pub keep_unique: bool,
}

/// A single named pass/fail predicate
#[derive(Debug, Clone)]
pub enum Rule {
    MinLength(usize),
    MaxLength(usize),
    RequireUpper,
    RequireLower,
    RequireDigit,
    RequireSpecial,
    ExcludeCommon,
    ExcludeWeakPattern,
    CustomPattern(Regex),
}

impl Rule {
    /// Compile a caller-supplied exclusion pattern
    pub fn custom(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| SieveError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::CustomPattern(regex))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::RequireUpper => "require_upper",
            Self::RequireLower => "require_lower",
            Self::RequireDigit => "require_digit",
            Self::RequireSpecial => "require_special",
            Self::ExcludeCommon => "exclude_common",
            Self::ExcludeWeakPattern => "exclude_weak_pattern",
            Self::CustomPattern(_) => "custom_pattern",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinLength(n) => write!(f, "min_length({})", n),
            Self::MaxLength(n) => write!(f, "max_length({})", n),
            Self::CustomPattern(re) => write!(f, "custom_pattern({})", re.as_str()),
            other => f.write_str(other.name()),
        }
    }
}

/// Ordered collection of active rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Use the rules in exactly the given order
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compile filter options. Fails on a malformed custom pattern.
    pub fn from_options(options: &FilterOptions) -> Result<Self> {
        let mut rules = Vec::new();

        if let Some(n) = options.min_length {
            rules.push(Rule::MinLength(n));
        }
        if let Some(n) = options.max_length {
            rules.push(Rule::MaxLength(n));
        }
        if options.require_upper {
            rules.push(Rule::RequireUpper);
        }
        if options.require_lower {
            rules.push(Rule::RequireLower);
        }
        if options.require_digit {
            rules.push(Rule::RequireDigit);
        }
        if options.require_special {
            rules.push(Rule::RequireSpecial);
        }
        if options.exclude_common {
            rules.push(Rule::ExcludeCommon);
        }
        if options.exclude_weak_pattern {
            rules.push(Rule::ExcludeWeakPattern);
        }
        if let Some(ref pattern) = options.custom_pattern {
            if !pattern.is_empty() {
                rules.push(Rule::custom(pattern)?);
            }
        }

        Ok(Self { rules })
    }

    /// Append a rule at the end of the evaluation order
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of the active rules, in evaluation order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }
}
