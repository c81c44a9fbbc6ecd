//! # Wordlist Sieve
//!
//! Streaming filter, analyzer and splitter for newline-delimited wordlists.
//!
//! ## Features
//!
//! - **Rule filtering**: Length bounds, required character classes, common
//!   entries, weak patterns and custom exclusion regexes, ANDed together
//! - **Deduplication**: Keep only the first occurrence of each entry
//! - **Analysis**: Length and composition distributions, common and weak counts
//! - **Splitting**: Byte-exact shards of a fixed number of lines
//! - **Large file support**: One pass, bounded memory, optional memory mapping
//! - **Encoding recovery**: Undecodable lines are re-decoded, never dropped
//!
//! ## Usage
//!
//! ```bash
//! # Entries of 8+ characters with a special character
//! wordlist-sieve -i corpus.txt -o strong.txt --min-length 8 --require-special
//!
//! # Statistics only
//! wordlist-sieve -i corpus.txt --analyze
//!
//! # Shards of a million lines
//! wordlist-sieve -i corpus.txt -o part --split 1000000
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use wordlist_sieve::{CommonEntries, FilterOptions, Processor, ProcessorConfig};
//! use std::path::Path;
//!
//! let options = FilterOptions {
//!     min_length: Some(8),
//!     require_digit: true,
//!     exclude_common: true,
//!     keep_unique: true,
//!     ..Default::default()
//! };
//!
//! let processor =
//!     Processor::new(&options, CommonEntries::builtin(), ProcessorConfig::default()).unwrap();
//! let summary = processor
//!     .filter_file(Path::new("corpus.txt"), Path::new("filtered.txt"))
//!     .unwrap();
//! println!("kept {} of {}", summary.filtered, summary.total);
//! ```

pub mod classify;
pub mod cli;
pub mod common;
pub mod dedup;
pub mod error;
pub mod output;
pub mod patterns;
pub mod processor;
pub mod progress;
pub mod rules;
pub mod source;
pub mod stats;

pub use classify::{evaluate, Classifier, Composition};
pub use common::CommonEntries;
pub use error::{Result, SieveError};
pub use patterns::{WeakPatternKind, WeakPatternSet};
pub use processor::{Processor, ProcessorConfig};
pub use rules::{FilterOptions, Rule, RuleSet};
pub use source::{Entry, EntryStream};
pub use stats::{AnalysisSnapshot, FilterSummary, SplitSummary};
