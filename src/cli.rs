//! Command-line interface definition for wordlist-sieve
//!
//! Parses arguments and resolves them into filter options and processor
//! configuration for the library.

use crate::common::DEFAULT_COMMON_LIMIT;
use crate::processor::ProcessorConfig;
use crate::rules::FilterOptions;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Streaming wordlist classifier
///
/// Filter a wordlist by structure and weak patterns, analyze its
/// composition, or split it into fixed-size shards.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wordlist-sieve",
    author = "m0h1nd4",
    version,
    about = "Streaming wordlist filter, analyzer and splitter",
    long_about = r#"
Stream a newline-delimited wordlist once and either filter it, analyze it,
or split it into shards. Files larger than memory are fine.

EXAMPLES:
    # Keep entries of 8+ characters containing a special character
    wordlist-sieve -i corpus.txt -o strong.txt --min-length 8 --require-special

    # Drop common and structurally weak entries, removing duplicates
    wordlist-sieve -i corpus.txt -o clean.txt --exclude-common --exclude-weak-patterns --keep-unique

    # Exclude anything matching a custom regex
    wordlist-sieve -i corpus.txt -o out.txt --custom-regex "^admin"

    # Length and composition statistics only
    wordlist-sieve -i corpus.txt --analyze

    # Split into shards of one million lines: part_1.txt, part_2.txt, ...
    wordlist-sieve -i corpus.txt -o part --split 1000000
"#
)]
pub struct Args {
    /// Input wordlist
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Output file (filter mode) or shard prefix (split mode)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Minimum length in characters
    #[arg(long, value_name = "N")]
    pub min_length: Option<usize>,

    /// Maximum length in characters
    #[arg(long, value_name = "N")]
    pub max_length: Option<usize>,

    /// Require at least one uppercase letter
    #[arg(long, default_value_t = false)]
    pub require_upper: bool,

    /// Require at least one lowercase letter
    #[arg(long, default_value_t = false)]
    pub require_lower: bool,

    /// Require at least one digit
    #[arg(long, default_value_t = false)]
    pub require_digit: bool,

    /// Require at least one character outside ASCII letters and digits
    #[arg(long, default_value_t = false)]
    pub require_special: bool,

    /// Exclude entries found in the common-entries list
    #[arg(long, default_value_t = false)]
    pub exclude_common: bool,

    /// Exclude numeric runs, keyboard walks, repeated characters and short entries
    #[arg(long, default_value_t = false)]
    pub exclude_weak_patterns: bool,

    /// Exclude entries matching this regex
    #[arg(long, value_name = "REGEX")]
    pub custom_regex: Option<String>,

    /// Only write the first occurrence of each entry
    #[arg(long, default_value_t = false)]
    pub keep_unique: bool,

    /// Analyze only: print statistics, write nothing
    #[arg(long, default_value_t = false, conflicts_with = "split")]
    pub analyze: bool,

    /// Split into shards of this many lines
    #[arg(long, value_name = "LINES")]
    pub split: Option<NonZeroUsize>,

    /// Common-entries list (one entry per line)
    #[arg(long, value_name = "PATH", default_value = "top-entries.txt")]
    pub common_list: PathBuf,

    /// Number of lines read from the common-entries list
    #[arg(long, value_name = "N", default_value_t = DEFAULT_COMMON_LIMIT)]
    pub common_limit: usize,

    /// Write buffer size (e.g. "8MB")
    #[arg(long, value_name = "SIZE", default_value = "8MB")]
    pub buffer_size: String,

    /// Memory-map the input instead of buffered reads
    #[arg(long, default_value_t = false)]
    pub mmap: bool,

    /// Detect the input encoding instead of assuming UTF-8
    #[arg(long, default_value_t = false)]
    pub auto_encoding: bool,

    /// Classify entries in parallel batches
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Number of threads (default: auto-detect)
    #[arg(short = 't', long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Which pass to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Filter { output: PathBuf },
    Analyze,
    Split { prefix: PathBuf, chunk_size: NonZeroUsize },
}

impl Args {
    /// Resolve the operating mode; filter and split need an output path
    pub fn mode(&self) -> anyhow::Result<Mode> {
        if self.analyze {
            return Ok(Mode::Analyze);
        }

        let Some(ref output) = self.output else {
            anyhow::bail!("--output is required unless --analyze is given");
        };

        Ok(match self.split {
            Some(chunk_size) => Mode::Split {
                prefix: output.clone(),
                chunk_size,
            },
            None => Mode::Filter {
                output: output.clone(),
            },
        })
    }

    /// Filter options; zero lengths count as absent
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            min_length: self.min_length.filter(|&n| n > 0),
            max_length: self.max_length.filter(|&n| n > 0),
            require_upper: self.require_upper,
            require_lower: self.require_lower,
            require_digit: self.require_digit,
            require_special: self.require_special,
            exclude_common: self.exclude_common,
            exclude_weak_pattern: self.exclude_weak_patterns,
            custom_pattern: self.custom_regex.clone().filter(|p| !p.is_empty()),
            keep_unique: self.keep_unique,
        }
    }

    /// Whether the common-entries list needs to be loaded
    pub fn needs_common_list(&self) -> bool {
        self.exclude_common || self.analyze
    }

    pub fn processor_config(&self) -> anyhow::Result<ProcessorConfig> {
        Ok(ProcessorConfig {
            write_buffer: parse_size(&self.buffer_size)?,
            use_mmap: self.mmap,
            auto_detect_encoding: self.auto_encoding,
            parallel: self.parallel,
            show_progress: !self.quiet,
            ..ProcessorConfig::default()
        })
    }
}

/// Parse human-readable size string to bytes
pub fn parse_size(size_str: &str) -> anyhow::Result<usize> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(n) = size_str.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = size_str.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = size_str.strip_suffix('B') {
        (n, 1)
    } else {
        (size_str.as_str(), 1)
    };

    let num: usize = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    if num == 0 {
        anyhow::bail!("Size must be greater than zero: '{}'", size_str);
    }

    Ok(num * multiplier)
}
