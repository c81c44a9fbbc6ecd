//! Core processing engine
//!
//! Drives the single streaming pass for each mode: filter, analyze, split.
//! Classification may fan out across the rayon pool in batches; dedup,
//! writing and counting always happen on the driving thread in file order.

use crate::classify::Classifier;
use crate::common::CommonEntries;
use crate::dedup::{create_deduplicator, Deduplicator};
use crate::error::{Result, SieveError};
use crate::output::{OutputWriter, ShardWriter, DEFAULT_WRITE_BUFFER};
use crate::patterns::WeakPatternSet;
use crate::progress::create_bytes_progress_bar;
use crate::rules::{FilterOptions, RuleSet};
use crate::source::{open_entries, Entry, EntryStream, SourceOptions, DEFAULT_READ_BUFFER};
use crate::stats::{
    AnalysisSnapshot, EntryFacts, FilterSummary, RejectionCounter, SplitSummary, StatsAggregator,
};

use bytesize::ByteSize;
use colored::*;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Instant;

/// Entries per batch per worker thread in parallel mode
const BATCH_PER_THREAD: usize = 4096;

/// How often (in entries) the progress bar is refreshed in sequential mode
const PROGRESS_STRIDE: u64 = 8192;

/// Upper bound on the dedup capacity pre-allocated from the input size
const MAX_DEDUP_PREALLOC: usize = 1 << 22;

/// Processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub read_buffer: usize,
    pub write_buffer: usize,
    pub use_mmap: bool,
    pub auto_detect_encoding: bool,
    /// Classify batches of entries on the rayon pool
    pub parallel: bool,
    /// Entries per parallel batch (0 picks a size from the CPU count)
    pub batch_size: usize,
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            read_buffer: DEFAULT_READ_BUFFER,
            write_buffer: DEFAULT_WRITE_BUFFER,
            use_mmap: false,
            auto_detect_encoding: false,
            parallel: false,
            batch_size: 0,
            show_progress: false,
        }
    }
}

impl ProcessorConfig {
    fn source_options(&self) -> SourceOptions {
        SourceOptions {
            use_mmap: self.use_mmap,
            auto_detect_encoding: self.auto_detect_encoding,
            buffer_size: self.read_buffer,
        }
    }

    fn effective_batch_size(&self) -> usize {
        if self.batch_size > 0 {
            self.batch_size
        } else {
            BATCH_PER_THREAD * num_cpus::get().max(1)
        }
    }
}

/// Main processor
pub struct Processor {
    rules: RuleSet,
    common: CommonEntries,
    weak: WeakPatternSet,
    keep_unique: bool,
    config: ProcessorConfig,
}

impl Processor {
    /// Build from resolved filter options. A malformed custom pattern fails
    /// here, before any input is touched.
    pub fn new(
        options: &FilterOptions,
        common: CommonEntries,
        config: ProcessorConfig,
    ) -> Result<Self> {
        let rules = RuleSet::from_options(options)?;
        Ok(Self::with_rules(rules, common, options.keep_unique, config))
    }

    /// Build from an explicitly ordered rule set
    pub fn with_rules(
        rules: RuleSet,
        common: CommonEntries,
        keep_unique: bool,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            rules,
            common,
            weak: WeakPatternSet::new(),
            keep_unique,
            config,
        }
    }

    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.rules, &self.common, &self.weak)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn progress_bar(&self, total: Option<u64>, msg: &str) -> ProgressBar {
        if self.config.show_progress {
            create_bytes_progress_bar(total.unwrap_or(0), msg)
        } else {
            ProgressBar::hidden()
        }
    }

    /// Filter mode: write entries that pass every rule to `output`
    pub fn filter_file(&self, input: &Path, output: &Path) -> Result<FilterSummary> {
        let mut entries = open_entries(input, self.config.source_options())?;
        let mut writer = OutputWriter::create(output.to_path_buf(), self.config.write_buffer)?;

        log::info!("Filtering {:?} -> {:?} with rules {:?}", input, output, self.rules.names());

        let summary = self.filter_stream(&mut *entries, &mut writer)?;
        log::info!("Kept {} of {} entries", summary.filtered, summary.total);
        Ok(summary)
    }

    /// Filter an already opened stream into an already opened writer.
    ///
    /// On a read failure every entry read before it is still written, in
    /// both sequential and parallel mode, before the error is returned.
    pub fn filter_stream<S>(
        &self,
        entries: &mut S,
        writer: &mut OutputWriter,
    ) -> Result<FilterSummary>
    where
        S: EntryStream + ?Sized,
    {
        let start = Instant::now();
        let classifier = self.classifier();
        let pb = self.progress_bar(entries.total_bytes(), "Filtering...");

        let expected = entries
            .total_bytes()
            .map_or(0, |bytes| ((bytes / 10) as usize).min(MAX_DEDUP_PREALLOC));
        let mut tally = FilterTally {
            dedup: create_deduplicator(self.keep_unique, expected),
            rejections: RejectionCounter::new(self.rules.names()),
            writer,
            total: 0,
            filtered: 0,
            recovered: 0,
        };

        if self.config.parallel {
            let batch_size = self.config.effective_batch_size();
            let mut batch = Vec::with_capacity(batch_size);
            let mut failure = None;
            while failure.is_none() {
                failure = fill_batch(entries, &mut batch, batch_size);
                if batch.is_empty() {
                    break;
                }

                let verdicts: Vec<Option<usize>> = batch
                    .par_iter()
                    .map(|entry| classifier.first_failure(entry.text()))
                    .collect();

                for (entry, verdict) in batch.iter().zip(verdicts) {
                    tally.accept(entry, verdict)?;
                }
                pb.set_position(entries.bytes_consumed());
            }
            if let Some(e) = failure {
                return Err(e);
            }
        } else {
            while let Some(entry) = entries.next() {
                let entry = entry?;
                tally.accept(&entry, classifier.first_failure(entry.text()))?;
                if tally.total % PROGRESS_STRIDE == 0 {
                    pb.set_position(entries.bytes_consumed());
                }
            }
        }

        tally.writer.flush()?;
        pb.finish_with_message("Complete".green().to_string());
        if self.keep_unique {
            log::debug!(
                "Dedup tracked {} distinct entries (~{})",
                tally.dedup.len(),
                ByteSize(tally.dedup.memory_usage() as u64)
            );
        }

        Ok(FilterSummary {
            total: tally.total,
            filtered: tally.filtered,
            duplicates: tally.dedup.duplicates(),
            recovered: tally.recovered,
            bytes_read: entries.bytes_consumed(),
            rejections: tally.rejections,
            elapsed: start.elapsed(),
            output: tally.writer.path().to_path_buf(),
        })
    }

    /// Analyze mode: length, composition, common and weak-pattern counters
    pub fn analyze_file(&self, input: &Path) -> Result<AnalysisSnapshot> {
        let mut entries = open_entries(input, self.config.source_options())?;
        log::info!("Analyzing {:?}", input);

        let snapshot = self.analyze_stream(&mut *entries)?;
        log::info!("Analyzed {} entries", snapshot.total());
        Ok(snapshot)
    }

    pub fn analyze_stream<S>(&self, entries: &mut S) -> Result<AnalysisSnapshot>
    where
        S: EntryStream + ?Sized,
    {
        let classifier = self.classifier();
        let pb = self.progress_bar(entries.total_bytes(), "Analyzing...");
        let mut stats = StatsAggregator::new();

        if self.config.parallel {
            let batch_size = self.config.effective_batch_size();
            let mut batch = Vec::with_capacity(batch_size);
            let mut failure = None;
            while failure.is_none() {
                failure = fill_batch(entries, &mut batch, batch_size);
                if batch.is_empty() {
                    break;
                }

                let partial = batch
                    .par_iter()
                    .fold(StatsAggregator::new, |mut agg, entry| {
                        let facts =
                            EntryFacts::gather(entry.text(), entry.is_recovered(), &classifier);
                        agg.record(facts);
                        agg
                    })
                    .reduce(StatsAggregator::new, |mut a, b| {
                        a.merge(b);
                        a
                    });

                for (offset, entry) in batch.iter().enumerate() {
                    log_recovered(entry, stats.total() + offset as u64 + 1);
                }
                stats.merge(partial);
                pb.set_position(entries.bytes_consumed());
            }
            if let Some(e) = failure {
                return Err(e);
            }
        } else {
            while let Some(entry) = entries.next() {
                let entry = entry?;
                log_recovered(&entry, stats.total() + 1);
                stats.record(EntryFacts::gather(entry.text(), entry.is_recovered(), &classifier));
                if stats.total() % PROGRESS_STRIDE == 0 {
                    pb.set_position(entries.bytes_consumed());
                }
            }
        }

        pb.finish_with_message("Complete".green().to_string());
        Ok(stats.finish())
    }

    /// Split mode: copy the input verbatim into shards of `chunk_size` lines
    /// named `{prefix}_{n}.txt`, n starting at 1
    pub fn split_file(
        &self,
        input: &Path,
        prefix: &Path,
        chunk_size: NonZeroUsize,
    ) -> Result<SplitSummary> {
        let mut entries = open_entries(input, self.config.source_options())?;
        log::info!("Splitting {:?} into shards of {} lines", input, chunk_size);

        let summary = self.split_stream(&mut *entries, prefix, chunk_size)?;
        log::info!("Wrote {} lines into {} shards", summary.total_lines, summary.shard_count());
        Ok(summary)
    }

    pub fn split_stream<S>(
        &self,
        entries: &mut S,
        prefix: &Path,
        chunk_size: NonZeroUsize,
    ) -> Result<SplitSummary>
    where
        S: EntryStream + ?Sized,
    {
        let start = Instant::now();
        let pb = self.progress_bar(entries.total_bytes(), "Splitting...");
        let mut shards =
            ShardWriter::new(prefix.to_path_buf(), chunk_size, self.config.write_buffer);
        let mut total_lines = 0u64;

        while let Some(entry) = entries.next() {
            let entry = entry?;
            shards.write_raw(entry.raw())?;
            total_lines += 1;
            if total_lines % PROGRESS_STRIDE == 0 {
                pb.set_position(entries.bytes_consumed());
            }
        }

        let (shards, bytes_written) = shards.finish()?;
        pb.finish_with_message("Complete".green().to_string());

        Ok(SplitSummary {
            total_lines,
            bytes_written,
            shards,
            elapsed: start.elapsed(),
        })
    }
}

/// Per-run filter counters plus the sink they feed
struct FilterTally<'w> {
    dedup: Box<dyn Deduplicator>,
    rejections: RejectionCounter,
    writer: &'w mut OutputWriter,
    total: u64,
    filtered: u64,
    recovered: u64,
}

impl FilterTally<'_> {
    /// Account for one entry given its classification verdict
    fn accept(&mut self, entry: &Entry, verdict: Option<usize>) -> Result<()> {
        self.total += 1;
        if entry.is_recovered() {
            self.recovered += 1;
            log_recovered(entry, self.total);
        }

        match verdict {
            Some(rule_index) => self.rejections.record(rule_index),
            None => {
                if self.dedup.should_emit(entry.text()) {
                    self.writer.write_line(entry.text())?;
                    self.filtered += 1;
                }
            }
        }
        Ok(())
    }
}

fn log_recovered(entry: &Entry, line_no: u64) {
    if entry.is_recovered() {
        log::debug!("Line {}: invalid primary encoding, decoded with fallback", line_no);
    }
}

/// Refill `batch` with up to `size` entries. A read failure ends the fill
/// early and is handed back, leaving the entries read before it in `batch`.
fn fill_batch<S>(entries: &mut S, batch: &mut Vec<Entry>, size: usize) -> Option<SieveError>
where
    S: EntryStream + ?Sized,
{
    batch.clear();
    while batch.len() < size {
        match entries.next() {
            Some(Ok(entry)) => batch.push(entry),
            Some(Err(e)) => return Some(e),
            None => break,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Composition;
    use crate::output::shard_path;
    use crate::patterns::WeakPatternKind;
    use std::collections::VecDeque;
    use std::io::{self, Write};
    use tempfile::{NamedTempFile, TempDir};

    fn corpus(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn processor(options: &FilterOptions, config: ProcessorConfig) -> Processor {
        Processor::new(options, CommonEntries::builtin(), config).unwrap()
    }

    fn default_processor() -> Processor {
        processor(&FilterOptions::default(), ProcessorConfig::default())
    }

    fn parallel(batch_size: usize) -> ProcessorConfig {
        ProcessorConfig {
            parallel: true,
            batch_size,
            ..Default::default()
        }
    }

    fn configs() -> Vec<ProcessorConfig> {
        vec![
            ProcessorConfig::default(),
            parallel(2),
            ProcessorConfig {
                use_mmap: true,
                ..Default::default()
            },
        ]
    }

    fn run_filter(
        options: &FilterOptions,
        lines: &[&str],
        config: ProcessorConfig,
    ) -> (Vec<String>, FilterSummary) {
        let input = corpus(lines);
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.txt");

        let summary = processor(options, config).filter_file(input.path(), &output).unwrap();
        let content = std::fs::read_to_string(&output).unwrap();
        (content.lines().map(str::to_string).collect(), summary)
    }

    /// Yields the given lines, then a read error
    struct BrokenStream {
        items: VecDeque<Result<Entry>>,
        consumed: u64,
    }

    impl BrokenStream {
        fn new(lines: &[&str]) -> Self {
            let mut items: VecDeque<Result<Entry>> =
                lines.iter().map(|line| Ok(Entry::from_text(line))).collect();
            let cause = io::Error::from(io::ErrorKind::InvalidData);
            items.push_back(Err(SieveError::input("corpus.txt", cause)));
            Self { items, consumed: 0 }
        }
    }

    impl Iterator for BrokenStream {
        type Item = Result<Entry>;

        fn next(&mut self) -> Option<Self::Item> {
            let item = self.items.pop_front()?;
            if let Ok(ref entry) = item {
                self.consumed += entry.raw().len() as u64;
            }
            Some(item)
        }
    }

    impl EntryStream for BrokenStream {
        fn bytes_consumed(&self) -> u64 {
            self.consumed
        }
    }

    /// Filter `lines` (followed by a read error) into a file, returning its content
    fn filter_until_error(
        dir: &TempDir,
        name: &str,
        lines: &[&str],
        config: ProcessorConfig,
    ) -> String {
        let path = dir.path().join(name);
        let mut writer = OutputWriter::create(path.clone(), 64).unwrap();
        let err = processor(&FilterOptions::default(), config)
            .filter_stream(&mut BrokenStream::new(lines), &mut writer)
            .unwrap_err();
        assert!(matches!(err, SieveError::InputUnreadable { .. }));
        drop(writer);
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn test_min_length_and_special() {
        let options = FilterOptions {
            min_length: Some(8),
            require_special: true,
            ..Default::default()
        };
        for config in configs() {
            let lines = ["abc123", "ABC123!", "aaaaaaa", "Tr0ub4dor&3"];
            let (kept, summary) = run_filter(&options, &lines, config);
            assert_eq!(kept, vec!["Tr0ub4dor&3"]);
            assert_eq!(summary.total, 4);
            assert_eq!(summary.filtered, 1);
            assert_eq!(summary.filtered_percentage(), 25.0);
        }
    }

    #[test]
    fn test_exclude_weak_patterns() {
        let options = FilterOptions {
            exclude_weak_pattern: true,
            ..Default::default()
        };
        for config in configs() {
            let lines = ["123456789", "qwertyuiop", "Xk29#mQ7z", "aaa111"];
            let (kept, _) = run_filter(&options, &lines, config);
            assert_eq!(kept, vec!["Xk29#mQ7z"]);
        }

        let weak = WeakPatternSet::new();
        assert_eq!(weak.first_match("123456789"), Some(WeakPatternKind::NumericSequence));
        assert_eq!(weak.first_match("qwertyuiop"), Some(WeakPatternKind::KeyboardSequence));
        assert_eq!(weak.first_match("aaa111"), Some(WeakPatternKind::RepeatedCharacters));
    }

    #[test]
    fn test_keep_unique_preserves_first_seen_order() {
        let options = FilterOptions {
            keep_unique: true,
            ..Default::default()
        };
        for config in configs() {
            let lines = ["foo", "bar", "foo", "baz", "bar"];
            let (kept, summary) = run_filter(&options, &lines, config);
            assert_eq!(kept, vec!["foo", "bar", "baz"]);
            assert_eq!(summary.total, 5);
            assert_eq!(summary.duplicates, 2);
        }
    }

    #[test]
    fn test_without_dedup_repeats_are_kept() {
        let (kept, _) =
            run_filter(&FilterOptions::default(), &["foo", "foo"], ProcessorConfig::default());
        assert_eq!(kept, vec!["foo", "foo"]);
    }

    #[test]
    fn test_rejections_counted_by_first_failing_rule() {
        let options = FilterOptions {
            min_length: Some(6),
            require_digit: true,
            ..Default::default()
        };
        let lines = ["abc", "abcdefg", "abcdef1", "ab1"];
        let (_, summary) = run_filter(&options, &lines, ProcessorConfig::default());

        let rows: Vec<_> = summary.rejections.iter().collect();
        assert_eq!(rows, vec![("min_length", 2), ("require_digit", 1)]);
        assert_eq!(summary.total, summary.filtered + summary.rejections.total());
    }

    #[test]
    fn test_filter_is_idempotent_with_keep_unique() {
        let options = FilterOptions {
            min_length: Some(4),
            exclude_common: true,
            keep_unique: true,
            ..Default::default()
        };
        let lines = ["hunter2", "password", "  spaced  ", "hunter2", "abc", "ÄÖÜäöü", "zzzz"];
        let input = corpus(&lines);
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");

        let sieve = processor(&options, ProcessorConfig::default());
        sieve.filter_file(input.path(), &first).unwrap();
        sieve.filter_file(&first, &second).unwrap();

        assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
    }

    #[test]
    fn test_recovered_lines_are_counted_not_dropped() {
        let mut input = NamedTempFile::new().unwrap();
        input.write_all(b"caf\xe9\nplain\n").unwrap();
        input.flush().unwrap();
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.txt");

        let summary = default_processor().filter_file(input.path(), &output).unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.recovered, 1);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "café\nplain\n");
    }

    #[test]
    fn test_parallel_analyze_counts_recovered() {
        let mut input = NamedTempFile::new().unwrap();
        input.write_all(b"caf\xe9\nplain\nna\xefve\n").unwrap();
        input.flush().unwrap();

        for config in [ProcessorConfig::default(), parallel(2)] {
            let snap = processor(&FilterOptions::default(), config)
                .analyze_file(input.path())
                .unwrap();
            assert_eq!(snap.total(), 3);
            assert_eq!(snap.recovered_count(), 2);
        }
    }

    #[test]
    fn test_analyze_counts() {
        let lines = ["123456", "password", "Tr0ub4dor&3", "aaa111", "ABC"];
        for config in configs() {
            let input = corpus(&lines);
            let snap = processor(&FilterOptions::default(), config)
                .analyze_file(input.path())
                .unwrap();

            assert_eq!(snap.total(), 5);
            assert_eq!(snap.common_count(), 2);
            assert_eq!(snap.weak_pattern_count(), 3);
            assert_eq!(snap.length_distribution().get(&6), Some(&2));
            assert_eq!(snap.length_distribution().values().sum::<u64>(), 5);
            assert_eq!(snap.composition_distribution().map(|(_, c)| c).sum::<u64>(), 5);
            assert_eq!(snap.composition_count(Composition::MixedAll), 1);
            assert_eq!(snap.composition_count(Composition::DigitOnly), 1);
        }
    }

    #[test]
    fn test_split_into_shards() {
        let lines = ["l1", "l2", "l3", "l4", "l5", "l6", "l7"];
        let input = corpus(&lines);
        let dir = TempDir::new().unwrap();
        let prefix = dir.path().join("part");

        let summary = default_processor()
            .split_file(input.path(), &prefix, NonZeroUsize::new(3).unwrap())
            .unwrap();

        assert_eq!(summary.shard_count(), 3);
        assert_eq!(summary.total_lines, 7);
        let counts: Vec<usize> = (1..=3)
            .map(|i| std::fs::read_to_string(shard_path(&prefix, i)).unwrap().lines().count())
            .collect();
        assert_eq!(counts, vec![3, 3, 1]);
        assert_eq!(std::fs::read_to_string(shard_path(&prefix, 3)).unwrap(), "l7\n");
    }

    #[test]
    fn test_split_concatenation_is_byte_exact() {
        let mut input = NamedTempFile::new().unwrap();
        let data: &[u8] = b"\xEF\xBB\xBFfirst\r\n  padded  \n\nbad\xff\nlast-no-newline";
        input.write_all(data).unwrap();
        input.flush().unwrap();
        let dir = TempDir::new().unwrap();
        let prefix = dir.path().join("shard");

        for use_mmap in [false, true] {
            let config = ProcessorConfig {
                use_mmap,
                ..Default::default()
            };
            let summary = processor(&FilterOptions::default(), config)
                .split_file(input.path(), &prefix, NonZeroUsize::new(2).unwrap())
                .unwrap();

            let joined: Vec<u8> = summary
                .shards
                .iter()
                .flat_map(|path| std::fs::read(path).unwrap())
                .collect();
            assert_eq!(joined, data);
            assert_eq!(summary.bytes_written, data.len() as u64);
        }
    }

    #[test]
    fn test_missing_input_fails_before_output_is_created() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.txt");

        let err = default_processor()
            .filter_file(&dir.path().join("missing.txt"), &output)
            .unwrap_err();
        assert!(matches!(err, SieveError::InputNotFound { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_read_error_keeps_entries_read_before_it() {
        let dir = TempDir::new().unwrap();
        let lines = ["a", "b", "c"];

        let sequential = filter_until_error(&dir, "seq.txt", &lines, ProcessorConfig::default());
        let batched = filter_until_error(&dir, "par.txt", &lines, parallel(100));

        assert_eq!(sequential, "a\nb\nc\n");
        assert_eq!(sequential, batched);
    }

    #[test]
    fn test_read_error_after_full_parallel_batches() {
        let dir = TempDir::new().unwrap();
        let lines = ["a", "b", "c", "d", "e"];

        let written = filter_until_error(&dir, "out.txt", &lines, parallel(2));
        assert_eq!(written, "a\nb\nc\nd\ne\n");
    }

    #[test]
    fn test_invalid_pattern_fails_at_construction() {
        let options = FilterOptions {
            custom_pattern: Some("(unclosed".to_string()),
            ..Default::default()
        };
        let err = Processor::new(&options, CommonEntries::builtin(), ProcessorConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, SieveError::InvalidPattern { .. }));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let lines: Vec<String> = (0..500)
            .map(|i| match i % 5 {
                0 => format!("Pass{}!", i),
                1 => "qwerty".to_string(),
                2 => format!("user{}", i % 37),
                3 => format!("ZZ{}zz#", i * 7),
                _ => "x".repeat(i % 12),
            })
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let options = FilterOptions {
            min_length: Some(5),
            exclude_common: true,
            exclude_weak_pattern: true,
            keep_unique: true,
            ..Default::default()
        };

        let (sequential, seq_summary) = run_filter(&options, &refs, ProcessorConfig::default());
        let (batched, par_summary) = run_filter(&options, &refs, parallel(7));
        assert_eq!(sequential, batched);
        assert_eq!(seq_summary.rejections, par_summary.rejections);

        let input = corpus(&refs);
        let seq = processor(&options, ProcessorConfig::default())
            .analyze_file(input.path())
            .unwrap();
        let par = processor(&options, parallel(11)).analyze_file(input.path()).unwrap();
        assert_eq!(seq, par);
    }
}
