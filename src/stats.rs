//! Statistics aggregation
//!
//! Integer counters only; percentages and rates are computed from the final
//! snapshot on demand. Aggregators merge associatively so partial results
//! from parallel batches can be summed in any order.

use crate::classify::{Classifier, Composition};
use crate::source::char_len;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// `part` as a percentage of `whole` (0 when `whole` is 0)
#[inline]
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Entries per second (0 when no time has elapsed)
#[inline]
pub fn throughput(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Everything analyze mode learns about one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFacts {
    pub length: usize,
    pub composition: Composition,
    pub is_common: bool,
    pub is_weak: bool,
    pub recovered: bool,
}

impl EntryFacts {
    pub fn gather(text: &str, recovered: bool, classifier: &Classifier<'_>) -> Self {
        Self {
            length: char_len(text),
            composition: Composition::classify(text),
            is_common: classifier.is_common(text),
            is_weak: classifier.is_weak(text),
            recovered,
        }
    }
}

/// Running counters for analyze mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsAggregator {
    total: u64,
    common_count: u64,
    weak_pattern_count: u64,
    recovered_count: u64,
    lengths: BTreeMap<usize, u64>,
    composition: [u64; 8],
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, facts: EntryFacts) {
        self.total += 1;
        *self.lengths.entry(facts.length).or_insert(0) += 1;
        self.composition[facts.composition.index()] += 1;
        if facts.is_common {
            self.common_count += 1;
        }
        if facts.is_weak {
            self.weak_pattern_count += 1;
        }
        if facts.recovered {
            self.recovered_count += 1;
        }
    }

    /// Fold another aggregator's counts into this one
    pub fn merge(&mut self, other: StatsAggregator) {
        self.total += other.total;
        self.common_count += other.common_count;
        self.weak_pattern_count += other.weak_pattern_count;
        self.recovered_count += other.recovered_count;
        for (len, count) in other.lengths {
            *self.lengths.entry(len).or_insert(0) += count;
        }
        for (mine, theirs) in self.composition.iter_mut().zip(other.composition) {
            *mine += theirs;
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn finish(self) -> AnalysisSnapshot {
        AnalysisSnapshot { inner: self }
    }
}

/// Immutable result of an analyze pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSnapshot {
    inner: StatsAggregator,
}

impl AnalysisSnapshot {
    pub fn total(&self) -> u64 {
        self.inner.total
    }

    pub fn common_count(&self) -> u64 {
        self.inner.common_count
    }

    pub fn weak_pattern_count(&self) -> u64 {
        self.inner.weak_pattern_count
    }

    /// Entries that needed fallback decoding
    pub fn recovered_count(&self) -> u64 {
        self.inner.recovered_count
    }

    /// Length to count, ascending by length
    pub fn length_distribution(&self) -> &BTreeMap<usize, u64> {
        &self.inner.lengths
    }

    pub fn composition_count(&self, bucket: Composition) -> u64 {
        self.inner.composition[bucket.index()]
    }

    /// All composition buckets in priority order, including empty ones
    pub fn composition_distribution(&self) -> impl Iterator<Item = (Composition, u64)> + '_ {
        Composition::ALL
            .into_iter()
            .map(move |bucket| (bucket, self.composition_count(bucket)))
    }

    pub fn common_percentage(&self) -> f64 {
        percentage(self.common_count(), self.total())
    }

    pub fn weak_pattern_percentage(&self) -> f64 {
        percentage(self.weak_pattern_count(), self.total())
    }

    /// Share of `count` in the total, for distribution rows
    pub fn share(&self, count: u64) -> f64 {
        percentage(count, self.total())
    }
}

/// Rejections counted per rule, keyed by the first rule each entry failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionCounter {
    names: Vec<&'static str>,
    counts: Vec<u64>,
}

impl RejectionCounter {
    pub fn new(names: Vec<&'static str>) -> Self {
        let counts = vec![0; names.len()];
        Self { names, counts }
    }

    #[inline]
    pub fn record(&mut self, rule_index: usize) {
        self.counts[rule_index] += 1;
    }

    /// (rule name, rejections) in rule evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.names.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Final counters of a filter pass
#[derive(Debug, Clone)]
pub struct FilterSummary {
    pub total: u64,
    pub filtered: u64,
    pub duplicates: u64,
    pub recovered: u64,
    pub bytes_read: u64,
    pub rejections: RejectionCounter,
    pub elapsed: Duration,
    pub output: PathBuf,
}

impl FilterSummary {
    pub fn filtered_percentage(&self) -> f64 {
        percentage(self.filtered, self.total)
    }

    pub fn entries_per_second(&self) -> f64 {
        throughput(self.total, self.elapsed)
    }
}

/// Final counters of a split pass
#[derive(Debug, Clone, Default)]
pub struct SplitSummary {
    pub total_lines: u64,
    pub bytes_written: u64,
    pub shards: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl SplitSummary {
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}
