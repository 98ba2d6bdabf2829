//! Sharded brute-force top-K search.
//!
//! The record slice is split into contiguous ranges, one per worker. Each
//! worker scans its range into its own [`TopKCollector`] and sends the
//! partial result over a bounded channel. The rayon scope returning is the
//! completion point; the partial results are then merged on the calling
//! thread by a second collector with the same admission rule.
//!
//! The caller holds the store's shared lock for the whole call, so every
//! worker sees the same records.

use std::ops::Range;

use crossbeam_channel::bounded;
use log::{debug, warn};
use rayon::ThreadPool;

use crate::error::{Result, SimvecError};
use crate::vector::core::distance::dot;
use crate::vector::core::record::Record;
use crate::vector::search::collector::{ScoredEntry, TopKCollector};
use crate::vector::search::filter::SearchFilter;

/// Runs one bounded scan per shard on a dedicated thread pool.
#[derive(Debug)]
pub struct ShardedSearcher {
    pool: ThreadPool,
    num_workers: usize,
}

impl ShardedSearcher {
    /// Create a searcher with `num_workers` shard threads, at most one per
    /// available CPU.
    pub fn new(num_workers: usize) -> Result<Self> {
        if num_workers == 0 {
            return Err(SimvecError::invalid_argument(
                "number of search workers must be at least 1",
            ));
        }

        let available = num_cpus::get().max(1);
        let num_workers = if num_workers > available {
            warn!("{num_workers} search workers requested, using {available} (available CPUs)");
            available
        } else {
            num_workers
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .thread_name(|i| format!("simvec-shard-{i}"))
            .build()
            .map_err(|e| {
                SimvecError::invalid_operation(format!("Failed to create thread pool: {e}"))
            })?;

        Ok(Self { pool, num_workers })
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Top `k` records by score against an already normalized `query`.
    ///
    /// Returns record positions with their scores, ordered by descending
    /// score. Order among equal scores is unspecified. A `k` larger than the
    /// record count returns every matching record.
    pub fn top_k(
        &self,
        records: &[Record],
        query: &[f32],
        k: usize,
        filter: &SearchFilter,
    ) -> Vec<ScoredEntry<usize>> {
        if k == 0 || records.is_empty() {
            return Vec::new();
        }
        let k = k.min(records.len());

        let ranges = shard_ranges(records.len(), self.num_workers);
        debug!(
            "searching {} records in {} shards (k={k})",
            records.len(),
            ranges.len()
        );

        if ranges.len() == 1 {
            let mut collector = TopKCollector::new(k);
            collector.extend(scan_shard(records, 0..records.len(), query, k, filter));
            return collector.into_sorted();
        }

        let (tx, rx) = bounded(ranges.len());
        self.pool.scope(|scope| {
            for range in ranges {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let partial = scan_shard(records, range, query, k, filter);
                    // The receiver outlives the scope, so this cannot fail.
                    let _ = tx.send(partial);
                });
            }
        });
        drop(tx);

        let mut merged = TopKCollector::new(k);
        for partial in rx.iter() {
            merged.extend(partial);
        }
        merged.into_sorted()
    }
}

/// Split `len` positions into at most `workers` contiguous ranges of
/// `ceil(len / workers)` elements. Ranges that would start past the end are
/// not produced.
pub(crate) fn shard_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 || workers == 0 {
        return Vec::new();
    }

    let chunk = len.div_ceil(workers);
    let mut ranges = Vec::with_capacity(workers);
    for i in 0..workers {
        let start = i * chunk;
        if start >= len {
            break;
        }
        ranges.push(start..(start + chunk).min(len));
    }
    ranges
}

fn scan_shard(
    records: &[Record],
    range: Range<usize>,
    query: &[f32],
    k: usize,
    filter: &SearchFilter,
) -> Vec<ScoredEntry<usize>> {
    let start = range.start;
    let mut collector = TopKCollector::new(k);
    for (offset, record) in records[range].iter().enumerate() {
        if !filter.matches(record) {
            continue;
        }
        collector.offer(dot(query, &record.vector), start + offset);
    }
    collector.into_entries()
}
