//! The in-memory record store.
//!
//! A [`VectorStore`] owns an ordered sequence of records and an
//! identifier-to-position index behind one reader-writer lock:
//!
//! - `upsert` and `load` take the exclusive lock. An upsert replaces an
//!   existing record in place or appends a new one, so positions never move.
//! - `search`, `get`, `stats` and `save` take the shared lock. A search holds
//!   it across its whole parallel phase, so it sees one consistent snapshot
//!   and no insert can start until it finishes.
//!
//! There is no deletion. The index is always a bijection onto the positions
//! of the record sequence.

pub mod config;
pub(crate) mod snapshot;

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use ahash::AHashMap;
use log::{debug, info};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimvecError};
use crate::vector::core::distance::{is_finite, normalize};
use crate::vector::core::record::{Metadata, Record};
use crate::vector::search::collector::ScoredEntry;
use crate::vector::search::filter::SearchFilter;
use crate::vector::search::sharded::ShardedSearcher;
use crate::vector::search::{DetailedHit, SearchHit};
use crate::vector::store::config::StoreConfig;

/// Summary of the store contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub record_count: usize,
    pub dimension: Option<usize>,
    /// Record count per namespace.
    pub namespaces: BTreeMap<String, usize>,
}

#[derive(Debug, Default)]
struct StoreInner {
    records: Vec<Record>,
    index: AHashMap<String, usize>,
    dimension: Option<usize>,
}

impl StoreInner {
    /// Rebuild the index by scanning `records` in order.
    fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(records.len());
        let mut dimension = None;

        for (position, record) in records.iter().enumerate() {
            if record.id.is_empty() {
                return Err(SimvecError::snapshot(format!(
                    "record at position {position} has an empty id"
                )));
            }
            if record.vector.is_empty() {
                return Err(SimvecError::snapshot(format!(
                    "record '{}' has an empty vector",
                    record.id
                )));
            }
            match dimension {
                None => dimension = Some(record.dimension()),
                Some(expected) if expected != record.dimension() => {
                    return Err(SimvecError::snapshot(format!(
                        "record '{}' has dimension {}, expected {expected}",
                        record.id,
                        record.dimension()
                    )));
                }
                Some(_) => {}
            }
            if index.insert(record.id.clone(), position).is_some() {
                return Err(SimvecError::snapshot(format!(
                    "duplicate record id '{}'",
                    record.id
                )));
            }
        }

        Ok(Self {
            records,
            index,
            dimension,
        })
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        match self.dimension {
            Some(expected) if expected != actual => {
                Err(SimvecError::dimension_mismatch(expected, actual))
            }
            _ => Ok(()),
        }
    }
}

/// Embedded vector store with sharded cosine similarity search.
#[derive(Debug)]
pub struct VectorStore {
    config: StoreConfig,
    inner: RwLock<StoreInner>,
    searcher: ShardedSearcher,
}

impl VectorStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        let searcher = ShardedSearcher::new(config.num_workers)?;
        debug!("created store with {} search workers", searcher.num_workers());
        Ok(Self {
            config,
            inner: RwLock::new(StoreInner::default()),
            searcher,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Insert a record, or replace the record with the same id in place.
    ///
    /// The vector is normalized to unit length (a zero vector is kept as is)
    /// and quantized before the exclusive lock is taken. The replaced
    /// record's metadata and namespace are discarded, not merged.
    ///
    /// Fails if `id` is empty, if `vector` is empty or has non-finite
    /// components, or if its dimension differs from the store dimension.
    pub fn upsert(
        &self,
        id: impl Into<String>,
        vector: &[f32],
        metadata: Metadata,
        namespace: impl Into<String>,
    ) -> Result<()> {
        let id = id.into();
        if id.is_empty() {
            return Err(SimvecError::invalid_argument("record id must not be empty"));
        }
        validate_vector(vector)?;

        let record = Record::from_raw(id, vector, metadata, namespace);

        let mut inner = self.inner.write();
        inner.check_dimension(record.dimension())?;
        if inner.dimension.is_none() {
            inner.dimension = Some(record.dimension());
        }

        if let Some(&position) = inner.index.get(&record.id) {
            debug!("replacing record '{}' at position {position}", record.id);
            inner.records[position] = record;
        } else {
            let position = inner.records.len();
            debug!("appending record '{}' at position {position}", record.id);
            inner.index.insert(record.id.clone(), position);
            inner.records.push(record);
        }
        Ok(())
    }

    /// Top `k` records by cosine similarity to `query`, best first.
    ///
    /// At most `k` hits are returned; `k == 0` returns nothing. Hits with
    /// equal scores appear in unspecified order.
    pub fn search(&self, query: &[f32], k: usize, filter: &SearchFilter) -> Result<Vec<SearchHit>> {
        self.search_with(query, k, filter, |record, score| SearchHit {
            id: record.id.clone(),
            score,
        })
    }

    /// Like [`search`](Self::search), but each hit carries its record's
    /// metadata and namespace, read under the same shared lock.
    pub fn search_detailed(
        &self,
        query: &[f32],
        k: usize,
        filter: &SearchFilter,
    ) -> Result<Vec<DetailedHit>> {
        self.search_with(query, k, filter, |record, score| DetailedHit {
            id: record.id.clone(),
            score,
            metadata: record.metadata.clone(),
            namespace: record.namespace.clone(),
        })
    }

    fn search_with<H>(
        &self,
        query: &[f32],
        k: usize,
        filter: &SearchFilter,
        to_hit: impl Fn(&Record, f32) -> H,
    ) -> Result<Vec<H>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        validate_vector(query)?;
        let query = normalize(query);

        let inner = self.inner.read();
        inner.check_dimension(query.len())?;

        let ranked: Vec<ScoredEntry<usize>> =
            self.searcher.top_k(&inner.records, &query, k, filter);
        Ok(ranked
            .into_iter()
            .map(|entry| to_hit(&inner.records[entry.item], entry.score))
            .collect())
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<Record> {
        let inner = self.inner.read();
        inner
            .index
            .get(id)
            .map(|&position| inner.records[position].clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// Dimension shared by all records, `None` while the store is empty.
    pub fn dimension(&self) -> Option<usize> {
        self.inner.read().dimension
    }

    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.read();
        let mut namespaces = BTreeMap::new();
        for record in &inner.records {
            *namespaces.entry(record.namespace.clone()).or_insert(0) += 1;
        }
        StoreStats {
            record_count: inner.records.len(),
            dimension: inner.dimension,
            namespaces,
        }
    }

    /// Write a snapshot of every record to `path`.
    ///
    /// The file is replaced atomically: it holds either the previous snapshot
    /// or the new one.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let (bytes, count) = self.encode_snapshot()?;
        snapshot::write_atomic(path, &bytes)?;
        info!(
            "saved {count} records to {} ({} bytes, {})",
            path.display(),
            bytes.len(),
            self.config.snapshot_format.name()
        );
        Ok(())
    }

    /// Write a snapshot of every record to `writer`.
    pub fn save_to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let (bytes, _) = self.encode_snapshot()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Replace the store contents with the snapshot at `path`.
    ///
    /// The snapshot is decoded and validated before the exclusive lock is
    /// taken. A missing or malformed file is an error and leaves the store
    /// unchanged.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let count = self.install_snapshot(&bytes)?;
        info!("loaded {count} records from {}", path.display());
        Ok(())
    }

    /// Replace the store contents with a snapshot read from `reader`.
    pub fn load_from_reader<R: Read>(&self, mut reader: R) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.install_snapshot(&bytes)?;
        Ok(())
    }

    fn encode_snapshot(&self) -> Result<(Vec<u8>, usize)> {
        let inner = self.inner.read();
        let bytes = snapshot::encode(&inner.records, self.config.snapshot_format)?;
        Ok((bytes, inner.records.len()))
    }

    fn install_snapshot(&self, bytes: &[u8]) -> Result<usize> {
        let records = snapshot::decode(bytes, self.config.snapshot_format)?;
        let loaded = StoreInner::from_records(records)?;
        let count = loaded.records.len();
        *self.inner.write() = loaded;
        Ok(count)
    }
}

fn validate_vector(vector: &[f32]) -> Result<()> {
    if vector.is_empty() {
        return Err(SimvecError::invalid_argument("vector must not be empty"));
    }
    if !is_finite(vector) {
        return Err(SimvecError::invalid_argument(
            "vector components must be finite",
        ));
    }
    Ok(())
}
