//! Configuration for the vector store.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimvecError};

/// On-disk encoding of a store snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// A JSON array of records.
    #[default]
    Json,
    /// bincode-encoded list of records.
    Bincode,
}

impl SnapshotFormat {
    /// Get the name of this format.
    pub fn name(&self) -> &'static str {
        match self {
            SnapshotFormat::Json => "json",
            SnapshotFormat::Bincode => "bincode",
        }
    }

    /// Parse a snapshot format from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "bincode" | "bin" => Ok(SnapshotFormat::Bincode),
            _ => Err(SimvecError::invalid_argument(format!(
                "Unknown snapshot format: {s}"
            ))),
        }
    }

    /// Guess the format from a file extension: `.bin` and `.bincode` are
    /// bincode, anything else is JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("bin") | Some("bincode") => SnapshotFormat::Bincode,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Configuration for a [`VectorStore`](crate::vector::VectorStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Number of shard workers used by each search. Values above the number
    /// of available CPUs are clamped when the store is built.
    pub num_workers: usize,
    /// Encoding used by `save` and `load`.
    pub snapshot_format: SnapshotFormat,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get().max(1),
            snapshot_format: SnapshotFormat::default(),
        }
    }
}

impl StoreConfig {
    pub fn with_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_snapshot_format(mut self, format: SnapshotFormat) -> Self {
        self.snapshot_format = format;
        self
    }
}
