//! Whole-store snapshot encoding.
//!
//! JSON snapshots are a plain array of records and accept files written by
//! older writers: `null` metadata or vectors load as empty, and a missing or
//! mis-sized `quantized` field is recomputed from the vector.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::vector::core::quantization::quantize;
use crate::vector::core::record::{Metadata, Record};
use crate::vector::store::config::SnapshotFormat;

#[derive(Debug, Deserialize)]
struct SnapshotRecord {
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    vector: Vec<f32>,
    #[serde(default, deserialize_with = "null_as_default")]
    quantized: Vec<i8>,
    #[serde(default, deserialize_with = "null_as_default")]
    metadata: Metadata,
    #[serde(default)]
    namespace: String,
}

impl From<SnapshotRecord> for Record {
    fn from(raw: SnapshotRecord) -> Self {
        Record {
            id: raw.id,
            vector: raw.vector,
            quantized: raw.quantized,
            metadata: raw.metadata,
            namespace: raw.namespace,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serialize the record sequence in order.
pub(crate) fn encode(records: &[Record], format: SnapshotFormat) -> Result<Vec<u8>> {
    let bytes = match format {
        SnapshotFormat::Json => serde_json::to_vec(records)?,
        SnapshotFormat::Bincode => bincode::serialize(records)?,
    };
    Ok(bytes)
}

/// Deserialize a record sequence, preserving order.
pub(crate) fn decode(bytes: &[u8], format: SnapshotFormat) -> Result<Vec<Record>> {
    let mut records: Vec<Record> = match format {
        SnapshotFormat::Json => serde_json::from_slice::<Vec<SnapshotRecord>>(bytes)?
            .into_iter()
            .map(Record::from)
            .collect(),
        SnapshotFormat::Bincode => bincode::deserialize(bytes)?,
    };

    for record in &mut records {
        if record.quantized.len() != record.vector.len() {
            record.quantized = quantize(&record.vector);
        }
    }
    Ok(records)
}

/// Write `bytes` to `path` through a synced temporary file and a rename, so
/// readers never observe a partially written snapshot.
///
/// The temporary file gets a unique name in the target's directory, so
/// concurrent writers to the same path never share it; the last rename wins.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        let mut metadata = Metadata::new();
        metadata.insert("text".to_string(), "hello".to_string());
        vec![
            Record::from_raw("a", &[1.0, 2.0, 2.0], metadata, "ns1"),
            Record::from_raw("b", &[0.0, 0.0, 0.0], Metadata::new(), ""),
        ]
    }

    #[test]
    fn test_json_and_bincode_preserve_records() {
        for format in [SnapshotFormat::Json, SnapshotFormat::Bincode] {
            let records = sample();
            let bytes = encode(&records, format).unwrap();
            assert_eq!(decode(&bytes, format).unwrap(), records);
        }
    }

    #[test]
    fn test_json_accepts_null_metadata_and_missing_quantized() {
        let json = br#"[
            {"id": "x", "vector": [0.6, 0.8], "metadata": null, "namespace": "default"},
            {"id": "y", "vector": [1.0, 0.0]}
        ]"#;

        let records = decode(json, SnapshotFormat::Json).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].metadata.is_empty());
        assert_eq!(records[0].quantized, vec![76, 102]);
        assert_eq!(records[1].namespace, "");
        assert_eq!(records[1].quantized, vec![127, 0]);
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(decode(b"{not json", SnapshotFormat::Json).is_err());
        assert!(decode(&[1, 2, 3], SnapshotFormat::Bincode).is_err());
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.json");

        write_atomic(&path, b"[]").unwrap();
        write_atomic(&path, b"[1]").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"[1]");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_relative_path() {
        let name = format!("simvec-snapshot-{}.json", std::process::id());
        let path = Path::new(&name);

        write_atomic(path, b"[]").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"[]");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_concurrent_writers_never_publish_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.json");
        let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![b'a' + i; 64 * 1024]).collect();

        std::thread::scope(|s| {
            for payload in &payloads {
                let path = &path;
                s.spawn(move || {
                    for _ in 0..10 {
                        write_atomic(path, payload).unwrap();
                    }
                });
            }
        });

        let written = std::fs::read(&path).unwrap();
        assert!(payloads.contains(&written));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
