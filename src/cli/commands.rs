//! Command implementations for the simvec CLI.
//!
//! Each command opens the snapshot named on the command line, runs against
//! the in-memory store, and writes the snapshot back if it changed anything.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use log::{debug, warn};
use serde::Deserialize;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{Result, SimvecError};
use crate::vector::{Metadata, SearchFilter, SnapshotFormat, StoreConfig, VectorStore};

/// One line of an import file.
#[derive(Debug, Deserialize)]
struct ImportLine {
    id: String,
    vector: Vec<f32>,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    namespace: String,
}

/// Execute a CLI command.
pub fn execute_command(args: SimvecArgs) -> Result<()> {
    match &args.command {
        Command::Add(add_args) => add_record(add_args, &args),
        Command::Import(import_args) => import_records(import_args, &args),
        Command::Search(search_args) => search_records(search_args, &args),
        Command::Get(get_args) => get_record(get_args, &args),
        Command::Stats(stats_args) => show_stats(stats_args, &args),
    }
}

/// Build the store configuration from global flags.
pub fn store_config(snapshot: &Path, cli_args: &SimvecArgs) -> Result<StoreConfig> {
    let mut config = StoreConfig::default();
    if let Some(workers) = cli_args.workers {
        config = config.with_workers(workers);
    }
    let format = match &cli_args.snapshot_format {
        Some(name) => SnapshotFormat::parse_str(name)?,
        None => SnapshotFormat::from_path(snapshot),
    };
    Ok(config.with_snapshot_format(format))
}

/// Open the store backed by `snapshot`. A missing snapshot yields an empty
/// store; an unreadable or malformed one is an error.
pub fn open_store(snapshot: &Path, cli_args: &SimvecArgs) -> Result<VectorStore> {
    let store = VectorStore::with_config(store_config(snapshot, cli_args)?)?;
    if snapshot.exists() {
        store.load(snapshot)?;
    } else {
        warn!(
            "snapshot {} not found, starting with an empty store",
            snapshot.display()
        );
    }
    Ok(store)
}

fn add_record(args: &AddArgs, cli_args: &SimvecArgs) -> Result<()> {
    let store = open_store(&args.snapshot, cli_args)?;
    let metadata: Metadata = args.metadata.iter().cloned().collect();

    store.upsert(args.id.as_str(), &args.vector, metadata, args.namespace.as_str())?;
    store.save(&args.snapshot)?;

    output_result(
        "Record stored successfully",
        &AddResult {
            id: args.id.clone(),
            total_records: store.len(),
        },
        cli_args,
    )
}

fn import_records(args: &ImportArgs, cli_args: &SimvecArgs) -> Result<()> {
    let store = open_store(&args.snapshot, cli_args)?;
    let start_time = Instant::now();

    let reader = BufReader::new(File::open(&args.records_file)?);
    let mut imported = 0;
    let mut skipped = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = serde_json::from_str::<ImportLine>(&line)
            .map_err(SimvecError::from)
            .and_then(|record| {
                store.upsert(record.id, &record.vector, record.metadata, record.namespace)
            });

        match outcome {
            Ok(()) => imported += 1,
            Err(e) if args.skip_invalid => {
                warn!("skipping line {}: {e}", line_num + 1);
                skipped += 1;
            }
            Err(e) => {
                return Err(SimvecError::invalid_argument(format!(
                    "line {}: {e}",
                    line_num + 1
                )));
            }
        }

        if imported > 0 && imported % 10_000 == 0 {
            debug!("imported {imported} records...");
        }
    }

    store.save(&args.snapshot)?;

    output_result(
        "Records imported successfully",
        &ImportResult {
            records_imported: imported,
            records_skipped: skipped,
            total_records: store.len(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

fn search_records(args: &SearchArgs, cli_args: &SimvecArgs) -> Result<()> {
    if !args.snapshot.exists() {
        return Err(SimvecError::invalid_argument(format!(
            "snapshot {} does not exist",
            args.snapshot.display()
        )));
    }
    let store = open_store(&args.snapshot, cli_args)?;

    let mut filter = SearchFilter::new();
    if let Some(namespace) = &args.namespace {
        filter = filter.namespace(namespace.as_str());
    }
    for (key, value) in &args.filters {
        filter = filter.metadata_equals(key.as_str(), value.as_str());
    }

    let start_time = Instant::now();
    let hits = store.search_detailed(&args.vector, args.k, &filter)?;
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    output_result(
        "Search completed",
        &SearchResults { hits, duration_ms },
        cli_args,
    )
}

fn get_record(args: &GetArgs, cli_args: &SimvecArgs) -> Result<()> {
    let store = open_store(&args.snapshot, cli_args)?;
    let record = store
        .get(&args.id)
        .ok_or_else(|| SimvecError::invalid_argument(format!("record '{}' not found", args.id)))?;

    output_result(
        "Record found",
        &RecordView::new(
            record.id,
            record.namespace,
            record.vector,
            record.metadata,
            args.with_vector,
        ),
        cli_args,
    )
}

fn show_stats(args: &StatsArgs, cli_args: &SimvecArgs) -> Result<()> {
    let store = open_store(&args.snapshot, cli_args)?;
    output_result("Store statistics", &store.stats(), cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse(argv: &[&str]) -> SimvecArgs {
        SimvecArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_store_config_from_flags() {
        let args = parse(&["simvec", "-w", "3", "stats", "v.bin"]);
        let config = store_config(Path::new("v.bin"), &args).unwrap();
        assert_eq!(config.num_workers, 3);
        assert_eq!(config.snapshot_format, SnapshotFormat::Bincode);

        let args = parse(&["simvec", "--snapshot-format", "json", "stats", "v.bin"]);
        let config = store_config(Path::new("v.bin"), &args).unwrap();
        assert_eq!(config.snapshot_format, SnapshotFormat::Json);
    }

    #[test]
    fn test_add_then_search_through_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("vectors.json");
        let snapshot_arg = snapshot.to_str().unwrap();

        for (id, vector) in [("a", "1,0,0"), ("b", "0,1,0"), ("c", "0.9,0.1,0")] {
            let args = parse(&[
                "simvec", "-q", "-f", "json", "add", snapshot_arg, "--id", id, "--vector", vector,
                "-n", "ns1",
            ]);
            execute_command(args).unwrap();
        }

        let store = open_store(&snapshot, &parse(&["simvec", "stats", snapshot_arg])).unwrap();
        assert_eq!(store.len(), 3);

        let hits = store
            .search(&[1.0, 0.0, 0.0], 2, &SearchFilter::new().namespace("ns1"))
            .unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_import_skips_invalid_lines_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("vectors.json");
        let records = dir.path().join("records.jsonl");

        let mut file = File::create(&records).unwrap();
        writeln!(file, r#"{{"id": "a", "vector": [1.0, 0.0], "metadata": {{"k": "v"}}}}"#).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"id": "b", "vector": [1.0, 0.0, 0.0]}}"#).unwrap();
        writeln!(file, r#"{{"id": "c", "vector": [0.0, 1.0], "namespace": "x"}}"#).unwrap();
        drop(file);

        let snapshot_arg = snapshot.to_str().unwrap();
        let records_arg = records.to_str().unwrap();

        let strict = parse(&["simvec", "-q", "import", snapshot_arg, records_arg]);
        assert!(execute_command(strict).is_err());
        assert!(!snapshot.exists());

        let lenient = parse(&[
            "simvec", "-q", "-f", "json", "import", snapshot_arg, records_arg, "--skip-invalid",
        ]);
        execute_command(lenient).unwrap();

        let store = open_store(&snapshot, &parse(&["simvec", "stats", snapshot_arg])).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.contains("a"));
        assert!(store.contains("c"));
        assert_eq!(store.get("c").unwrap().namespace, "x");
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("vectors.json");
        std::fs::write(&snapshot, b"{ broken").unwrap();

        let args = parse(&["simvec", "stats", snapshot.to_str().unwrap()]);
        assert!(open_store(&snapshot, &args).is_err());
    }
}
