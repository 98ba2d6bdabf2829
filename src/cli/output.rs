//! Output formatting for CLI commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SimvecArgs};
use crate::error::Result;
use crate::vector::Metadata;
use crate::vector::DetailedHit;
use crate::vector::store::StoreStats;

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self);
}

/// Result structure for adding a record.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddResult {
    pub id: String,
    pub total_records: usize,
}

/// Result structure for importing records.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResult {
    pub records_imported: usize,
    pub records_skipped: usize,
    pub total_records: usize,
    pub duration_ms: u64,
}

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub hits: Vec<DetailedHit>,
    pub duration_ms: f64,
}

/// A single record as shown by `get`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordView {
    pub id: String,
    pub namespace: String,
    pub dimension: usize,
    pub metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
}

impl RecordView {
    pub fn new(
        id: String,
        namespace: String,
        vector: Vec<f32>,
        metadata: Metadata,
        with_vector: bool,
    ) -> Self {
        Self {
            id,
            namespace,
            dimension: vector.len(),
            metadata: metadata.into_iter().collect(),
            vector: with_vector.then_some(vector),
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &SimvecArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &SimvecArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn namespace_label(namespace: &str) -> &str {
    if namespace.is_empty() {
        "(none)"
    } else {
        namespace
    }
}

impl HumanOutput for AddResult {
    fn print_human(&self) {
        println!("Stored record: {}", self.id);
        println!("Total records: {}", self.total_records);
    }
}

impl HumanOutput for ImportResult {
    fn print_human(&self) {
        println!("Records imported: {}", self.records_imported);
        if self.records_skipped > 0 {
            println!("Records skipped: {}", self.records_skipped);
        }
        println!("Total records: {}", self.total_records);
        println!("Import time: {}ms", self.duration_ms);
    }
}

impl HumanOutput for SearchResults {
    fn print_human(&self) {
        println!("Search Results:");
        println!("═══════════════");

        for (i, hit) in self.hits.iter().enumerate() {
            println!();
            println!("Result {}: {} (Score: {:.4})", i + 1, hit.id, hit.score);
            println!("─────────────");
            println!("namespace: {}", namespace_label(&hit.namespace));
            let metadata: BTreeMap<_, _> = hit.metadata.iter().collect();
            for (key, value) in metadata {
                println!("{key}: {value}");
            }
        }

        println!();
        println!("Total hits: {}", self.hits.len());
        println!("Search time: {:.3}ms", self.duration_ms);
    }
}

impl HumanOutput for RecordView {
    fn print_human(&self) {
        println!("Record: {}", self.id);
        println!("═══════");
        println!("namespace: {}", namespace_label(&self.namespace));
        println!("dimension: {}", self.dimension);
        for (key, value) in &self.metadata {
            println!("{key}: {value}");
        }
        if let Some(vector) = &self.vector {
            let components: Vec<String> = vector.iter().map(|x| format!("{x:.6}")).collect();
            println!("vector: [{}]", components.join(", "));
        }
    }
}

impl HumanOutput for StoreStats {
    fn print_human(&self) {
        println!("Store Statistics:");
        println!("═════════════════");
        println!("Total records: {}", self.record_count);
        match self.dimension {
            Some(dimension) => println!("Dimension: {dimension}"),
            None => println!("Dimension: (empty store)"),
        }

        if !self.namespaces.is_empty() {
            println!();
            println!("Namespaces:");
            println!("───────────");
            for (namespace, count) in &self.namespaces {
                println!("  {} ({count})", namespace_label(namespace));
            }
        }
    }
}
