//! Search execution: bounded top-K collection, filters, and the sharded
//! searcher.

pub mod collector;
pub mod filter;
pub mod sharded;

use serde::{Deserialize, Serialize};

use crate::vector::core::record::Metadata;

/// A ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    /// Cosine similarity to the query.
    pub score: f32,
}

/// A ranked search result joined with its record's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedHit {
    pub id: String,
    pub score: f32,
    pub metadata: Metadata,
    pub namespace: String,
}
