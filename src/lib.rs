//! # simvec
//!
//! An embedded vector similarity search engine for Rust.
//!
//! ## Features
//!
//! - Fixed-dimension embeddings with string metadata and namespaces
//! - Exact cosine similarity over unit-normalized vectors
//! - Sharded parallel top-K search with namespace and metadata filters
//! - Shared/exclusive locking: concurrent searches, serialized writes
//! - Whole-store JSON or bincode snapshots

pub mod cli;
pub mod embedding;
pub mod error;
pub mod vector;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
