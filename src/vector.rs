//! Vector storage and similarity search.
//!
//! # Module Structure
//!
//! - `core`: vector math, scalar quantization, and the record data model
//! - `store`: the record store, its insertion pipeline, and snapshots
//! - `search`: bounded top-K collection, filters, and the sharded searcher

pub mod core;
pub mod search;
pub mod store;

pub use self::core::record::{Metadata, Record};
pub use self::search::filter::{MetadataFilter, SearchFilter};
pub use self::search::{DetailedHit, SearchHit};
pub use self::store::VectorStore;
pub use self::store::config::{SnapshotFormat, StoreConfig};
