//! Text embedding support.
//!
//! simvec does not compute embeddings. An external provider implements
//! [`TextEmbedder`], and [`SemanticIndex`] pairs it with a
//! [`VectorStore`](crate::vector::VectorStore) to add and query by text.
//!
//! # Custom Implementation
//!
//! ```
//! use async_trait::async_trait;
//! use simvec::embedding::TextEmbedder;
//! use simvec::error::Result;
//!
//! struct ConstantEmbedder {
//!     dimension: usize,
//! }
//!
//! #[async_trait]
//! impl TextEmbedder for ConstantEmbedder {
//!     async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
//!         Ok(vec![1.0; self.dimension])
//!     }
//!
//!     fn dimension(&self) -> usize {
//!         self.dimension
//!     }
//! }
//! ```

pub mod semantic;
pub mod text_embedder;

pub use semantic::{AddRequest, QueryRequest, SemanticIndex};
pub use text_embedder::TextEmbedder;
