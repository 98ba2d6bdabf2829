//! Text-level add and query on top of a vector store.

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::embedding::text_embedder::TextEmbedder;
use crate::error::{Result, SimvecError};
use crate::vector::core::record::Metadata;
use crate::vector::search::DetailedHit;
use crate::vector::search::filter::SearchFilter;
use crate::vector::store::VectorStore;

/// Metadata key holding the original text of a record added by text.
pub const TEXT_METADATA_KEY: &str = "text";

/// Number of hits returned when a query does not specify `k`.
pub const DEFAULT_QUERY_K: usize = 5;

/// A text to embed and store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddRequest {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A text query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    /// Number of hits, [`DEFAULT_QUERY_K`] when absent.
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default)]
    pub filter: SearchFilter,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// A vector store paired with the embedder that feeds it.
pub struct SemanticIndex {
    store: Arc<VectorStore>,
    embedder: Arc<dyn TextEmbedder>,
}

impl SemanticIndex {
    pub fn new(store: Arc<VectorStore>, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { store, embedder }
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    /// Embed `request.text` and upsert it. The text itself is stored under
    /// [`TEXT_METADATA_KEY`], overriding any caller value for that key.
    ///
    /// Returns the number of records in the store afterwards.
    pub async fn add_text(&self, request: AddRequest) -> Result<usize> {
        let vector = self.embed(&request.text).await?;

        let mut metadata = request.metadata;
        metadata.insert(TEXT_METADATA_KEY.to_string(), request.text);

        self.store
            .upsert(request.id, &vector, metadata, request.namespace)?;
        Ok(self.store.len())
    }

    /// Embed `request.text` and return the best matches with their metadata.
    ///
    /// The search itself is CPU-bound and blocks on the store's worker pool,
    /// so it runs on tokio's blocking thread pool rather than on the async
    /// worker that awaits it. Must be called from within a tokio runtime.
    pub async fn query_text(&self, request: QueryRequest) -> Result<Vec<DetailedHit>> {
        let vector = self.embed(&request.text).await?;
        let k = request.k.unwrap_or(DEFAULT_QUERY_K);

        let store = Arc::clone(&self.store);
        let filter = request.filter;
        tokio::task::spawn_blocking(move || store.search_detailed(&vector, k, &filter))
            .await
            .map_err(|e| SimvecError::invalid_operation(format!("search task failed: {e}")))?
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.embedder.embed(text).await?;
        if vector.is_empty() {
            return Err(SimvecError::embedding(format!(
                "embedder '{}' returned an empty vector",
                self.embedder.name()
            )));
        }
        debug!(
            "embedded {} bytes of text into {} dimensions with '{}'",
            text.len(),
            vector.len(),
            self.embedder.name()
        );
        Ok(vector)
    }
}
