//! Text embedding trait.

use async_trait::async_trait;

use crate::error::Result;

/// Converts text into fixed-dimension embeddings.
///
/// Implementations typically call a model server over the network and may
/// fail; failures are returned to the caller, never replaced by an empty or
/// zero vector.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    ///
    /// The default implementation calls `embed` sequentially.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Get the dimension of generated embeddings.
    fn dimension(&self) -> usize;

    /// Get the name/identifier of this embedder (e.g. the model name).
    fn name(&self) -> &str {
        "unknown"
    }
}
