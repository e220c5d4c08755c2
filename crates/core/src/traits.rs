use crate::{Chunk, ProviderError, RetrievedChunk};
use async_trait::async_trait;

/// Maps text to fixed-length vectors. Ingestion and querying must share one
/// provider and model, otherwise stored vectors and query vectors are not comparable.
#[async_trait]
pub trait EmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;

    /// Embeds every text in order. Fails as a whole if any input fails.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

#[async_trait]
pub trait VectorIndex {
    /// Persists chunks with their vectors as one logical insertion.
    async fn insert(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<(), ProviderError>;

    /// Returns up to `k` stored chunks, most similar first.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<RetrievedChunk>, ProviderError>;
}

#[async_trait]
pub trait LanguageModel {
    /// Answers `question` grounded in `context` passages. An empty context is allowed.
    async fn complete(&self, question: &str, context: &[String]) -> Result<String, ProviderError>;
}
