use crate::traits::VectorIndex;
use crate::{Chunk, ProviderError, RetrievedChunk};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local index with brute-force cosine similarity. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    rows: RwLock<Vec<(Chunk, Vec<f32>)>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn chunks(&self) -> Vec<Chunk> {
        self.rows
            .read()
            .await
            .iter()
            .map(|(chunk, _)| chunk.clone())
            .collect()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn insert(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<(), ProviderError> {
        if chunks.len() != vectors.len() {
            return Err(ProviderError::Request(format!(
                "vector count {} doesn't match chunk count {}",
                vectors.len(),
                chunks.len()
            )));
        }

        let mut rows = self.rows.write().await;
        rows.extend(chunks.iter().cloned().zip(vectors.iter().cloned()));
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<RetrievedChunk>, ProviderError> {
        let rows = self.rows.read().await;

        let mut scored: Vec<RetrievedChunk> = rows
            .iter()
            .map(|(chunk, stored)| RetrievedChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(vector, stored),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|left, right| right.score.total_cmp(&left.score));
        scored.truncate(k);
        Ok(scored)
    }
}

fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    if left.len() != right.len() {
        return 0.0;
    }

    let dot = left.iter().zip(right).map(|(a, b)| a * b).sum::<f32>();
    let left_norm = left.iter().map(|value| value * value).sum::<f32>().sqrt();
    let right_norm = right.iter().map(|value| value * value).sum::<f32>().sqrt();

    if left_norm == 0.0 || right_norm == 0.0 {
        0.0
    } else {
        dot / (left_norm * right_norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn query_ranks_by_cosine_similarity() {
        let index = InMemoryIndex::new();
        let chunks = vec![
            Chunk::new("east", "a.pdf", 1),
            Chunk::new("north", "a.pdf", 2),
            Chunk::new("north-east", "a.pdf", 3),
        ];
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]];
        index.insert(&chunks, &vectors).await.unwrap();

        let hits = index.query(&[0.0, 1.0], 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.content, "north");
        assert_eq!(hits[1].chunk.content, "north-east");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn empty_index_returns_no_hits() {
        let index = InMemoryIndex::new();
        let hits = index.query(&[1.0, 0.0], 4).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn mismatched_batch_is_rejected_without_partial_write() {
        let index = InMemoryIndex::new();
        let result = index
            .insert(&[Chunk::new("lonely", "a.pdf", 1)], &[])
            .await;

        assert!(matches!(result, Err(ProviderError::Request(_))));
        assert!(index.is_empty().await);
    }

    #[test]
    fn zero_vector_has_no_similarity() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
