use crate::models::{Answer, RetrievalOptions};
use crate::session::{QaRecord, Session};
use crate::traits::{EmbeddingProvider, LanguageModel, VectorIndex};
use crate::AnswerError;
use std::sync::Arc;
use tracing::{debug, info};

/// Question -> embedding -> top-k retrieval -> grounded completion.
///
/// The embedder must be the one the index was populated with; the pipeline
/// takes it as a shared handle so ingestion and answering can use the same
/// instance.
pub struct AnswerPipeline<E, V, L> {
    embedder: Arc<E>,
    index: Arc<V>,
    model: L,
    retrieval: RetrievalOptions,
}

impl<E, V, L> AnswerPipeline<E, V, L>
where
    E: EmbeddingProvider + Send + Sync,
    V: VectorIndex + Send + Sync,
    L: LanguageModel + Send + Sync,
{
    pub fn new(embedder: Arc<E>, index: Arc<V>, model: L, retrieval: RetrievalOptions) -> Self {
        Self {
            embedder,
            index,
            model,
            retrieval,
        }
    }

    /// Answers `question` and returns every retrieved chunk in rank order.
    /// Zero retrieved chunks is not an error; the model is still asked.
    pub async fn answer(&self, question: &str) -> Result<Answer, AnswerError> {
        let query_vector = self
            .embedder
            .embed(question)
            .await
            .map_err(AnswerError::Embedding)?;

        let sources = self
            .index
            .query(&query_vector, self.retrieval.top_k)
            .await
            .map_err(AnswerError::IndexQuery)?;
        debug!(retrieved = sources.len(), top_k = self.retrieval.top_k, "context retrieved");

        let context: Vec<String> = sources
            .iter()
            .map(|source| source.chunk.content.clone())
            .collect();
        let text = self
            .model
            .complete(question, &context)
            .await
            .map_err(AnswerError::Synthesis)?;

        info!(retrieved = sources.len(), answer_chars = text.len(), "question answered");
        Ok(Answer { text, sources })
    }

    /// Answers and appends the exchange to the session log. Nothing is logged on failure.
    pub async fn ask(&self, session: &mut Session, question: &str) -> Result<QaRecord, AnswerError> {
        let answer = self.answer(question).await?;
        let record = QaRecord::new(question, answer);
        session.log.append(record.clone());
        Ok(record)
    }
}
