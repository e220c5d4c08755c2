use crate::traits::VectorIndex;
use crate::{Chunk, ChunkMetadata, ProviderError, RetrievedChunk};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use tracing::debug;
use url::Url;
use uuid::Uuid;

const BACKEND: &str = "supabase";

pub const DEFAULT_TABLE: &str = "documents";
pub const DEFAULT_QUERY_NAME: &str = "match_documents";

/// Vector index backed by a Supabase (PostgREST + pgvector) table with
/// `id`, `content`, `metadata` and `embedding` columns, queried through a
/// similarity function such as `match_documents(query_embedding, match_count)`.
pub struct SupabaseStore {
    client: Client,
    base_url: Url,
    service_key: String,
    table: String,
    query_name: String,
}

#[derive(Debug, Serialize)]
struct DocumentRow<'a> {
    id: Uuid,
    content: &'a str,
    metadata: &'a ChunkMetadata,
    embedding: &'a [f32],
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct MatchedMetadata {
    source: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    page: u32,
}

#[derive(Debug, Deserialize)]
struct MatchedRow {
    content: String,
    metadata: MatchedMetadata,
    #[serde(default)]
    similarity: f32,
}

impl SupabaseStore {
    pub fn new(
        base_url: Url,
        service_key: impl Into<String>,
        table: impl Into<String>,
        query_name: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client: Client::new(),
            base_url,
            service_key: service_key.into(),
            table: table.into(),
            query_name: query_name.into(),
        }
    }

    fn rest_url(&self, path: &str) -> Result<Url, ProviderError> {
        Ok(self.base_url.join(&format!("rest/v1/{path}"))?)
    }

    async fn post(&self, url: Url, body: &Value, prefer: &str) -> Result<reqwest::Response, ProviderError> {
        debug!(%url, "supabase request");

        let response = self
            .client
            .post(url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", prefer)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let details = response.text().await.unwrap_or_default();
            return Err(ProviderError::BackendResponse {
                backend: BACKEND.to_string(),
                status,
                details,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl VectorIndex for SupabaseStore {
    async fn insert(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<(), ProviderError> {
        let rows = insert_rows(chunks, vectors)?;
        if rows.as_array().is_some_and(|rows| rows.is_empty()) {
            return Ok(());
        }

        // A single bulk insert runs in one transaction on the PostgREST side.
        let url = self.rest_url(&self.table)?;
        self.post(url, &rows, "return=minimal").await?;
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<RetrievedChunk>, ProviderError> {
        let url = self.rest_url(&format!("rpc/{}", self.query_name))?;
        let body = json!({
            "query_embedding": vector,
            "match_count": k,
        });

        let response = self.post(url, &body, "return=representation").await?;
        let payload: Value = response.json().await?;
        parse_matches(payload)
    }
}

fn insert_rows(chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<Value, ProviderError> {
    if chunks.len() != vectors.len() {
        return Err(ProviderError::Request(format!(
            "vector count {} doesn't match chunk count {}",
            vectors.len(),
            chunks.len()
        )));
    }

    let rows = chunks
        .iter()
        .zip(vectors)
        .map(|(chunk, vector)| DocumentRow {
            id: Uuid::new_v4(),
            content: &chunk.content,
            metadata: &chunk.metadata,
            embedding: vector,
        })
        .collect::<Vec<_>>();

    Ok(serde_json::to_value(rows)?)
}

fn parse_matches(payload: Value) -> Result<Vec<RetrievedChunk>, ProviderError> {
    let rows: Vec<MatchedRow> = serde_json::from_value(payload)?;

    Ok(rows
        .into_iter()
        .map(|row| RetrievedChunk {
            chunk: Chunk::new(row.content, row.metadata.source, row.metadata.page),
            score: row.similarity,
        })
        .collect())
}
