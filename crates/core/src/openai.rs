use crate::models::ModelOptions;
use crate::prompt::system_prompt;
use crate::traits::{EmbeddingProvider, LanguageModel};
use crate::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

const BACKEND: &str = "openai";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
/// Inputs per embeddings request; larger batches are split and sent in order.
pub const DEFAULT_EMBEDDING_BATCH: usize = 1_000;

#[derive(Debug, Clone)]
struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ProviderError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "openai request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        Ok(response.json().await?)
    }
}

pub struct OpenAiEmbeddings {
    inner: OpenAiClient,
    model: String,
    batch_size: usize,
}

impl OpenAiEmbeddings {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            inner: OpenAiClient::new(api_key.into(), base_url.into()),
            model: model.into(),
            batch_size: DEFAULT_EMBEDDING_BATCH,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| ProviderError::Request("embedding response was empty".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let payload = self
                .inner
                .post(
                    "/v1/embeddings",
                    &json!({
                        "model": self.model,
                        "input": batch,
                    }),
                )
                .await?;
            vectors.extend(parse_embeddings(payload, batch.len())?);
        }

        Ok(vectors)
    }
}

fn parse_embeddings(payload: Value, expected: usize) -> Result<Vec<Vec<f32>>, ProviderError> {
    let mut response: EmbeddingResponse = serde_json::from_value(payload)?;
    if response.data.len() != expected {
        return Err(ProviderError::Request(format!(
            "expected {expected} embeddings, got {}",
            response.data.len()
        )));
    }

    response.data.sort_by_key(|datum| datum.index);
    Ok(response
        .data
        .into_iter()
        .map(|datum| datum.embedding)
        .collect())
}

pub struct OpenAiChat {
    inner: OpenAiClient,
    options: ModelOptions,
}

impl OpenAiChat {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, options: ModelOptions) -> Self {
        Self {
            inner: OpenAiClient::new(api_key.into(), base_url.into()),
            options,
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiChat {
    async fn complete(&self, question: &str, context: &[String]) -> Result<String, ProviderError> {
        let body = chat_request(&self.options, question, context);
        let payload = self.inner.post("/v1/chat/completions", &body).await?;
        parse_completion(&payload)
    }
}

fn chat_request(options: &ModelOptions, question: &str, context: &[String]) -> Value {
    json!({
        "model": options.chat_model,
        "temperature": options.temperature,
        "max_tokens": options.max_tokens,
        "messages": [
            {"role": "system", "content": system_prompt(context)},
            {"role": "user", "content": question},
        ],
    })
}

fn parse_completion(payload: &Value) -> Result<String, ProviderError> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Request("missing choices[0].message.content".to_string()))
}
