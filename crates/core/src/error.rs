use thiserror::Error;

/// Failure of an external collaborator: embedding API, vector store or language model.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid response from {backend} ({status}): {details}")]
    BackendResponse {
        backend: String,
        status: u16,
        details: String,
    },

    #[error("provider request failed: {0}")]
    Request(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf extraction failed: {0}")]
    Extraction(String),

    #[error("embedding failed: {0}")]
    Embedding(#[source] ProviderError),

    #[error("vector index write failed: {0}")]
    IndexWrite(#[source] ProviderError),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),
}

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("question embedding failed: {0}")]
    Embedding(#[source] ProviderError),

    #[error("vector index query failed: {0}")]
    IndexQuery(#[source] ProviderError),

    #[error("answer synthesis failed: {0}")]
    Synthesis(#[source] ProviderError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("{key} is not a valid url: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid value for {key}: {details}")]
    InvalidValue { key: &'static str, details: String },
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
