pub mod admin;
pub mod answer;
pub mod chunking;
pub mod config;
pub mod embeddings;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod models;
pub mod openai;
pub mod prompt;
pub mod session;
pub mod stores;
pub mod traits;

pub use admin::{AdminGate, GateDecision, UploadPermit};
pub use answer::AnswerPipeline;
pub use chunking::{split_text, ChunkingConfig, TextSplitter};
pub use config::{RawSecrets, Secrets, DEFAULT_UPLOAD_PASSWORD};
pub use embeddings::{CharacterNgramEmbedder, DEFAULT_EMBEDDING_DIMENSIONS};
pub use error::{AnswerError, ConfigError, IngestError, ProviderError};
pub use extractor::{extract_page_texts, LopdfExtractor, PageText, PdfExtractor};
pub use ingest::{discover_pdf_files, file_display_name, IngestionPipeline, IngestionReport};
pub use models::{
    Answer, Chunk, ChunkMetadata, ModelOptions, RetrievalOptions, RetrievedChunk,
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K,
};
pub use openai::{OpenAiChat, OpenAiEmbeddings};
pub use session::{ConversationLog, QaRecord, Session, DISPLAY_SOURCE_LIMIT};
pub use stores::{InMemoryIndex, SupabaseStore};
pub use traits::{EmbeddingProvider, LanguageModel, VectorIndex};
