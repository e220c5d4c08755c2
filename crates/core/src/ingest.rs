use crate::chunking::{ChunkingConfig, TextSplitter};
use crate::extractor::{LopdfExtractor, PageText, PdfExtractor};
use crate::traits::{EmbeddingProvider, VectorIndex};
use crate::{Chunk, IngestError};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Outcome of ingesting one file. `chunks_written` is the number of rows the
/// vector index received.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IngestionReport {
    pub file_name: String,
    pub checksum: String,
    pub pages_total: usize,
    pub pages_skipped: usize,
    pub chunks_written: usize,
}

/// PDF bytes -> page text -> chunks -> one embedding batch -> one index insertion.
pub struct IngestionPipeline<E, V, X = LopdfExtractor> {
    embedder: Arc<E>,
    index: Arc<V>,
    extractor: X,
    splitter: TextSplitter,
}

impl<E, V> IngestionPipeline<E, V, LopdfExtractor> {
    pub fn new(embedder: Arc<E>, index: Arc<V>, chunking: ChunkingConfig) -> Result<Self, IngestError> {
        Ok(Self {
            embedder,
            index,
            extractor: LopdfExtractor,
            splitter: TextSplitter::new(chunking)?,
        })
    }
}

impl<E, V, X> IngestionPipeline<E, V, X>
where
    E: EmbeddingProvider + Send + Sync,
    V: VectorIndex + Send + Sync,
    X: PdfExtractor,
{
    pub fn with_extractor<Y: PdfExtractor>(self, extractor: Y) -> IngestionPipeline<E, V, Y> {
        IngestionPipeline {
            embedder: self.embedder,
            index: self.index,
            extractor,
            splitter: self.splitter,
        }
    }

    /// Chunks every non-blank page, tagging each chunk with `file_name` and its page.
    pub fn chunk_pages(&self, pages: &[PageText], file_name: &str) -> Vec<Chunk> {
        pages
            .iter()
            .filter(|page| !page.is_blank())
            .flat_map(|page| {
                self.splitter
                    .split(&page.text)
                    .into_iter()
                    .map(move |content| Chunk::new(content, file_name, page.number))
            })
            .collect()
    }

    /// Ingests one uploaded file. Any failure fails the whole file; nothing is
    /// written unless every chunk was embedded.
    pub async fn ingest(&self, bytes: &[u8], file_name: &str) -> Result<IngestionReport, IngestError> {
        let checksum = digest_bytes(bytes);
        let pages = self.extractor.extract_pages(bytes)?;
        let pages_skipped = pages.iter().filter(|page| page.is_blank()).count();
        let chunks = self.chunk_pages(&pages, file_name);

        debug!(
            file = file_name,
            pages = pages.len(),
            pages_skipped,
            chunks = chunks.len(),
            "pdf chunked"
        );

        if !chunks.is_empty() {
            let texts: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
            let vectors = self
                .embedder
                .embed_batch(&texts)
                .await
                .map_err(IngestError::Embedding)?;

            self.index
                .insert(&chunks, &vectors)
                .await
                .map_err(IngestError::IndexWrite)?;
        }

        info!(
            file = file_name,
            checksum = %checksum,
            chunks = chunks.len(),
            pages_skipped,
            "pdf ingested"
        );

        Ok(IngestionReport {
            file_name: file_name.to_string(),
            checksum,
            pages_total: pages.len(),
            pages_skipped,
            chunks_written: chunks.len(),
        })
    }
}

/// PDF files under `path`, sorted. A file path is returned as-is when it is a PDF.
pub fn discover_pdf_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

/// Display name recorded as `metadata.source` for chunks of `path`.
pub fn file_display_name(path: &Path) -> Result<String, IngestError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| IngestError::MissingFileName(path.display().to_string()))
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
