use crate::Cli;
use pdf_qa_core::config::validate_chunking;
use pdf_qa_core::{
    discover_pdf_files, file_display_name, AdminGate, AnswerPipeline, ChunkingConfig, ConfigError,
    IngestError, IngestionPipeline, ModelOptions, OpenAiChat, OpenAiEmbeddings, RawSecrets, RetrievalOptions,
    Secrets, SupabaseStore, UploadPermit,
};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub struct Services {
    pub ingestion: IngestionPipeline<OpenAiEmbeddings, SupabaseStore>,
    pub answering: AnswerPipeline<OpenAiEmbeddings, SupabaseStore, OpenAiChat>,
    pub gate: AdminGate,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub files: usize,
    pub failed: usize,
    pub chunks: usize,
}

impl Services {
    /// Builds every collaborator from the command line and environment.
    /// Any configuration problem is fatal and reported before the first prompt.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let secrets = Secrets::resolve(RawSecrets {
            openai_api_key: cli.openai_api_key.clone(),
            supabase_url: cli.supabase_url.clone(),
            supabase_service_key: cli.supabase_service_key.clone(),
            upload_password: cli.upload_password.clone(),
        })?;

        let chunking = validate_chunking(ChunkingConfig {
            chunk_size: cli.chunk_size,
            overlap: cli.chunk_overlap,
        })?;
        if cli.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                key: "top_k",
                details: "must be at least 1".to_string(),
            }
            .into());
        }

        let options = ModelOptions {
            chat_model: cli.chat_model.clone(),
            embedding_model: cli.embedding_model.clone(),
            ..ModelOptions::default()
        };

        // One embedder instance for both pipelines keeps query vectors comparable.
        let embedder = Arc::new(OpenAiEmbeddings::new(
            secrets.openai_api_key.clone(),
            &cli.openai_base_url,
            &options.embedding_model,
        ));
        let index = Arc::new(SupabaseStore::new(
            secrets.supabase_url.clone(),
            secrets.supabase_service_key.clone(),
            &cli.table,
            &cli.query_name,
        ));

        let ingestion = IngestionPipeline::new(embedder.clone(), index.clone(), chunking)?;
        let chat = OpenAiChat::new(secrets.openai_api_key.clone(), &cli.openai_base_url, options);
        let answering = AnswerPipeline::new(
            embedder,
            index,
            chat,
            RetrievalOptions { top_k: cli.top_k },
        );

        Ok(Self {
            ingestion,
            answering,
            gate: AdminGate::new(secrets.upload_password),
        })
    }

    /// Ingests one PDF or every PDF under a folder, consuming the permit.
    /// Files are ingested one by one; a failing file is reported and skipped.
    pub async fn upload(&self, _permit: UploadPermit, path: &Path) -> UploadSummary {
        let files = discover_pdf_files(path);
        let mut summary = UploadSummary {
            files: files.len(),
            ..UploadSummary::default()
        };

        if files.is_empty() {
            println!("no PDF files found at {}", path.display());
            return summary;
        }

        for file in files {
            let result = async {
                let name = file_display_name(&file)?;
                let bytes = tokio::fs::read(&file).await?;
                Ok::<_, IngestError>(self.ingestion.ingest(&bytes, &name).await?)
            }
            .await;

            match result {
                Ok(report) => {
                    summary.chunks += report.chunks_written;
                    println!(
                        "{} chunks from '{}' vectorized",
                        report.chunks_written, report.file_name
                    );
                }
                Err(error) => {
                    summary.failed += 1;
                    warn!(path = %file.display(), reason = %error, "upload failed");
                    println!("error while uploading {}: {error}", file.display());
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pdf_qa_core::GateDecision;
    use tempfile::tempdir;

    fn services() -> Services {
        let cli = Cli::parse_from([
            "pdf-qa",
            "--openai-api-key",
            "sk-test",
            "--supabase-url",
            "http://127.0.0.1:9",
            "--supabase-service-key",
            "service-key",
            "--upload-password",
            "letmein",
            "chat",
        ]);
        Services::from_cli(&cli).unwrap()
    }

    fn permit(services: &Services) -> UploadPermit {
        match services.gate.check("letmein") {
            GateDecision::Granted(permit) => permit,
            other => panic!("expected a permit, got {other:?}"),
        }
    }

    #[test]
    fn wrong_password_grants_nothing() {
        let services = services();
        assert!(matches!(services.gate.check("guess"), GateDecision::Denied));
        assert!(matches!(services.gate.check(""), GateDecision::Idle));
    }

    #[tokio::test]
    async fn broken_pdf_is_counted_as_failed_without_chunks() {
        let services = services();
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"%PDF-1.4\n%truncated").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"not a pdf").unwrap();

        let summary = services.upload(permit(&services), dir.path()).await;

        assert_eq!(
            summary,
            UploadSummary {
                files: 1,
                failed: 1,
                chunks: 0
            }
        );
    }

    #[tokio::test]
    async fn folder_without_pdfs_uploads_nothing() {
        let services = services();
        let dir = tempdir().unwrap();

        let summary = services.upload(permit(&services), dir.path()).await;

        assert_eq!(summary, UploadSummary::default());
    }
}
