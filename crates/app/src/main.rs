mod chat;
mod render;
mod services;

use chrono::Utc;
use clap::{Parser, Subcommand};
use pdf_qa_core::openai::DEFAULT_BASE_URL;
use pdf_qa_core::stores::supabase::{DEFAULT_QUERY_NAME, DEFAULT_TABLE};
use pdf_qa_core::{GateDecision, Session, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K};
use services::Services;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-qa", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API key for embeddings and chat completions
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    supabase_url: Option<String>,

    /// Supabase service role key
    #[arg(long, env = "SUPABASE_SERVICE_KEY", hide_env_values = true)]
    supabase_service_key: Option<String>,

    /// Admin password that unlocks uploads (defaults to the documented fallback)
    #[arg(long, env = "UPLOAD_PASSWORD", hide_env_values = true)]
    upload_password: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Chat model used for answers
    #[arg(long, default_value = "gpt-3.5-turbo")]
    chat_model: String,

    /// Embedding model; must match the one used when the index was filled
    #[arg(long, default_value = "text-embedding-ada-002")]
    embedding_model: String,

    /// Table holding chunks and embeddings
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Similarity search function exposed over RPC
    #[arg(long, default_value = DEFAULT_QUERY_NAME)]
    query_name: String,

    /// Chunks retrieved per question
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    top_k: usize,

    /// Maximum chunk length in characters
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Characters shared by consecutive chunks of a page
    #[arg(long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a PDF, or every PDF under a folder, into the vector index.
    Ingest {
        /// PDF file or folder searched recursively.
        path: PathBuf,
        /// Admin password; uploads are refused when it is wrong.
        #[arg(long, env = "PDF_QA_ADMIN_PASSWORD", hide_env_values = true, default_value = "")]
        admin_password: String,
    },
    /// Ask one question and print the answer with its sources.
    Ask {
        /// Question text.
        question: String,
        /// Print the exchange as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Start an interactive session with history, uploads and clear.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "pdf-qa boot"
    );

    let services = Services::from_cli(&cli)?;

    match cli.command {
        Command::Ingest {
            path,
            admin_password,
        } => match services.gate.check(&admin_password) {
            GateDecision::Granted(permit) => {
                let summary = services.upload(permit, &path).await;
                info!(files = summary.files, chunks = summary.chunks, "upload finished");
                if summary.failed > 0 {
                    anyhow::bail!("{} of {} file(s) failed to upload", summary.failed, summary.files);
                }
            }
            GateDecision::Denied => anyhow::bail!("incorrect admin password"),
            GateDecision::Idle => {
                info!("no admin password given, upload skipped");
            }
        },
        Command::Ask { question, json } => {
            if question.trim().is_empty() {
                anyhow::bail!("question is empty");
            }

            let mut session = Session::start();
            let record = services
                .answering
                .ask(&mut session, &question)
                .await
                .map_err(|error| anyhow::anyhow!("error while answering: {error}"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", render::format_record(1, &record));
            }
        }
        Command::Chat => {
            let mut session = Session::start();
            info!(session = %session.id, "session started");
            chat::run(&services, &mut session).await?;
            info!(session = %session.id, exchanges = session.log.len(), "session ended");
        }
    }

    Ok(())
}
