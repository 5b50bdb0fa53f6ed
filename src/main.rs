use clap::{Parser, Subcommand};
use doc_ingest::Result;
use doc_ingest::commands::{
    ingest_document, init_config, list_documents, show_config, show_status,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "doc-ingest")]
#[command(about = "Validates, stores, and indexes user-submitted PDF documents")]
#[command(version)]
struct Cli {
    /// Override the data directory (uploads, indexes, metadata database)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a PDF document for an owner
    Ingest {
        /// Path of the file to ingest
        file: PathBuf,
        /// Identifier of the submitting user
        #[arg(long)]
        owner: String,
    },
    /// List registered documents
    List {
        /// Only show documents for this owner
        #[arg(long)]
        owner: Option<String>,
    },
    /// Show data layout and indexing status
    Status,
    /// Show current configuration
    Config {
        /// Write the active configuration to disk
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { file, owner } => {
            ingest_document(file, owner, cli.data_dir).await?;
        }
        Commands::List { owner } => {
            list_documents(owner, cli.data_dir).await?;
        }
        Commands::Status => {
            show_status(cli.data_dir).await?;
        }
        Commands::Config { init } => {
            if init {
                init_config(cli.data_dir)?;
            } else {
                show_config(cli.data_dir)?;
            }
        }
    }

    Ok(())
}
