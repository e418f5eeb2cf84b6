//! BiteBook CLI - browse the catalog and its reading questions

mod commands;

use anyhow::{Context, Result};
use bitebook_core::{resolve_api_base, Catalog};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bitebook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API origin; overrides BITEBOOK_API_BASE
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books in the catalog
    Books {
        /// Search title, author or ISBN
        #[arg(short, long)]
        q: Option<String>,

        /// 1-based page index
        #[arg(long, allow_negative_numbers = true)]
        page: Option<i64>,

        /// Books per page
        #[arg(long, allow_negative_numbers = true)]
        page_size: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one book
    Book {
        /// Book id
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the questions attached to a book
    Questions {
        /// Book id
        book_id: i64,

        /// 0-based offset
        #[arg(long, allow_negative_numbers = true)]
        start: Option<i64>,

        /// Maximum number of questions
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stderr keeps --json output clean
    let filter = if cli.verbose {
        "bitebook_cli=debug,bitebook_core=debug"
    } else {
        "bitebook_cli=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let catalog = match cli.base_url.as_deref() {
        Some(url) => Catalog::new(&resolve_api_base(Some(url))),
        None => Catalog::from_env(),
    }
    .context("Failed to build HTTP client")?;
    tracing::debug!(base_url = catalog.base_url(), "using API origin");

    match cli.command {
        Commands::Books {
            q,
            page,
            page_size,
            json,
        } => commands::books(&catalog, q, page, page_size, json).await,

        Commands::Book { id, json } => commands::book(&catalog, id, json).await,

        Commands::Questions {
            book_id,
            start,
            limit,
            json,
        } => commands::questions(&catalog, book_id, start, limit, json).await,
    }
}
