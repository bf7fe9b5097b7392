//! # Transcript Context CLI (`tcx`)
//!
//! Caches video transcripts and turns them into bounded prompt contexts
//! for questions about the video.
//!
//! ## Usage
//!
//! ```bash
//! tcx --config ./config/tcx.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tcx init` | Create the SQLite database and run schema migrations |
//! | `tcx ingest <video>` | Cache a transcript from a file or stdin |
//! | `tcx list` | List cached transcripts |
//! | `tcx get <video>` | Show a cached transcript and its summary |
//! | `tcx forget <video>` | Delete a cached transcript and its summaries |
//! | `tcx chunks <video>` | Show a transcript's chunks, ranked by a query |
//! | `tcx context <video> "<q>"` | Print the context `ask` would send |
//! | `tcx summarize <video>` | Generate and cache a transcript summary |
//! | `tcx ask <video> "<q>"` | Ask a question about the video |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use transcript_context::models::ChatMessage;
use transcript_context::{ask, config, get, ingest, migrate, prompt, retrieve};

/// Transcript Context CLI: cache video transcripts and ask questions
/// about them within a bounded context budget.
#[derive(Parser)]
#[command(
    name = "tcx",
    about = "Transcript Context: cache video transcripts and chat about them",
    version,
    long_about = "Transcript Context caches video transcripts, reduces long ones to a \
    summary plus the chunks most relevant to a question, and sends the result to an \
    OpenAI-compatible chat-completion endpoint."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/tcx.toml")]
    config: PathBuf,

    /// Log debug output to stderr (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the transcripts and summaries
    /// tables. Safe to run more than once.
    Init,

    /// Cache a transcript for a video.
    ///
    /// Reads the transcript from `--file`, or from stdin when no file is
    /// given. Re-ingesting identical text only updates the title and
    /// source; changed text invalidates the cached summary.
    Ingest {
        /// Video identifier (e.g. a YouTube video ID).
        video_id: String,

        /// Transcript file. Reads stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Video title.
        #[arg(long)]
        title: Option<String>,

        /// Where the transcript came from: `transcription`, `page`, or `paste`.
        #[arg(long, default_value = "paste")]
        source: String,

        /// Show character and chunk counts without writing to the database.
        #[arg(long)]
        dry_run: bool,
    },

    /// List cached transcripts.
    List,

    /// Show a cached transcript, its metadata, and its summary.
    Get {
        video_id: String,
    },

    /// Delete a cached transcript and its summaries.
    Forget {
        video_id: String,
    },

    /// Show how a transcript is chunked and how a query ranks the chunks.
    Chunks {
        video_id: String,

        /// Rank chunks against this query and show their scores.
        #[arg(long)]
        query: Option<String>,

        /// Only show the first N chunks.
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the context that would be sent for a question.
    ///
    /// Uses a cached summary if one exists. Pass `--summarize` to generate
    /// one through the chat provider when it is missing.
    Context {
        video_id: String,

        /// The question to rank chunks against.
        query: String,

        #[arg(long)]
        summarize: bool,
    },

    /// Generate and cache a summary of a transcript.
    Summarize {
        video_id: String,

        /// Regenerate even if a summary is cached.
        #[arg(long)]
        force: bool,
    },

    /// Ask a question about a video.
    Ask {
        video_id: String,

        /// The question.
        question: String,

        /// Earlier conversation turns as `role=content` (user or assistant).
        #[arg(long = "history", value_parser = prompt::parse_history_arg)]
        history: Vec<ChatMessage>,

        /// Also print the context sent with the question.
        #[arg(long)]
        show_context: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Ingest {
            video_id,
            file,
            title,
            source,
            dry_run,
        } => {
            ingest::run_ingest(
                &cfg,
                &video_id,
                file.as_deref(),
                title.as_deref(),
                &source,
                dry_run,
            )
            .await?;
        }
        Commands::List => {
            get::run_list(&cfg).await?;
        }
        Commands::Get { video_id } => {
            get::run_get(&cfg, &video_id).await?;
        }
        Commands::Forget { video_id } => {
            get::run_forget(&cfg, &video_id).await?;
        }
        Commands::Chunks {
            video_id,
            query,
            limit,
            json,
        } => {
            retrieve::run_chunks(&cfg, &video_id, query.as_deref(), limit, json).await?;
        }
        Commands::Context {
            video_id,
            query,
            summarize,
        } => {
            retrieve::run_context(&cfg, &video_id, &query, summarize).await?;
        }
        Commands::Summarize { video_id, force } => {
            ask::run_summarize(&cfg, &video_id, force).await?;
        }
        Commands::Ask {
            video_id,
            question,
            history,
            show_context,
        } => {
            ask::run_ask(&cfg, &video_id, &question, &history, show_context).await?;
        }
    }

    Ok(())
}
