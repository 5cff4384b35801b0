//! CLI entry point for the pretalx score exporter.
//!
//! `submissions` dumps the event's submissions as JSON; `scores` reads such
//! a dump, fetches every submission's reviews, and writes a CSV table of
//! reviewer scores and averages.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pretalx_scores::config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_EVENT, DEFAULT_TIMEOUT_SECS};
use pretalx_scores::output::{DEFAULT_SCORES_FILE, write_json, write_scores_file};
use pretalx_scores::stats::collect_scores;
use pretalx_scores::{ConferenceApi, PretalxClient, model::load_submissions};
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "pretalx_scores")]
#[command(about = "Export pretalx submissions and reviewer scores", long_about = None)]
struct Cli {
    /// Base URL of the pretalx instance
    #[arg(long, env = "PRETALX_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Event slug
    #[arg(long, env = "PRETALX_EVENT", default_value = DEFAULT_EVENT, global = true)]
    event: String,

    /// Authentication token
    #[arg(
        short,
        long,
        env = "PRETALX_TOKEN",
        default_value = "",
        hide_env_values = true,
        global = true
    )]
    auth_token: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all submissions and print them as JSON
    Submissions {
        /// Only keep submissions whose track name contains this text
        #[arg(short, long, default_value = "")]
        track: String,

        /// Write to this file instead of standard output
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch reviews for submissions in FILE and write a score table
    Scores {
        /// Submissions JSON, as written by `submissions` ("-" for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// CSV file to write
        #[arg(short, long, default_value = DEFAULT_SCORES_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/pretalx_scores.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("pretalx_scores.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = ApiConfig::new(cli.base_url, cli.event)
        .with_auth_token(Some(cli.auth_token))
        .with_timeout(Duration::from_secs(cli.timeout));
    info!(
        base_url = %config.base_url,
        event = %config.event,
        authenticated = config.auth_token.is_some(),
        "Using pretalx instance"
    );
    let client = PretalxClient::new(config)?;

    match cli.command {
        Commands::Submissions { track, output } => {
            let track = (!track.is_empty()).then_some(track.as_str());
            let submissions = client.list_submissions(track).await?;

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    write_json(BufWriter::new(file), &submissions)?;
                    info!(path = %path.display(), count = submissions.len(), "Submissions written");
                }
                None => write_json(io::stdout().lock(), &submissions)?,
            }
        }
        Commands::Scores { file, output } => {
            let submissions = if file.as_os_str() == "-" {
                load_submissions(io::stdin().lock())?
            } else {
                let reader = File::open(&file)
                    .with_context(|| format!("cannot open {}", file.display()))?;
                load_submissions(BufReader::new(reader))
                    .with_context(|| format!("cannot read submissions from {}", file.display()))?
            };
            info!(count = submissions.len(), "Submissions loaded");

            let table = collect_scores(&client, &submissions).await?;
            write_scores_file(&output, &table)
                .with_context(|| format!("cannot write {}", output.display()))?;
        }
    }

    Ok(())
}
