use anyhow::{Context, Result};
use clap::Parser;
use crossmark::{AppConfig, AppState, ProcessRequest, ProgressEvent, start_processing};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

/// Highlight matching rows across two spreadsheet workbooks.
#[derive(Debug, Parser)]
#[command(name = "crossmark", version)]
struct Cli {
    /// First workbook (its rows are matched against the second).
    file1: PathBuf,
    /// Second workbook.
    file2: PathBuf,
    /// Lookup column in the first workbook.
    #[arg(long)]
    column1: String,
    /// Lookup column in the second workbook.
    #[arg(long)]
    column2: String,
    /// Highlight color, RRGGBB or AARRGGBB hex, leading '#' optional.
    #[arg(long, default_value = "FFFF00")]
    color: String,
    /// 1-based header row of the first workbook.
    #[arg(long, default_value_t = 1)]
    header_row1: u32,
    /// 1-based header row of the second workbook.
    #[arg(long, default_value_t = 1)]
    header_row2: u32,
    /// Directory for session working directories (temporary dir when omitted).
    #[arg(long, env = "CROSSMARK_WORK_DIR")]
    work_dir: Option<PathBuf>,
    /// Only print the terminal event.
    #[arg(long)]
    quiet: bool,
}

#[derive(Serialize)]
struct CompletionSummary {
    session_id: String,
    outputs: Vec<String>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    code: &'a str,
    message: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // One-shot runs get a throwaway work root unless told otherwise.
    let temp_root;
    let work_root = match &cli.work_dir {
        Some(dir) => dir.clone(),
        None => {
            temp_root = tempfile::tempdir().context("failed to create temporary work dir")?;
            temp_root.path().to_path_buf()
        }
    };

    let state = Arc::new(AppState::new(AppConfig::new(work_root)));
    let (sweeper_token, sweeper) = state.start_sweeper();

    let session_id = state.sessions().create()?;
    let mut events = state.subscribe(&session_id);

    start_processing(
        state.clone(),
        ProcessRequest {
            file1: cli.file1,
            file2: cli.file2,
            color: cli.color,
            column1: cli.column1,
            column2: cli.column2,
            header_row1: cli.header_row1,
            header_row2: cli.header_row2,
            session_id: session_id.clone(),
        },
    );

    let outcome = loop {
        match events.recv().await {
            Ok(event) => {
                if !cli.quiet || event.is_terminal() {
                    println!("{}", serde_json::to_string(&event)?);
                }
                if event.is_terminal() {
                    break Some(event);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "progress events lagged");
            }
            Err(RecvError::Closed) => break None,
        }
    };

    sweeper_token.cancel();
    let _ = sweeper.await;

    match outcome {
        Some(ProgressEvent::Complete { outputs }) => {
            let summary = CompletionSummary {
                session_id: session_id.clone(),
                outputs,
            };
            println!("{}", serde_json::to_string(&summary)?);
            Ok(())
        }
        Some(ProgressEvent::Error { message }) => {
            let envelope = ErrorEnvelope {
                code: "PROCESSING_FAILED",
                message,
            };
            eprintln!("{}", serde_json::to_string(&envelope)?);
            std::process::exit(1)
        }
        _ => {
            let envelope = ErrorEnvelope {
                code: "CHANNEL_CLOSED",
                message: "progress channel closed before a terminal event".to_string(),
            };
            eprintln!("{}", serde_json::to_string(&envelope)?);
            std::process::exit(1)
        }
    }
}
