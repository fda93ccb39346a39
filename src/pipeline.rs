use crate::errors::ProcessError;
use crate::highlight::{HighlightColor, highlight_row};
use crate::loader::{self, LoadedWorkbook};
use crate::matcher::Matcher;
use crate::progress::{ProgressEvent, ProgressPublisher};
use crate::state::AppState;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use umya_spreadsheet::Spreadsheet;

/// Everything one processing run needs: already-saved input paths and
/// already-parsed form parameters, plus the session the run belongs to.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub file1: PathBuf,
    pub file2: PathBuf,
    pub color: String,
    pub column1: String,
    pub column2: String,
    /// 1-based header row of each workbook.
    pub header_row1: u32,
    pub header_row2: u32,
    pub session_id: String,
}

/// Kick off one session's background pipeline and return immediately.
///
/// The task runs load -> match -> highlight -> persist -> publish, catches
/// every failure at its boundary, and always ends with exactly one terminal
/// event for the session. Other sessions and the sweep are unaffected.
pub fn start_processing(state: Arc<AppState>, request: ProcessRequest) {
    let session_id = request.session_id.clone();
    let task_state = state.clone();

    state.spawn_task(&session_id, async move {
        let session_id = request.session_id.clone();
        match run_pipeline(&task_state, request).await {
            Ok(outputs) => {
                tracing::info!(%session_id, ?outputs, "processing complete");
                task_state
                    .publisher()
                    .publish(&session_id, ProgressEvent::Complete { outputs });
            }
            Err(error) => {
                tracing::error!(%session_id, error = %error, "processing failed");
                task_state.publisher().publish(
                    &session_id,
                    ProgressEvent::Error {
                        message: error.to_string(),
                    },
                );
            }
        }
        task_state.unregister_task(&session_id);
    });
}

async fn run_pipeline(state: &Arc<AppState>, request: ProcessRequest) -> Result<Vec<String>> {
    let session_id = request.session_id.as_str();

    // Color is validated before any I/O happens.
    let color = HighlightColor::parse(&request.color)?;

    // Pin the session so the sweep cannot delete the directory mid-run.
    let _guard = state.sessions().begin_processing(session_id)?;
    let session_dir = state.sessions().dir(session_id)?;

    // Loading.
    let wb1 = load_blocking(&request.file1, request.header_row1).await?;
    let wb2 = load_blocking(&request.file2, request.header_row2).await?;

    if !wb1.has_column(&request.column1) {
        return Err(ProcessError::ColumnNotFound {
            column: request.column1,
            path: wb1.path,
        }
        .into());
    }
    if !wb2.has_column(&request.column2) {
        return Err(ProcessError::ColumnNotFound {
            column: request.column2,
            path: wb2.path,
        }
        .into());
    }

    let LoadedWorkbook {
        sheets: a_sheets,
        book: mut book_a,
        path: path_a,
    } = wb1;
    let LoadedWorkbook {
        sheets: b_sheets,
        book: mut book_b,
        path: path_b,
    } = wb2;

    // Matching. One pass per A sheet; after each pass the fills are applied,
    // progress goes out, and a yield lets the publish flush before the next
    // CPU-bound pass starts.
    let matcher = Matcher::new(&a_sheets, &b_sheets, &request.column1, &request.column2);
    for pass in matcher {
        for pair in &pass.matches {
            highlight_row(&mut book_a, &pair.source_sheet, pair.source_row, &color);
            highlight_row(&mut book_b, &pair.target_sheet, pair.target_row, &color);
        }
        tracing::debug!(
            session_id,
            sheet = %pass.sheet_name,
            matches = pass.matches.len(),
            "sheet scanned"
        );
        state.publisher().publish(
            session_id,
            ProgressEvent::Progress {
                percent: pass.percent(),
            },
        );
        task::yield_now().await;
    }

    // Persisting.
    let name1 = output_name("file1", &path_a);
    let name2 = output_name("file2", &path_b);
    write_blocking(book_a, session_dir.join(&name1)).await?;
    write_blocking(book_b, session_dir.join(&name2)).await?;

    Ok(vec![name1, name2])
}

async fn load_blocking(path: &Path, header_row: u32) -> Result<LoadedWorkbook> {
    let path = path.to_path_buf();
    let loaded = task::spawn_blocking(move || loader::load(&path, header_row)).await??;
    Ok(loaded)
}

async fn write_blocking(book: Spreadsheet, path: PathBuf) -> Result<()> {
    task::spawn_blocking(move || {
        umya_spreadsheet::writer::xlsx::write(&book, &path)
            .map_err(|e| ProcessError::persist(&path, e))
    })
    .await??;
    Ok(())
}

/// Deterministic output name: fixed stem, same extension as the original.
fn output_name(stem: &str, original: &Path) -> String {
    let ext = original
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("xlsx");
    format!("{stem}_highlighted.{ext}")
}
