use std::path::PathBuf;
use thiserror::Error;

/// Failure modes of one session's processing task.
///
/// A sheet that merely lacks the designated column is not an error: the
/// matcher skips it and moves on.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to load workbook '{path}': {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("invalid highlight color '{0}' (expected RRGGBB or AARRGGBB hex, leading '#' optional)")]
    InvalidColor(String),

    #[error("column '{column}' not found in any sheet of '{path}'")]
    ColumnNotFound { column: String, path: PathBuf },

    #[error("failed to write output '{path}': {reason}")]
    Persist { path: PathBuf, reason: String },
}

impl ProcessError {
    pub fn load(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn persist(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Persist {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Lookup against a session that never existed or has already been swept.
///
/// Surfaced to callers as "not found"; never a task failure.
#[derive(Debug, Error)]
#[error("unknown session '{0}'")]
pub struct UnknownSessionError(pub String);
