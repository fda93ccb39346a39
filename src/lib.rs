//! Cross-reference matching and highlighting for spreadsheet workbooks.
//!
//! Given two workbooks and a designated lookup column in each, the pipeline
//! highlights every row of workbook A whose value occurs in workbook B's
//! column, and the first B row that carries it. Processing runs as one
//! background task per session, reporting progress over a session-scoped
//! channel; session working directories expire after an hour of inactivity.

pub mod config;
pub mod errors;
pub mod highlight;
pub mod loader;
pub mod matcher;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod state;

pub use config::AppConfig;
pub use errors::{ProcessError, UnknownSessionError};
pub use highlight::HighlightColor;
pub use pipeline::{ProcessRequest, start_processing};
pub use progress::{ChannelPublisher, ProgressEvent, ProgressPublisher};
pub use session::SessionStore;
pub use state::AppState;
