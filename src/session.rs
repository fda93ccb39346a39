use crate::errors::UnknownSessionError;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug)]
struct SessionEntry {
    dir: PathBuf,
    created_at: Instant,
    last_access: Instant,
    /// Number of processing tasks currently pinning this session. The sweep
    /// never deletes a pinned session, however stale its last access.
    in_flight: usize,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub age_seconds: u64,
    pub idle_seconds: u64,
    pub in_flight: bool,
}

/// Registry of active sessions and their working directories.
///
/// Every access path (upload, download page, file fetch) touches the session;
/// the periodic sweep deletes whatever has been idle past the TTL. All
/// mutation goes through one lock, shared safely between request handlers and
/// the sweep task.
pub struct SessionStore {
    root: PathBuf,
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate a fresh session id and create its working directory.
    pub fn create(&self) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        let dir = self.root.join(&session_id);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create session directory '{}'", dir.display()))?;

        let now = Instant::now();
        self.sessions.write().insert(
            session_id.clone(),
            SessionEntry {
                dir,
                created_at: now,
                last_access: now,
                in_flight: 0,
            },
        );
        tracing::debug!(%session_id, "session created");
        Ok(session_id)
    }

    /// Reset the expiry clock. No-op for unknown sessions.
    pub fn touch(&self, session_id: &str) {
        if let Some(entry) = self.sessions.write().get_mut(session_id) {
            entry.last_access = Instant::now();
        }
    }

    /// Working directory of a session; touches it as an access.
    pub fn dir(&self, session_id: &str) -> Result<PathBuf, UnknownSessionError> {
        let mut sessions = self.sessions.write();
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| UnknownSessionError(session_id.to_string()))?;
        entry.last_access = Instant::now();
        Ok(entry.dir.clone())
    }

    /// Drop a session record and recursively delete its directory.
    pub fn remove(&self, session_id: &str) {
        let entry = self.sessions.write().remove(session_id);
        if let Some(entry) = entry {
            delete_dir(session_id, &entry.dir);
        }
    }

    /// Pin a session for the duration of a processing task. The guard keeps
    /// the sweep from deleting the directory out from under the task.
    pub fn begin_processing(
        self: &Arc<Self>,
        session_id: &str,
    ) -> Result<ProcessingGuard, UnknownSessionError> {
        let mut sessions = self.sessions.write();
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| UnknownSessionError(session_id.to_string()))?;
        entry.in_flight += 1;
        entry.last_access = Instant::now();
        Ok(ProcessingGuard {
            store: self.clone(),
            session_id: session_id.to_string(),
        })
    }

    /// Delete every unpinned session whose idle time exceeds the TTL.
    /// Returns the ids that were removed so callers can release whatever
    /// else hangs off a session, such as its progress room.
    pub fn sweep(&self, now: Instant) -> Vec<String> {
        let expired: Vec<(String, PathBuf)> = {
            let mut sessions = self.sessions.write();
            let stale: Vec<String> = sessions
                .iter()
                .filter(|(_, entry)| {
                    entry.in_flight == 0
                        && now.saturating_duration_since(entry.last_access) > self.ttl
                })
                .map(|(id, _)| id.clone())
                .collect();
            stale
                .into_iter()
                .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry.dir)))
                .collect()
        };

        expired
            .into_iter()
            .map(|(session_id, dir)| {
                delete_dir(&session_id, &dir);
                session_id
            })
            .collect()
    }

    pub fn list(&self) -> Vec<SessionSummary> {
        let now = Instant::now();
        self.sessions
            .read()
            .iter()
            .map(|(id, entry)| SessionSummary {
                session_id: id.clone(),
                age_seconds: now.saturating_duration_since(entry.created_at).as_secs(),
                idle_seconds: now.saturating_duration_since(entry.last_access).as_secs(),
                in_flight: entry.in_flight > 0,
            })
            .collect()
    }

    fn end_processing(&self, session_id: &str) {
        if let Some(entry) = self.sessions.write().get_mut(session_id) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
            entry.last_access = Instant::now();
        }
    }
}

/// RAII pin on a session while its background task runs.
pub struct ProcessingGuard {
    store: Arc<SessionStore>,
    session_id: String,
}

impl std::fmt::Debug for ProcessingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingGuard")
            .field("session_id", &self.session_id)
            .finish_non_exhaustive()
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.store.end_processing(&self.session_id);
    }
}

fn delete_dir(session_id: &str, dir: &PathBuf) {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => tracing::info!(session_id, dir = %dir.display(), "deleted session directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(session_id, dir = %dir.display(), error = %e, "failed to delete session directory");
        }
    }
}
