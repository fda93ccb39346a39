use crate::config::AppConfig;
use crate::errors::UnknownSessionError;
use crate::progress::{ChannelPublisher, ProgressEvent};
use crate::session::SessionStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Shared state of the processing core: configuration, the session registry,
/// the progress publisher, and the registry of in-flight processing tasks.
///
/// The task registry exists so a future cancellation or crash-recovery path
/// has a handle per session; v1 only inserts and removes entries.
pub struct AppState {
    config: Arc<AppConfig>,
    sessions: Arc<SessionStore>,
    publisher: Arc<ChannelPublisher>,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let sessions = Arc::new(SessionStore::new(&config.work_root, config.session_ttl));
        let publisher = Arc::new(ChannelPublisher::new(config.channel_capacity));
        Self {
            config: Arc::new(config),
            sessions,
            publisher,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn publisher(&self) -> &Arc<ChannelPublisher> {
        &self.publisher
    }

    /// Launch the periodic expiry sweep. Cancel the returned token on
    /// shutdown to stop it cleanly.
    pub fn start_sweeper(self: &Arc<Self>) -> (CancellationToken, JoinHandle<()>) {
        let token = CancellationToken::new();
        let state = self.clone();
        let shutdown = token.clone();
        let interval = self.config.sweep_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so a fresh store is
            // not swept before anything has aged.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::debug!("session sweeper stopped");
                        return;
                    }
                    _ = ticker.tick() => state.sweep_sessions(std::time::Instant::now()),
                }
            }
        });
        (token, handle)
    }

    /// Sweep expired sessions and drop their progress rooms with them.
    pub fn sweep_sessions(&self, now: std::time::Instant) {
        for session_id in self.sessions.sweep(now) {
            self.publisher.close(&session_id);
        }
    }

    /// Explicitly delete a session, its directory, and its progress room.
    pub fn remove_session(&self, session_id: &str) {
        self.sessions.remove(session_id);
        self.publisher.close(session_id);
    }

    /// Lifecycle hook for the web layer: every session-related access resets
    /// the expiry clock.
    pub fn on_session_touch(&self, session_id: &str) {
        self.sessions.touch(session_id);
    }

    /// Resolve a file inside a session's directory, touching the session.
    pub fn session_file(
        &self,
        session_id: &str,
        filename: &str,
    ) -> Result<PathBuf, UnknownSessionError> {
        let dir = self.sessions.dir(session_id)?;
        Ok(dir.join(filename))
    }

    pub fn subscribe(&self, session_id: &str) -> broadcast::Receiver<ProgressEvent> {
        self.publisher.subscribe(session_id)
    }

    /// Spawn a session's processing task and record its handle. The insert
    /// happens under the registry lock, and the task's own unregister takes
    /// the same lock, so the handle always lands before it can be removed.
    pub(crate) fn spawn_task<F>(&self, session_id: &str, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock();
        let handle = tokio::spawn(task);
        tasks.insert(session_id.to_string(), handle);
    }

    pub(crate) fn unregister_task(&self, session_id: &str) {
        self.tasks.lock().remove(session_id);
    }

    pub fn active_task_count(&self) -> usize {
        self.tasks.lock().len()
    }
}
