use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Runtime configuration for the processing core.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory under which per-session working directories are created.
    pub work_root: PathBuf,
    /// Idle time after which a session and its directory are deleted.
    pub session_ttl: Duration,
    /// How often the expiry sweep runs.
    pub sweep_interval: Duration,
    /// Capacity of each session's progress broadcast channel.
    pub channel_capacity: usize,
}

impl AppConfig {
    pub fn new(work_root: impl Into<PathBuf>) -> Self {
        Self {
            work_root: work_root.into(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }
}
