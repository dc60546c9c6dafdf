#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub database: Database,
    pub worker: Worker,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Worker {
    /// Seconds to sleep when the queue is empty.
    pub poll_interval_secs: u64,
    /// Attempts before a callback job is dead-lettered.
    pub max_attempts: i32,
    /// Seconds between subscription expiry sweeps.
    pub sweep_interval_secs: u64,
}
