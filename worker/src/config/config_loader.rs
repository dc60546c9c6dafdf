use anyhow::{Ok, Result};

use super::config_model::{Database, DotEnvyConfig, Worker};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let worker = Worker {
        poll_interval_secs: std::env::var("WORKER_POLL_INTERVAL")
            .unwrap_or_else(|_| "5".to_string())
            .parse()?,
        max_attempts: std::env::var("WORKER_MAX_ATTEMPTS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()?,
        sweep_interval_secs: std::env::var("WORKER_SWEEP_INTERVAL")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig { database, worker })
}
