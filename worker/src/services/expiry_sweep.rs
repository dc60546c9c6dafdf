use std::{sync::Arc, time::Duration};

use anyhow::Result;
use domain::repositories::subscriptions::SubscriptionRepository;
use tracing::{error, info};

/// Periodically marks active subscriptions whose paid period has ended as
/// expired. Activation extends `ends_at`, so a subscription renewed in time
/// is never touched by the sweep.
pub async fn run(
    subscription_repository: Arc<dyn SubscriptionRepository + Send + Sync>,
    sweep_interval_secs: u64,
) -> Result<()> {
    info!(sweep_interval_secs, "subscription expiry sweep started");

    loop {
        match subscription_repository.expire_overdue().await {
            Ok(0) => {}
            Ok(expired) => info!(expired, "subscriptions expired by sweep"),
            Err(err) => error!(error = %err, "subscription expiry sweep failed"),
        }

        tokio::time::sleep(Duration::from_secs(sweep_interval_secs)).await;
    }
}
