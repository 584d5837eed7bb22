use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::tracker::Tracker;

/// Refresh all active items every `period`, starting one period from now.
/// Runs alongside user-triggered refreshes without coordinating with them.
pub fn start_refresh_interval(tracker: Arc<Tracker>, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "Starting periodic refresh loop");

    tokio::spawn(async move {
        loop {
            tokio::time::sleep(period).await;
            if let Err(e) = tracker.refresh_all().await {
                error!(error = %e, "Periodic refresh failed");
            }
            let evicted = tracker.pipeline().evict_expired();
            if evicted > 0 {
                info!(evicted, "Evicted expired cache entries");
            }
        }
    })
}
