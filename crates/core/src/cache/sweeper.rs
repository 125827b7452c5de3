//! Background sweep of expired cache entries.
//!
//! The sweeper holds only a weak reference to the cache: it exits on its own
//! once the cache is dropped, or earlier when its token is cancelled.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use super::MemoryCache;

/// Shortest sweep period; shorter requests are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Spawn the periodic sweep and return the token that stops it.
///
/// `every` is clamped to [`MIN_SWEEP_INTERVAL`].
pub fn spawn_sweeper(cache: &Arc<MemoryCache>, every: Duration) -> CancellationToken {
    let cancel = CancellationToken::new();
    spawn_sweep_task(cache, every, cancel.clone());
    cancel
}

fn spawn_sweep_task(cache: &Arc<MemoryCache>, every: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    let cache = Arc::downgrade(cache);
    let every = every.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        run_sweep_loop(cache, every, cancel).await;
    })
}

async fn run_sweep_loop(cache: Weak<MemoryCache>, every: Duration, cancel: CancellationToken) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(interval_ms = every.as_millis() as u64, "cache sweeper started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("cache sweeper shutting down");
                break;
            }
            _ = ticker.tick() => {
                let Some(cache) = cache.upgrade() else {
                    tracing::debug!("cache dropped, sweeper exiting");
                    break;
                };
                cache.evict_expired().await;
            }
        }
    }
}
