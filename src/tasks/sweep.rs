//! Cache Sweep Task
//!
//! Background task that periodically clears the whole cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::BoundedCache;

/// Spawns a background task that calls [`BoundedCache::clear`] on every tick.
///
/// The first clear happens one full `interval` after spawning. The returned
/// handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(BoundedCache::<String>::new(100)?);
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(1800));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<V>(cache: Arc<BoundedCache<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let dropped = cache.clear();
            if dropped > 0 {
                info!("Scheduled cache sweep: dropped {} entries", dropped);
            } else {
                debug!("Scheduled cache sweep: cache already empty");
            }
        }
    })
}
