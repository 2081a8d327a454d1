//! TTL Cleanup Task
//!
//! Background task that periodically removes expired store entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::SharedMemoryStore;

/// Spawns a background task that sweeps expired entries out of `store`.
///
/// Keys tracked by a tagged cache over the same store are left alone; a
/// later prefix-clear deletes them as no-ops.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = SharedMemoryStore::new(1000);
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: SharedMemoryStore, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::KeyValueStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let store = SharedMemoryStore::new(100);
        KeyValueStore::set(&store, "expire_soon", json!("value"), 1)
            .await
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(2500)).await;

        // Checked via len so the sweep, not a read, is what removed it.
        assert!(store.is_empty().await, "Expired entry should have been swept");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = SharedMemoryStore::new(100);
        KeyValueStore::set(&store, "long_lived", json!("value"), 3600)
            .await
            .unwrap();

        let handle = spawn_cleanup_task(store.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            KeyValueStore::get(&store, "long_lived").await.unwrap(),
            Some(json!("value"))
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(SharedMemoryStore::new(100), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
