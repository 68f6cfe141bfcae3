//! Fire-and-forget background purge of stale preview rows.
//!
//! Listings on preview-flagged channels submit a purge task and move on;
//! the request never waits on or observes the purge. Failures are logged
//! and dropped — a later listing on the same channel resubmits naturally.

use siteforge_store::ContentStore;
use siteforge_types::ChannelId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// One unit of background purge work.
#[derive(Debug, Clone)]
pub struct PurgeTask {
    pub table: String,
    pub channel: ChannelId,
}

/// Handle to the bounded background purge queue.
#[derive(Clone)]
pub struct PurgeQueue {
    tx: mpsc::Sender<PurgeTask>,
}

impl PurgeQueue {
    /// Spawns the worker task and returns the queue handle plus the worker's
    /// join handle (kept by the embedding application for shutdown).
    pub fn start(store: ContentStore, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<PurgeTask>(capacity);
        let handle = tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                let store = store.clone();
                let PurgeTask { table, channel } = task;
                let result = tokio::task::spawn_blocking({
                    let table = table.clone();
                    move || store.delete_preview_contents(&table, channel)
                })
                .await;
                match result {
                    Ok(Ok(_)) => {}
                    Ok(Err(err)) => {
                        warn!(%table, %channel, error = %err, "preview purge failed");
                    }
                    Err(err) => {
                        warn!(%table, %channel, error = %err, "preview purge task panicked");
                    }
                }
            }
        });
        (Self { tx }, handle)
    }

    /// Submits a purge without blocking. A full queue drops the task; the
    /// next listing on the channel will submit again.
    pub fn submit(&self, task: PurgeTask) {
        if let Err(err) = self.tx.try_send(task) {
            warn!(error = %err, "purge queue full, dropping task");
        }
    }
}
