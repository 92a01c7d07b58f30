use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, instrument};

use super::store::RelayStore;

/// Handle to the running reaper task. Stopping it signals the loop to
/// exit and waits for the task to finish.
pub struct ReaperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    pub async fn stop(self) {
        // Receiver side may already be gone if the task exited on its own.
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

/// Spawns the background sweep loop and returns a handle that stops it.
pub fn spawn_reaper(store: Arc<RelayStore>) -> ReaperHandle {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run_reaper(store, shutdown_rx));
    ReaperHandle {
        shutdown: shutdown_tx,
        task,
    }
}

/// Periodically garbage-collects stale rooms and expired messages.
///
/// Runs until the shutdown signal fires. Each tick is a single
/// [`RelayStore::sweep`] under the store lock.
#[instrument(skip(store, shutdown))]
pub async fn run_reaper(store: Arc<RelayStore>, mut shutdown: watch::Receiver<bool>) {
    let sweep_interval = store.config().sweep_interval;
    info!(
        sweep_interval_secs = sweep_interval.as_secs(),
        room_timeout_secs = store.config().room_timeout.as_secs(),
        msg_ttl_secs = store.config().msg_ttl.as_secs(),
        "Starting room reaper background task"
    );

    let mut ticker = interval(sweep_interval);
    // The first tick of a tokio interval fires immediately; consume it so
    // the first real sweep happens one full interval after startup.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let stats = store.sweep();
                debug!(
                    rooms_removed = stats.rooms_removed,
                    messages_dropped = stats.messages_dropped,
                    "Sweep tick"
                );
            }
            _ = shutdown.changed() => {
                info!("Room reaper shutting down");
                break;
            }
        }
    }
}
