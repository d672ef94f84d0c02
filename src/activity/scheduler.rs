use super::sink::{MetricSink, publish_logged};
use super::table::ActivityTable;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Arms one deferred eviction check per recorded event.
///
/// Checks are never cancelled. Each carries the `last_seen` stamp it was armed
/// with and only evicts if the entry still holds that exact stamp, so a burst
/// of events leaves at most one check that can act.
pub struct ExpirationScheduler {
    table: Arc<ActivityTable>,
    sink: Arc<dyn MetricSink>,
    idle_timeout: Duration,
}

impl ExpirationScheduler {
    pub fn new(table: Arc<ActivityTable>, sink: Arc<dyn MetricSink>, idle_timeout: Duration) -> Self {
        Self {
            table,
            sink,
            idle_timeout,
        }
    }

    /// Spawn the check for an event stamped `observed_last_seen`.
    ///
    /// Must be called from within a tokio runtime. The handle resolves to
    /// whether the check evicted the worker.
    pub fn arm(&self, worker_id: &str, observed_last_seen: Instant) -> JoinHandle<bool> {
        let table = Arc::clone(&self.table);
        let sink = Arc::clone(&self.sink);
        let worker_id = worker_id.to_string();
        // tokio clamps far-future sleeps; `Instant + Duration` would panic instead.
        let wait = match observed_last_seen.checked_add(self.idle_timeout) {
            Some(deadline) => tokio::time::sleep_until(deadline),
            None => tokio::time::sleep(self.idle_timeout),
        };

        tokio::spawn(async move {
            wait.await;
            expire(&table, sink.as_ref(), &worker_id, observed_last_seen)
        })
    }

    /// Run the deferred check now.
    pub fn check(&self, worker_id: &str, observed_last_seen: Instant) -> bool {
        expire(&self.table, self.sink.as_ref(), worker_id, observed_last_seen)
    }
}

fn expire(
    table: &ActivityTable,
    sink: &dyn MetricSink,
    worker_id: &str,
    observed_last_seen: Instant,
) -> bool {
    let Some(entry) = table.take_if_stale(worker_id, observed_last_seen) else {
        return false;
    };

    // The zeros go out after the shard lock is released. A record landing in
    // between can have its count overwritten by 0 until that worker's next event.
    debug!(
        worker_id,
        count = entry.count,
        files = entry.files.len(),
        "activity expired"
    );
    for file_id in &entry.files {
        publish_logged(sink, worker_id, file_id, 0);
    }
    true
}
