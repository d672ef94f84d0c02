use super::scheduler::ExpirationScheduler;
use super::sink::{MetricSink, publish_logged};
use super::table::{ActivitySnapshot, ActivityTable};
use crate::core::ActivityEvent;
use std::sync::Arc;
use std::time::Duration;

/// Entry point for activity events: table update, publish, then arm expiry.
///
/// Construct one per process and share it behind an `Arc`.
pub struct ActivityTracker {
    table: Arc<ActivityTable>,
    sink: Arc<dyn MetricSink>,
    scheduler: ExpirationScheduler,
}

impl ActivityTracker {
    pub fn new(sink: Arc<dyn MetricSink>, idle_timeout: Duration) -> Self {
        let table = Arc::new(ActivityTable::new());
        let scheduler = ExpirationScheduler::new(Arc::clone(&table), Arc::clone(&sink), idle_timeout);
        Self {
            table,
            sink,
            scheduler,
        }
    }

    /// Record one event and return the worker's new count.
    ///
    /// Requires a tokio runtime for the expiration check it arms.
    pub fn record(&self, event: &ActivityEvent) -> u64 {
        let record = self
            .table
            .record(&event.worker_id, &event.file_id, event.row_delta);

        publish_logged(self.sink.as_ref(), &event.worker_id, &event.file_id, record.count);
        // Dropping the handle detaches the check.
        let _ = self.scheduler.arm(&event.worker_id, record.last_seen);

        record.count
    }

    pub fn snapshot(&self, worker_id: &str) -> Option<ActivitySnapshot> {
        self.table.snapshot(worker_id)
    }

    pub fn table(&self) -> &ActivityTable {
        &self.table
    }
}
