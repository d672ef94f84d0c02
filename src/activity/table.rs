use dashmap::DashMap;
use std::collections::BTreeSet;
use tokio::time::Instant;

/// Live activity state for one worker.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub worker_id: String,
    pub count: u64,
    pub last_seen: Instant,
    /// File ids whose gauge was published while this entry was alive.
    pub files: BTreeSet<String>,
}

impl ActivityEntry {
    fn new(worker_id: &str, now: Instant) -> Self {
        Self {
            worker_id: worker_id.to_string(),
            count: 0,
            last_seen: now,
            files: BTreeSet::new(),
        }
    }
}

/// Result of a single `record` call: the new count and the stamp a deferred
/// check must match to evict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityRecord {
    pub count: u64,
    pub last_seen: Instant,
}

/// Read-only view of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivitySnapshot {
    pub count: u64,
    pub last_seen: Instant,
}

/// Per-worker activity counters.
///
/// Entries live in a sharded concurrent map: updates to one worker hold only
/// that worker's entry guard, so distinct workers never contend on a single
/// lock. The stamp is taken inside the guard, which keeps `last_seen`
/// ordered the same way `record` calls for a worker were accepted.
#[derive(Debug, Default)]
pub struct ActivityTable {
    entries: DashMap<String, ActivityEntry>,
}

impl ActivityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `row_delta` to the worker's count, creating the entry if absent.
    pub fn record(&self, worker_id: &str, file_id: &str, row_delta: u64) -> ActivityRecord {
        let slot = self.entries.entry(worker_id.to_string());
        // Taken while the shard guard is held so stamps follow acceptance order.
        let now = Instant::now();
        let mut entry = slot.or_insert_with(|| ActivityEntry::new(worker_id, now));

        entry.count = entry.count.saturating_add(row_delta);
        entry.last_seen = now;
        if !entry.files.contains(file_id) {
            entry.files.insert(file_id.to_string());
        }

        ActivityRecord {
            count: entry.count,
            last_seen: entry.last_seen,
        }
    }

    /// Remove the entry if nothing refreshed it since `observed_last_seen`.
    pub fn evict_if_stale(&self, worker_id: &str, observed_last_seen: Instant) -> bool {
        self.take_if_stale(worker_id, observed_last_seen).is_some()
    }

    /// Like [`evict_if_stale`](Self::evict_if_stale) but hands back the removed entry.
    pub fn take_if_stale(
        &self,
        worker_id: &str,
        observed_last_seen: Instant,
    ) -> Option<ActivityEntry> {
        self.entries
            .remove_if(worker_id, |_, entry| entry.last_seen == observed_last_seen)
            .map(|(_, entry)| entry)
    }

    pub fn snapshot(&self, worker_id: &str) -> Option<ActivitySnapshot> {
        self.entries.get(worker_id).map(|entry| ActivitySnapshot {
            count: entry.count,
            last_seen: entry.last_seen,
        })
    }

    pub fn contains(&self, worker_id: &str) -> bool {
        self.entries.contains_key(worker_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Worker ids currently tracked, sorted.
    pub fn workers(&self) -> Vec<String> {
        let mut workers: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        workers.sort();
        workers
    }
}
