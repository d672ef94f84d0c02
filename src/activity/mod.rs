//! Live per-worker activity counters that fall back to zero once a worker
//! goes quiet for the idle window.

pub mod scheduler;
pub mod sink;
pub mod table;
pub mod tracker;

pub use scheduler::ExpirationScheduler;
pub use sink::{MemorySink, MetricSink, PrometheusSink, SinkError};
pub use table::{ActivityEntry, ActivityRecord, ActivitySnapshot, ActivityTable};
pub use tracker::ActivityTracker;
