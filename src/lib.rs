// ============================================================================
// Activity Exporter Library
// ============================================================================

//! Prometheus exporter for script file-processing reports.
//!
//! Worker scripts post a report per processed file. Reports feed counters and
//! histograms, and a live per-script activity gauge that falls back to zero
//! once the script has been silent for the configured idle timeout.
//!
//! # Examples
//!
//! ```
//! use activity_exporter::{ActivityEvent, ActivityTracker, MemorySink};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sink = Arc::new(MemorySink::new());
//! let tracker = ActivityTracker::new(sink.clone(), Duration::from_secs(60));
//!
//! assert_eq!(tracker.record(&ActivityEvent::new("ingest.py", "orders.csv")), 1);
//! assert_eq!(tracker.record(&ActivityEvent::new("ingest.py", "orders.csv")), 2);
//! assert_eq!(sink.value("ingest.py", "orders.csv"), Some(2));
//! # }
//! ```

pub mod activity;
pub mod config;
pub mod core;
pub mod metrics;
pub mod server;
pub mod web;

// Re-export main types for convenience
pub use activity::{
    ActivitySnapshot, ActivityTable, ActivityTracker, ExpirationScheduler, MemorySink, MetricSink,
    PrometheusSink, SinkError,
};
pub use config::ExporterConfig;
pub use crate::core::{ActivityEvent, ExporterError, FileMetrics, Result};
pub use metrics::FileMetricsRegistry;
pub use server::HttpServer;
pub use web::{AppState, WebError, router};
