//! Prometheus metric families for file processing reports.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `files_processed_total` | Counter | `script_name`, `file_name` |
//! | `rows_in_json_total` | Counter | `script_name`, `file_name` |
//! | `file_processing_time_seconds` | Histogram | `script_name`, `file_name` |
//! | `file_upload_time` | Gauge | `script_name`, `file_name` |
//! | `active_file_processing` | Gauge | `script_name`, `file_name` |
//!
//! Every family lives in a private [`Registry`], so several exporters (or
//! tests) can coexist in one process.

use crate::activity::PrometheusSink;
use crate::core::{FileMetrics, Result};
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry,
    TextEncoder,
};

/// Label names shared by every family.
pub const LABELS: &[&str] = &["script_name", "file_name"];

#[derive(Clone)]
pub struct FileMetricsRegistry {
    registry: Registry,
    files_processed: IntCounterVec,
    rows_processed: IntCounterVec,
    processing_time: HistogramVec,
    upload_time: GaugeVec,
    /// Live activity count per worker, driven by the activity tracker.
    active_processing: IntGaugeVec,
}

impl FileMetricsRegistry {
    /// Creates all families and registers them with a fresh registry.
    ///
    /// # Errors
    ///
    /// Returns an error if a family fails to register.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let files_processed = IntCounterVec::new(
            Opts::new("files_processed_total", "Total number of processed files"),
            LABELS,
        )?;
        let rows_processed = IntCounterVec::new(
            Opts::new("rows_in_json_total", "Total number of rows written to JSON"),
            LABELS,
        )?;
        let processing_time = HistogramVec::new(
            HistogramOpts::new(
                "file_processing_time_seconds",
                "Time spent processing files",
            ),
            LABELS,
        )?;
        let upload_time = GaugeVec::new(
            Opts::new(
                "file_upload_time",
                "Timestamp of file upload (seconds since epoch)",
            ),
            LABELS,
        )?;
        let active_processing = IntGaugeVec::new(
            Opts::new(
                "active_file_processing",
                "Number of files currently being processed",
            ),
            LABELS,
        )?;

        registry.register(Box::new(files_processed.clone()))?;
        registry.register(Box::new(rows_processed.clone()))?;
        registry.register(Box::new(processing_time.clone()))?;
        registry.register(Box::new(upload_time.clone()))?;
        registry.register(Box::new(active_processing.clone()))?;

        Ok(Self {
            registry,
            files_processed,
            rows_processed,
            processing_time,
            upload_time,
            active_processing,
        })
    }

    /// Account for one processed file.
    pub fn track_file(&self, body: &FileMetrics) -> Result<()> {
        let labels = [body.script_name.as_str(), body.file_name.as_str()];

        self.files_processed.get_metric_with_label_values(&labels)?.inc();
        self.rows_processed
            .get_metric_with_label_values(&labels)?
            .inc_by(body.rows);
        self.processing_time
            .get_metric_with_label_values(&labels)?
            .observe(body.processing_time);
        self.upload_time
            .get_metric_with_label_values(&labels)?
            .set(unix_seconds_now());

        Ok(())
    }

    /// Sink that writes activity counts into `active_file_processing`.
    pub fn activity_sink(&self) -> PrometheusSink {
        PrometheusSink::new(self.active_processing.clone())
    }

    /// Render every family in the Prometheus text exposition format.
    pub fn encode_text(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

fn unix_seconds_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
