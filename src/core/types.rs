use super::{ExporterError, Result};
use serde::{Deserialize, Serialize};

/// Request body posted by a worker script after it handled a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub script_name: String,
    pub file_name: String,
    pub rows: u64,
    pub processing_time: f64,
}

impl FileMetrics {
    pub fn new(script_name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            script_name: script_name.into(),
            file_name: file_name.into(),
            rows: 0,
            processing_time: 0.0,
        }
    }

    pub fn rows(mut self, rows: u64) -> Self {
        self.rows = rows;
        self
    }

    pub fn processing_time(mut self, seconds: f64) -> Self {
        self.processing_time = seconds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.script_name.trim().is_empty() {
            return Err(ExporterError::Validation(
                "script_name cannot be empty".to_string(),
            ));
        }

        if self.file_name.trim().is_empty() {
            return Err(ExporterError::Validation(
                "file_name cannot be empty".to_string(),
            ));
        }

        if !self.processing_time.is_finite() || self.processing_time < 0.0 {
            return Err(ExporterError::Validation(format!(
                "processing_time must be a non-negative number, got {}",
                self.processing_time
            )));
        }

        Ok(())
    }

    /// The activity event this request contributes to the worker's live gauge.
    pub fn activity_event(&self) -> ActivityEvent {
        ActivityEvent::new(&self.script_name, &self.file_name)
    }
}

/// One unit of work reported by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub worker_id: String,
    pub file_id: String,
    pub row_delta: u64,
}

impl ActivityEvent {
    pub fn new(worker_id: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            file_id: file_id.into(),
            row_delta: 1,
        }
    }

    pub fn row_delta(mut self, delta: u64) -> Self {
        self.row_delta = delta;
        self
    }
}
