use prometheus::IntGaugeVec;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    #[error("count {0} does not fit the gauge")]
    OutOfRange(u64),
}

/// Destination for per-worker activity counts.
///
/// Implementations forward the value and keep no state of their own that the
/// activity table depends on.
pub trait MetricSink: Send + Sync {
    fn publish(&self, worker_id: &str, file_id: &str, count: u64) -> Result<(), SinkError>;
}

/// Publish and log failures; the table stays the source of truth.
pub(crate) fn publish_logged(sink: &dyn MetricSink, worker_id: &str, file_id: &str, count: u64) {
    if let Err(err) = sink.publish(worker_id, file_id, count) {
        warn!(
            worker_id,
            file_id,
            count,
            error = %err,
            "failed to publish activity count"
        );
    }
}

/// Writes counts into the `active_file_processing` gauge family.
#[derive(Clone)]
pub struct PrometheusSink {
    gauge: IntGaugeVec,
}

impl PrometheusSink {
    pub fn new(gauge: IntGaugeVec) -> Self {
        Self { gauge }
    }
}

impl MetricSink for PrometheusSink {
    fn publish(&self, worker_id: &str, file_id: &str, count: u64) -> Result<(), SinkError> {
        let value = i64::try_from(count).map_err(|_| SinkError::OutOfRange(count))?;
        self.gauge
            .get_metric_with_label_values(&[worker_id, file_id])
            .map_err(|e| SinkError::Unavailable(e.to_string()))?
            .set(value);
        Ok(())
    }
}

/// In-process sink keeping the last value per `(worker, file)` pair.
///
/// Handy for embedding the tracker without Prometheus and for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    values: Mutex<HashMap<(String, String), u64>>,
    publishes: Mutex<Vec<(String, String, u64)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last count published for the pair, if any.
    pub fn value(&self, worker_id: &str, file_id: &str) -> Option<u64> {
        self.values
            .lock()
            .ok()?
            .get(&(worker_id.to_string(), file_id.to_string()))
            .copied()
    }

    /// Every publish in arrival order.
    pub fn history(&self) -> Vec<(String, String, u64)> {
        self.publishes
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl MetricSink for MemorySink {
    fn publish(&self, worker_id: &str, file_id: &str, count: u64) -> Result<(), SinkError> {
        let key = (worker_id.to_string(), file_id.to_string());
        self.values
            .lock()
            .map_err(|e| SinkError::Unavailable(e.to_string()))?
            .insert(key.clone(), count);
        self.publishes
            .lock()
            .map_err(|e| SinkError::Unavailable(e.to_string()))?
            .push((key.0, key.1, count));
        Ok(())
    }
}
