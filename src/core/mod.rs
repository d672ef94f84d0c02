pub mod error;
pub mod types;

pub use error::{ExporterError, Result};
pub use types::{ActivityEvent, FileMetrics};
