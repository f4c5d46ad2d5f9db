use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Operations slower than this are logged at `warn`.
pub const SLOW_OPERATION: Duration = Duration::from_millis(500);

/// Logs how long an operation took when dropped.
///
/// ```ignore
/// async fn reorder(...) -> Result<Json<Vec<Block>>, ApiError> {
///     let _timer = OperationTimer::new("reorder_blocks");
///     // ...
/// }
/// ```
pub struct OperationTimer {
    name: &'static str,
    request_id: Option<String>,
    start: Instant,
}

impl OperationTimer {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            request_id: None,
            start: Instant::now(),
        }
    }

    /// Tag the log line with a request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let request_id = self.request_id.as_deref().unwrap_or("-");
        if duration >= SLOW_OPERATION {
            warn!(
                operation = %self.name,
                request_id = %request_id,
                duration_ms = %duration.as_millis(),
                "Slow operation"
            );
        } else {
            info!(
                operation = %self.name,
                request_id = %request_id,
                duration_ms = %duration.as_millis(),
                "Operation completed"
            );
        }
    }
}

/// Short request id for log correlation: the first 8 hex digits of a v4 UUID.
#[must_use]
pub fn generate_request_id() -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    uuid.get(..8).unwrap_or(&uuid).to_string()
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod metrics_tests;
