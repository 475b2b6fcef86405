use std::time::Duration;

use crate::application::ports::ExtractionError;
use crate::domain::FormatFamily;

pub const DEFAULT_PARSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs a CPU-bound parser on the blocking pool, bounded by `timeout`.
///
/// A timeout only abandons the result: blocking tasks cannot be cancelled,
/// so the parser keeps its thread until it returns on its own.
pub async fn parse_on_blocking_pool<T, F>(
    format: FormatFamily,
    timeout: Duration,
    parse: F,
) -> Result<T, ExtractionError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ExtractionError> + Send + 'static,
{
    tokio::time::timeout(timeout, tokio::task::spawn_blocking(parse))
        .await
        .map_err(|_| ExtractionError::TimedOut {
            format,
            seconds: timeout.as_secs(),
        })?
        .map_err(|e| ExtractionError::Internal(format!("task join error: {e}")))?
}
