//! Run filesystem work on Tokio's blocking pool.

use crate::error::SourceError;

/// Execute `task` on the blocking pool and flatten the join failure into
/// [`SourceError::Worker`].
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T, SourceError>
where
    F: FnOnce() -> Result<T, SourceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| SourceError::Worker {
            message: err.to_string(),
        })?
}
