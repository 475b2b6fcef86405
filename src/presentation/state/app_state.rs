use std::sync::Arc;

use crate::application::ports::FormatRouter;
use crate::application::services::BatchOrchestrator;

pub struct AppState<R: ?Sized>
where
    R: FormatRouter,
{
    pub orchestrator: Arc<BatchOrchestrator<R>>,
    pub max_file_bytes: usize,
    pub max_request_bytes: usize,
}

impl<R: ?Sized> Clone for AppState<R>
where
    R: FormatRouter,
{
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            max_file_bytes: self.max_file_bytes,
            max_request_bytes: self.max_request_bytes,
        }
    }
}
