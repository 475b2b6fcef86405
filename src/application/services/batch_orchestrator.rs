use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::application::ports::{ExtractionError, FormatRouter, UnsupportedFormatError};
use crate::domain::{
    DocumentId, ExtractedDocument, ExtractionResult, FilePayload, IncomingFile,
};

use super::chunk_normalizer::ChunkNormalizer;

/// Runs every file of a batch as its own task and hands the outcomes back
/// in submission order.
pub struct BatchOrchestrator<R: ?Sized>
where
    R: FormatRouter,
{
    router: Arc<R>,
    deadline: Option<Duration>,
}

impl<R: ?Sized> BatchOrchestrator<R>
where
    R: FormatRouter + 'static,
{
    pub fn new(router: Arc<R>) -> Self {
        Self {
            router,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn run(&self, files: Vec<IncomingFile>) -> Vec<ExtractionResult> {
        let file_count = files.len();
        tracing::info!(file_count, "Starting batch extraction");

        let file_names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
        let mut tasks = FileTasks::default();

        for (index, file) in files.into_iter().enumerate() {
            let router = Arc::clone(&self.router);
            let span = tracing::info_span!(
                "extract_file",
                index,
                file_name = %file.name,
                mime_type = %file.mime_type,
            );
            tasks
                .handles
                .push(tokio::spawn(process_file(router, file).instrument(span)));
        }

        let deadline = self.deadline.map(|d| tokio::time::Instant::now() + d);
        let mut results = Vec::with_capacity(file_count);

        for (handle, file_name) in tasks.handles.iter_mut().zip(file_names) {
            let joined = match deadline {
                Some(at) => match tokio::time::timeout_at(at, &mut *handle).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        handle.abort();
                        Ok(Err(FileFailure::DeadlineExceeded))
                    }
                },
                None => (&mut *handle).await,
            };

            let result = match joined {
                Ok(Ok(document)) => ExtractionResult::Success(document),
                Ok(Err(failure)) => {
                    tracing::warn!(file_name = %file_name, error = %failure, "File extraction failed");
                    ExtractionResult::failure(file_name, failure.to_string())
                }
                Err(join_error) => {
                    let failure = FileFailure::TaskAborted(join_error.to_string());
                    tracing::error!(file_name = %file_name, error = %failure, "File extraction task died");
                    ExtractionResult::failure(file_name, failure.to_string())
                }
            };
            results.push(result);
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        tracing::info!(
            file_count,
            succeeded,
            failed = file_count - succeeded,
            "Batch extraction complete"
        );

        results
    }
}

async fn process_file<R>(router: Arc<R>, file: IncomingFile) -> Result<ExtractedDocument, FileFailure>
where
    R: FormatRouter + ?Sized,
{
    let data = match file.payload {
        FilePayload::Bytes(data) => data,
        FilePayload::Rejected(reason) => return Err(FileFailure::Rejected(reason)),
    };

    let extractor = router.route(&file.name, &file.mime_type)?;
    tracing::debug!(family = %extractor.family(), bytes = data.len(), "Routed file");

    let raw = extractor.extract(&data, &file.name).await?;
    let raw_unit_count = raw.units.len();
    let chunks = ChunkNormalizer::normalize(raw.units);

    tracing::info!(
        raw_units = raw_unit_count,
        chunks = chunks.len(),
        "File extraction complete"
    );

    Ok(ExtractedDocument {
        id: DocumentId::new(),
        file_name: file.name,
        mime_type: file.mime_type,
        metadata: raw.metadata,
        chunks,
    })
}

/// Aborts whatever is still running when the batch is abandoned.
#[derive(Default)]
struct FileTasks {
    handles: Vec<JoinHandle<Result<ExtractedDocument, FileFailure>>>,
}

impl Drop for FileTasks {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileFailure {
    #[error("file rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedFormatError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("extraction did not finish before the batch deadline")]
    DeadlineExceeded,
    #[error("extraction task aborted: {0}")]
    TaskAborted(String),
}
