use axum::Json;
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::BytesMut;

use crate::application::ports::FormatRouter;
use crate::domain::IncomingFile;
use crate::presentation::state::AppState;

use super::extract_types::{ErrorResponse, ResponseAssembler};

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Failures that reject the whole request rather than a single file.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("no files were uploaded")]
    NoFiles,
    #[error("failed to read multipart body: {0}")]
    Multipart(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn extract_handler<R>(
    State(state): State<AppState<R>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response
where
    R: FormatRouter + ?Sized + 'static,
{
    let files = match read_request(multipart, state.max_file_bytes).await {
        Ok(files) => files,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting extraction request");
            return e.into_response();
        }
    };

    tracing::info!(file_count = files.len(), "Extraction request received");

    let results = state.orchestrator.run(files).await;

    (StatusCode::OK, Json(ResponseAssembler::assemble(results))).into_response()
}

async fn read_request(
    multipart: Result<Multipart, MultipartRejection>,
    max_file_bytes: usize,
) -> Result<Vec<IncomingFile>, RequestError> {
    let multipart = multipart.map_err(|rejection| RequestError::Multipart(rejection.body_text()))?;
    read_files(multipart, max_file_bytes).await
}

/// Collects every part that carries a file name. Parts over the size limit
/// are kept as rejected files so they still get a result slot.
async fn read_files(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<Vec<IncomingFile>, RequestError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::Multipart(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            tracing::debug!(field = ?field.name(), "Ignoring non-file multipart field");
            continue;
        };
        let mime_type = field
            .content_type()
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        tracing::debug!(file_name = %file_name, mime_type = %mime_type, "Reading uploaded file");

        let file = match read_limited(field, max_file_bytes).await? {
            Some(data) => IncomingFile::new(file_name, mime_type, data.freeze()),
            None => {
                tracing::warn!(file_name = %file_name, max_file_bytes, "Uploaded file exceeds size limit");
                IncomingFile::rejected(
                    file_name,
                    mime_type,
                    format!("file exceeds the {max_file_bytes} byte limit"),
                )
            }
        };
        files.push(file);
    }

    if files.is_empty() {
        return Err(RequestError::NoFiles);
    }

    Ok(files)
}

/// Buffers a part up to `limit` bytes; `None` once the limit is crossed.
async fn read_limited(mut field: Field<'_>, limit: usize) -> Result<Option<BytesMut>, RequestError> {
    let mut data = BytesMut::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| RequestError::Multipart(e.to_string()))?
    {
        if data.len() + chunk.len() > limit {
            return Ok(None);
        }
        data.extend_from_slice(&chunk);
    }

    Ok(Some(data))
}
