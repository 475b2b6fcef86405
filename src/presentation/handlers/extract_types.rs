use serde::{Deserialize, Serialize};

use crate::domain::{ContentChunk, ExtractedDocument, ExtractionResult, Metadata};

#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub results: Vec<ExtractionResultDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wire form of one file's outcome, discriminated by `success`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionResultDto {
    Success(SuccessResultDto),
    Failure(FailureResultDto),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResultDto {
    pub success: bool,
    pub document: DocumentDto,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResultDto {
    pub success: bool,
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDto {
    pub document_id: String,
    pub file_name: String,
    pub mime_type: String,
    pub metadata: Metadata,
    pub chunks: Vec<ChunkDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkDto {
    pub id: String,
    #[serde(rename = "type")]
    pub chunk_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// Maps orchestrator results onto the response envelope, one entry per
/// result in the same order.
pub struct ResponseAssembler;

impl ResponseAssembler {
    pub fn assemble(results: Vec<ExtractionResult>) -> ExtractResponse {
        ExtractResponse {
            results: results.into_iter().map(ExtractionResultDto::from).collect(),
        }
    }
}

impl From<ExtractionResult> for ExtractionResultDto {
    fn from(result: ExtractionResult) -> Self {
        match result {
            ExtractionResult::Success(document) => Self::Success(SuccessResultDto {
                success: true,
                document: document.into(),
            }),
            ExtractionResult::Failure { file_name, error } => Self::Failure(FailureResultDto {
                success: false,
                file_name,
                error,
            }),
        }
    }
}

impl From<ExtractedDocument> for DocumentDto {
    fn from(document: ExtractedDocument) -> Self {
        Self {
            document_id: document.id.as_uuid().to_string(),
            file_name: document.file_name,
            mime_type: document.mime_type,
            metadata: document.metadata,
            chunks: document.chunks.into_iter().map(ChunkDto::from).collect(),
        }
    }
}

impl From<ContentChunk> for ChunkDto {
    fn from(chunk: ContentChunk) -> Self {
        Self {
            id: chunk.id.to_string(),
            chunk_type: chunk.chunk_type.as_str().to_string(),
            text: chunk.text,
            page: chunk.page,
            section: chunk.section,
        }
    }
}
