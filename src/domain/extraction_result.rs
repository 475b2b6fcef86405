use super::document::ExtractedDocument;

/// Outcome of processing one uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionResult {
    Success(ExtractedDocument),
    Failure { file_name: String, error: String },
}

impl ExtractionResult {
    pub fn failure(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failure {
            file_name: file_name.into(),
            error: error.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            ExtractionResult::Success(document) => &document.file_name,
            ExtractionResult::Failure { file_name, .. } => file_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success(_))
    }
}
