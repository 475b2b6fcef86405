use std::sync::Arc;

use super::format_extractor::FormatExtractor;

pub trait FormatRouter: Send + Sync {
    fn route(
        &self,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Arc<dyn FormatExtractor>, UnsupportedFormatError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported file format: {file_name} ({mime_type})")]
pub struct UnsupportedFormatError {
    pub file_name: String,
    pub mime_type: String,
}
