use async_trait::async_trait;

use crate::domain::{FormatFamily, RawExtraction};

#[async_trait]
pub trait FormatExtractor: Send + Sync {
    fn family(&self) -> FormatFamily;

    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("file is empty")]
    EmptyInput,
    #[error("could not parse {format} content: {reason}")]
    Malformed {
        format: FormatFamily,
        reason: String,
    },
    #[error("{format} extraction timed out after {seconds}s")]
    TimedOut { format: FormatFamily, seconds: u64 },
    #[error("extraction failed: {0}")]
    Internal(String),
}

impl ExtractionError {
    pub fn malformed(format: FormatFamily, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }
}
