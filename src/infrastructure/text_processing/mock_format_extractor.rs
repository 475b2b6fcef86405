use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{ExtractionError, FormatExtractor};
use crate::domain::{FormatFamily, RawContentUnit, RawExtraction};

/// Test double that turns each non-empty UTF-8 line into a paragraph.
/// Per-file delays and panics exercise ordering and isolation.
pub struct MockFormatExtractor {
    family: FormatFamily,
    delays: HashMap<String, Duration>,
    panicking: Vec<String>,
}

impl MockFormatExtractor {
    pub fn new(family: FormatFamily) -> Self {
        Self {
            family,
            delays: HashMap::new(),
            panicking: Vec::new(),
        }
    }

    pub fn with_delay(mut self, file_name: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(file_name.into(), delay);
        self
    }

    pub fn panicking_on(mut self, file_name: impl Into<String>) -> Self {
        self.panicking.push(file_name.into());
        self
    }
}

#[async_trait]
impl FormatExtractor for MockFormatExtractor {
    fn family(&self) -> FormatFamily {
        self.family
    }

    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError> {
        if let Some(delay) = self.delays.get(file_name) {
            tokio::time::sleep(*delay).await;
        }

        if self.panicking.iter().any(|name| name == file_name) {
            panic!("mock extractor panicked on {file_name}");
        }

        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let text = std::str::from_utf8(data)
            .map_err(|e| ExtractionError::malformed(self.family, format!("invalid UTF-8: {e}")))?;

        let units = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(RawContentUnit::paragraph)
            .collect();

        Ok(RawExtraction::new(units).with_metadata("mock", true))
    }
}
