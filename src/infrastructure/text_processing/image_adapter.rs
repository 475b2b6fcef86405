use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{ExtractionError, FormatExtractor};
use crate::application::services::{OcrAdapter, ocr_error_text};
use crate::domain::{FormatFamily, RawContentUnit, RawExtraction};

/// Raster images. The recognized text becomes a single paragraph; OCR
/// failures still produce a document carrying the `[OCR Error]` text.
pub struct ImageAdapter {
    ocr: Arc<OcrAdapter>,
}

impl ImageAdapter {
    pub fn new(ocr: Arc<OcrAdapter>) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl FormatExtractor for ImageAdapter {
    fn family(&self) -> FormatFamily {
        FormatFamily::Image
    }

    #[tracing::instrument(skip(self, data), fields(file_name = %file_name, bytes = data.len()))]
    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let (text, failure) = match self.ocr.recognize_guarded(data).await {
            Ok(text) => (text, None),
            Err(reason) => (ocr_error_text(&reason), Some(reason)),
        };
        let mut extraction = RawExtraction::new(vec![RawContentUnit::paragraph(text)])
            .with_metadata("ocrLanguages", self.ocr.languages());

        if let Some(reason) = failure {
            tracing::warn!(reason = %reason, "Image extracted with OCR error text");
            extraction = extraction.with_metadata("ocrError", reason);
        }

        Ok(extraction)
    }
}
