use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{ExtractionError, FormatExtractor};
use crate::domain::{FormatFamily, RawContentUnit, RawExtraction};

use super::blocking_parse::{DEFAULT_PARSE_TIMEOUT, parse_on_blocking_pool};
use super::text_sanitizer::split_text_blocks;

pub struct PdfAdapter {
    timeout: Duration,
}

struct PageContent {
    page_number: u32,
    text: String,
}

impl PdfAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn extract_pages(path: &std::path::Path) -> Result<(usize, Vec<PageContent>), ExtractionError> {
        let mut doc = PdfDocument::open(path).map_err(|e| {
            ExtractionError::malformed(FormatFamily::Pdf, format!("failed to parse PDF: {e}"))
        })?;

        let page_count = doc.page_count().map_err(|e| {
            ExtractionError::malformed(
                FormatFamily::Pdf,
                format!("failed to read page count: {e}"),
            )
        })?;

        let mut pages = Vec::with_capacity(page_count);

        for page_index in 0..page_count {
            let text = match doc.extract_text(page_index) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(page = page_index + 1, error = %e, "Skipping unreadable PDF page");
                    continue;
                }
            };

            if !text.trim().is_empty() {
                pages.push(PageContent {
                    page_number: (page_index + 1) as u32,
                    text,
                });
            }
        }

        Ok((page_count, pages))
    }
}

impl Default for PdfAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_PARSE_TIMEOUT)
    }
}

#[async_trait]
impl FormatExtractor for PdfAdapter {
    fn family(&self) -> FormatFamily {
        FormatFamily::Pdf
    }

    #[tracing::instrument(skip(self, data), fields(file_name = %file_name, bytes = data.len()))]
    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let mut temp_file = tempfile::NamedTempFile::new().map_err(|e| {
            ExtractionError::Internal(format!("failed to create temp file: {e}"))
        })?;

        temp_file.write_all(data).map_err(|e| {
            ExtractionError::Internal(format!("failed to write temp file: {e}"))
        })?;

        // The temp file moves into the job so it lives until parsing ends.
        let (page_count, pages) = parse_on_blocking_pool(FormatFamily::Pdf, self.timeout, move || {
            Self::extract_pages(temp_file.path())
        })
        .await?;

        tracing::info!(page_count, text_pages = pages.len(), "PDF text extraction complete");

        let units = pages
            .into_iter()
            .flat_map(|page| {
                let page_number = page.page_number;
                split_text_blocks(&page.text)
                    .into_iter()
                    .map(move |block| RawContentUnit::paragraph(block).on_page(page_number))
            })
            .collect();

        Ok(RawExtraction::new(units).with_metadata("pageCount", page_count))
    }
}
