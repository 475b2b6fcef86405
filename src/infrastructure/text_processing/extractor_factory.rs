use std::sync::Arc;

use crate::application::ports::FormatExtractor;
use crate::application::services::OcrAdapter;
use crate::infrastructure::ocr::TesseractLauncher;
use crate::presentation::config::{ExtractionSettings, OcrSettings};

use super::format_registry::FormatRegistry;
use super::html_adapter::HtmlAdapter;
use super::image_adapter::ImageAdapter;
use super::pdf_adapter::PdfAdapter;
use super::plain_text_adapter::PlainTextAdapter;
use super::presentation_adapter::PresentationAdapter;
use super::spreadsheet_adapter::SpreadsheetAdapter;
use super::word_adapter::WordAdapter;

#[derive(Debug, thiserror::Error)]
pub enum ExtractorFactoryError {
    #[error("invalid OCR language list '{0}': expected codes like eng or eng+deu")]
    InvalidOcrLanguages(String),
    #[error("parse_timeout_secs must be greater than zero")]
    ZeroParseTimeout,
    #[error("ocr timeout_secs must be greater than zero")]
    ZeroOcrTimeout,
}

pub struct ExtractorFactory;

impl ExtractorFactory {
    pub fn create(
        extraction: &ExtractionSettings,
        ocr: &OcrSettings,
    ) -> Result<FormatRegistry, ExtractorFactoryError> {
        if extraction.parse_timeout_secs == 0 {
            return Err(ExtractorFactoryError::ZeroParseTimeout);
        }
        let timeout = extraction.parse_timeout();

        let mut extractors: Vec<Arc<dyn FormatExtractor>> = vec![
            Arc::new(PdfAdapter::new(timeout)),
            Arc::new(WordAdapter::new(timeout)),
            Arc::new(SpreadsheetAdapter::new(timeout)),
            Arc::new(PresentationAdapter::new(timeout)),
            Arc::new(HtmlAdapter::new(timeout)),
            Arc::new(PlainTextAdapter),
        ];

        if ocr.enabled {
            extractors.push(Arc::new(ImageAdapter::new(Arc::new(Self::create_ocr(ocr)?))));
        } else {
            tracing::warn!("OCR disabled, image uploads will be reported as unsupported");
        }

        let registry = FormatRegistry::new(extractors);
        tracing::info!(families = ?registry.supported_families(), "Format registry ready");
        Ok(registry)
    }

    pub fn create_ocr(settings: &OcrSettings) -> Result<OcrAdapter, ExtractorFactoryError> {
        if !valid_language_list(&settings.languages) {
            return Err(ExtractorFactoryError::InvalidOcrLanguages(
                settings.languages.clone(),
            ));
        }
        if settings.timeout_secs == 0 {
            return Err(ExtractorFactoryError::ZeroOcrTimeout);
        }

        tracing::info!(
            binary = %settings.binary_path,
            languages = %settings.languages,
            "Configuring Tesseract OCR"
        );
        let launcher = TesseractLauncher::new(&settings.binary_path, settings.timeout());
        Ok(OcrAdapter::new(Arc::new(launcher), settings.languages.clone()))
    }
}

fn valid_language_list(languages: &str) -> bool {
    !languages.is_empty()
        && languages.split('+').all(|code| {
            !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
