mod batch_orchestrator;
mod chunk_normalizer;
mod ocr_adapter;

pub use batch_orchestrator::{BatchOrchestrator, FileFailure};
pub use chunk_normalizer::{ChunkNormalizer, normalize_text};
pub use ocr_adapter::{
    DEFAULT_OCR_LANGUAGES, OCR_ERROR_PREFIX, OcrAdapter, is_ocr_error_text, ocr_error_text,
};
