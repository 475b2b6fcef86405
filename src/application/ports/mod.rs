mod format_extractor;
mod format_router;
mod ocr_engine;

pub use format_extractor::{ExtractionError, FormatExtractor};
pub use format_router::{FormatRouter, UnsupportedFormatError};
pub use ocr_engine::{OcrEngine, OcrEngineError, OcrEngineLauncher};
