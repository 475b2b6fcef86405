mod mock_ocr_engine;
mod tesseract_engine;

pub use mock_ocr_engine::{MockOcrBehavior, MockOcrLauncher};
pub use tesseract_engine::{
    DEFAULT_RECOGNITION_TIMEOUT, DEFAULT_TESSERACT_BINARY, TesseractEngine, TesseractLauncher,
};
