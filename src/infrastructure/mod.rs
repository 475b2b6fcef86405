pub mod observability;
pub mod ocr;
pub mod text_processing;
