mod blocking_parse;
mod extractor_factory;
mod format_registry;
mod html_adapter;
mod image_adapter;
mod mock_format_extractor;
mod ooxml_package;
mod pdf_adapter;
mod plain_text_adapter;
mod presentation_adapter;
mod spreadsheet_adapter;
mod text_sanitizer;
mod word_adapter;

pub use blocking_parse::{DEFAULT_PARSE_TIMEOUT, parse_on_blocking_pool};
pub use extractor_factory::{ExtractorFactory, ExtractorFactoryError};
pub use format_registry::FormatRegistry;
pub use html_adapter::HtmlAdapter;
pub use image_adapter::ImageAdapter;
pub use mock_format_extractor::MockFormatExtractor;
pub use pdf_adapter::PdfAdapter;
pub use plain_text_adapter::PlainTextAdapter;
pub use presentation_adapter::PresentationAdapter;
pub use spreadsheet_adapter::SpreadsheetAdapter;
pub use text_sanitizer::{render_list, render_table, split_text_blocks};
pub use word_adapter::WordAdapter;
