mod chunk;
mod document;
mod extraction_result;
mod format_family;
mod raw_content;

pub use chunk::{ChunkId, ChunkType, ContentChunk};
pub use document::{DocumentId, ExtractedDocument, FilePayload, IncomingFile};
pub use extraction_result::ExtractionResult;
pub use format_family::{FormatFamily, file_extension, normalize_mime};
pub use raw_content::{Metadata, RawContentUnit, RawExtraction};
