use serde_json::{Map, Value};

use super::chunk::ChunkType;

pub type Metadata = Map<String, Value>;

/// One structural unit as an extractor produced it, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawContentUnit {
    pub kind: ChunkType,
    pub text: String,
    pub page: Option<u32>,
    pub section: Option<String>,
}

impl RawContentUnit {
    pub fn new(kind: ChunkType, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            page: None,
            section: None,
        }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Self::new(ChunkType::Heading, text)
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(ChunkType::Paragraph, text)
    }

    pub fn table(text: impl Into<String>) -> Self {
        Self::new(ChunkType::Table, text)
    }

    pub fn list(text: impl Into<String>) -> Self {
        Self::new(ChunkType::List, text)
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn in_section(mut self, section: Option<String>) -> Self {
        self.section = section;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExtraction {
    pub units: Vec<RawContentUnit>,
    pub metadata: Metadata,
}

impl RawExtraction {
    pub fn new(units: Vec<RawContentUnit>) -> Self {
        Self {
            units,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
