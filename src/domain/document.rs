use bytes::Bytes;
use uuid::Uuid;

use super::chunk::ContentChunk;
use super::raw_content::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub id: DocumentId,
    pub file_name: String,
    pub mime_type: String,
    pub metadata: Metadata,
    pub chunks: Vec<ContentChunk>,
}

/// What the transport handed over for one uploaded part.
#[derive(Debug, Clone)]
pub enum FilePayload {
    Bytes(Bytes),
    /// The transport refused the part (e.g. over the size limit) before buffering it.
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub mime_type: String,
    pub payload: FilePayload,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            payload: FilePayload::Bytes(data.into()),
        }
    }

    pub fn rejected(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            payload: FilePayload::Rejected(reason.into()),
        }
    }

    pub fn size_bytes(&self) -> Option<usize> {
        match &self.payload {
            FilePayload::Bytes(data) => Some(data.len()),
            FilePayload::Rejected(_) => None,
        }
    }
}
