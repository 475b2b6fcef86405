use std::collections::HashMap;
use std::sync::Arc;

use crate::application::ports::{FormatExtractor, FormatRouter, UnsupportedFormatError};
use crate::domain::FormatFamily;

/// Routes each file to the extractor registered for its format family.
/// Families without an extractor are unsupported.
pub struct FormatRegistry {
    extractors: HashMap<FormatFamily, Arc<dyn FormatExtractor>>,
}

impl FormatRegistry {
    pub fn new(extractors: Vec<Arc<dyn FormatExtractor>>) -> Self {
        Self {
            extractors: extractors
                .into_iter()
                .map(|extractor| (extractor.family(), extractor))
                .collect(),
        }
    }

    pub fn supported_families(&self) -> Vec<FormatFamily> {
        let mut families: Vec<FormatFamily> = self.extractors.keys().copied().collect();
        families.sort_by_key(|family| family.as_str());
        families
    }
}

impl FormatRouter for FormatRegistry {
    fn route(
        &self,
        file_name: &str,
        mime_type: &str,
    ) -> Result<Arc<dyn FormatExtractor>, UnsupportedFormatError> {
        FormatFamily::resolve(file_name, mime_type)
            .and_then(|family| self.extractors.get(&family))
            .cloned()
            .ok_or_else(|| UnsupportedFormatError {
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
            })
    }
}
