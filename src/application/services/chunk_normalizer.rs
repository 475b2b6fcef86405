use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::domain::{ChunkId, ContentChunk, RawContentUnit};

static HYPHEN_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-[ \t]*\r?\n[ \t]*(?P<suffix>\w)").unwrap());

// Invisible characters left behind by PDF/Office text layers.
const ARTIFACT_CHARS: &[char] = &[
    '\u{00AD}', '\u{200B}', '\u{200C}', '\u{200D}', '\u{200E}', '\u{200F}', '\u{2060}',
    '\u{FEFF}', '\u{FFFD}',
];

pub struct ChunkNormalizer;

impl ChunkNormalizer {
    /// Normalizes each unit's text, drops the ones that end up empty and
    /// numbers the survivors in their original order.
    pub fn normalize(units: Vec<RawContentUnit>) -> Vec<ContentChunk> {
        units
            .into_iter()
            .filter_map(|unit| {
                let text = normalize_text(&unit.text);
                if text.is_empty() {
                    return None;
                }
                let section = unit
                    .section
                    .map(|s| normalize_text(&s))
                    .filter(|s| !s.is_empty());
                Some((unit.kind, text, unit.page, section))
            })
            .enumerate()
            .map(|(position, (chunk_type, text, page, section))| ContentChunk {
                id: ChunkId::sequential(position),
                chunk_type,
                text,
                page,
                section,
            })
            .collect()
    }
}

/// Collapses a unit's text into a single clean line. Idempotent.
pub fn normalize_text(raw: &str) -> String {
    let de_hyphenated = HYPHEN_NEWLINE.replace_all(raw, "$prefix$suffix");

    let stripped: String = de_hyphenated
        .chars()
        .filter(|ch| !ARTIFACT_CHARS.contains(ch))
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();

    let composed: String = stripped.nfkc().collect();

    let mut result = String::with_capacity(composed.len());
    for word in composed.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}
