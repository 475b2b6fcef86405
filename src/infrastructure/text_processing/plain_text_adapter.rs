use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::application::ports::{ExtractionError, FormatExtractor};
use crate::domain::{FormatFamily, RawContentUnit, RawExtraction};

use super::text_sanitizer::render_list;

static MARKDOWN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+?)\s*#*$").unwrap());

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*+]|\d+[.)])\s+(.+)$").unwrap());

/// Plain text and Markdown. Blank lines separate paragraphs; `#` lines are
/// headings and runs of bullet or numbered lines are grouped into lists.
pub struct PlainTextAdapter;

#[async_trait]
impl FormatExtractor for PlainTextAdapter {
    fn family(&self) -> FormatFamily {
        FormatFamily::PlainText
    }

    #[tracing::instrument(skip(self, data), fields(file_name = %file_name, bytes = data.len()))]
    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let text = String::from_utf8_lossy(data);
        let line_count = text.lines().count();
        let units = parse_blocks(&text);

        Ok(RawExtraction::new(units).with_metadata("lineCount", line_count))
    }
}

#[derive(Default)]
struct BlockState {
    units: Vec<RawContentUnit>,
    section: Option<String>,
    paragraph: Vec<String>,
    list: Vec<String>,
}

impl BlockState {
    fn flush_paragraph(&mut self) {
        if self.paragraph.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.paragraph).join("\n");
        self.units
            .push(RawContentUnit::paragraph(text).in_section(self.section.clone()));
    }

    fn flush_list(&mut self) {
        if self.list.is_empty() {
            return;
        }
        let text = render_list(&std::mem::take(&mut self.list));
        self.units
            .push(RawContentUnit::list(text).in_section(self.section.clone()));
    }

    fn flush(&mut self) {
        self.flush_paragraph();
        self.flush_list();
    }
}

fn parse_blocks(text: &str) -> Vec<RawContentUnit> {
    let mut state = BlockState::default();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            state.flush();
            continue;
        }

        if let Some(caps) = MARKDOWN_HEADING.captures(trimmed) {
            state.flush();
            let heading = caps[1].to_string();
            state.units.push(RawContentUnit::heading(heading.clone()));
            state.section = Some(heading);
            continue;
        }

        if let Some(caps) = LIST_ITEM.captures(trimmed) {
            state.flush_paragraph();
            state.list.push(caps[1].to_string());
            continue;
        }

        state.flush_list();
        state.paragraph.push(trimmed.to_string());
    }

    state.flush();
    state.units
}

