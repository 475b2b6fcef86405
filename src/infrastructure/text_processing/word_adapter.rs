use std::time::Duration;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::application::ports::{ExtractionError, FormatExtractor};
use crate::domain::{FormatFamily, RawContentUnit, RawExtraction};

use super::blocking_parse::{DEFAULT_PARSE_TIMEOUT, parse_on_blocking_pool};
use super::ooxml_package::{attribute_value, core_properties, open_package, read_part};
use super::text_sanitizer::{render_list, render_table};

const DOCUMENT_PART: &str = "word/document.xml";

/// Word-processing documents (`.docx`). Headings come from paragraph styles,
/// list items from numbering properties.
pub struct WordAdapter {
    timeout: Duration,
}

impl WordAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn parse(data: Vec<u8>) -> Result<RawExtraction, ExtractionError> {
        let mut package = open_package(data, FormatFamily::Word)?;
        let xml = read_part(&mut package, DOCUMENT_PART, FormatFamily::Word)?.ok_or_else(|| {
            ExtractionError::malformed(FormatFamily::Word, format!("missing {DOCUMENT_PART}"))
        })?;

        let units = parse_document_xml(&xml)?;
        let mut extraction = RawExtraction::new(units);
        extraction.metadata = core_properties(&mut package, FormatFamily::Word);
        Ok(extraction)
    }
}

impl Default for WordAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_PARSE_TIMEOUT)
    }
}

#[async_trait]
impl FormatExtractor for WordAdapter {
    fn family(&self) -> FormatFamily {
        FormatFamily::Word
    }

    #[tracing::instrument(skip(self, data), fields(file_name = %file_name, bytes = data.len()))]
    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let owned = data.to_vec();
        let extraction =
            parse_on_blocking_pool(FormatFamily::Word, self.timeout, move || Self::parse(owned))
                .await?;

        tracing::info!(units = extraction.units.len(), "Word extraction complete");
        Ok(extraction)
    }
}

#[derive(Default)]
struct BodyState {
    units: Vec<RawContentUnit>,
    section: Option<String>,
    pending_list: Vec<String>,
    paragraph: String,
    style: Option<String>,
    is_list_item: bool,
    in_text: bool,
    table_depth: usize,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

impl BodyState {
    fn flush_list(&mut self) {
        if !self.pending_list.is_empty() {
            let text = render_list(&self.pending_list);
            self.pending_list.clear();
            self.units
                .push(RawContentUnit::list(text).in_section(self.section.clone()));
        }
    }

    fn finish_paragraph(&mut self) {
        let text = std::mem::take(&mut self.paragraph);

        if self.table_depth > 0 {
            if !text.trim().is_empty() {
                if !self.cell.is_empty() {
                    self.cell.push(' ');
                }
                self.cell.push_str(text.trim());
            }
            return;
        }

        if text.trim().is_empty() {
            return;
        }

        if self.style.as_deref().is_some_and(is_heading_style) {
            self.flush_list();
            self.section = Some(text.trim().to_string());
            self.units.push(RawContentUnit::heading(text));
        } else if self.is_list_item {
            self.pending_list.push(text);
        } else {
            self.flush_list();
            self.units
                .push(RawContentUnit::paragraph(text).in_section(self.section.clone()));
        }
    }

    fn finish_table(&mut self) {
        self.flush_list();
        let rows = std::mem::take(&mut self.rows);
        let text = render_table(&rows);
        if !text.is_empty() {
            self.units
                .push(RawContentUnit::table(text).in_section(self.section.clone()));
        }
    }
}

fn is_heading_style(style: &str) -> bool {
    let style = style.to_ascii_lowercase();
    style.starts_with("heading") || style == "title" || style == "subtitle"
}

fn parse_document_xml(xml: &str) -> Result<Vec<RawContentUnit>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut state = BodyState::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractionError::malformed(
                FormatFamily::Word,
                format!("invalid XML at byte {}: {e}", reader.buffer_position()),
            )
        })?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    state.paragraph.clear();
                    state.style = None;
                    state.is_list_item = false;
                }
                b"pStyle" => state.style = attribute_value(&e, b"val"),
                b"numPr" => state.is_list_item = true,
                b"t" => state.in_text = true,
                b"tbl" => {
                    state.table_depth += 1;
                    if state.table_depth == 1 {
                        state.rows.clear();
                    }
                }
                b"tr" if state.table_depth == 1 => state.row.clear(),
                b"tc" if state.table_depth == 1 => state.cell.clear(),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pStyle" => state.style = attribute_value(&e, b"val"),
                b"numPr" => state.is_list_item = true,
                b"tab" => state.paragraph.push('\t'),
                b"br" | b"cr" => state.paragraph.push('\n'),
                _ => {}
            },
            Event::Text(e) if state.in_text => {
                let text = e.unescape().map_err(|err| {
                    ExtractionError::malformed(FormatFamily::Word, format!("bad text run: {err}"))
                })?;
                state.paragraph.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => state.in_text = false,
                b"p" => state.finish_paragraph(),
                b"tc" if state.table_depth == 1 => {
                    let cell = std::mem::take(&mut state.cell);
                    state.row.push(cell);
                }
                b"tr" if state.table_depth == 1 => {
                    let row = std::mem::take(&mut state.row);
                    state.rows.push(row);
                }
                b"tbl" => {
                    state.table_depth = state.table_depth.saturating_sub(1);
                    if state.table_depth == 0 {
                        state.finish_table();
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    state.flush_list();
    Ok(state.units)
}
