use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::application::ports::{ExtractionError, FormatExtractor};
use crate::domain::{ChunkType, FormatFamily, RawContentUnit, RawExtraction};

use super::blocking_parse::{DEFAULT_PARSE_TIMEOUT, parse_on_blocking_pool};
use super::ooxml_package::{Package, attribute_value, core_properties, open_package, read_part};
use super::text_sanitizer::render_table;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const SLIDE_SUFFIX: &str = ".xml";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Slide decks (`.pptx`). Each slide is one page; the title placeholder
/// becomes a heading and names the section of the slide's other units.
pub struct PresentationAdapter {
    timeout: Duration,
}

impl PresentationAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn parse(data: Vec<u8>) -> Result<RawExtraction, ExtractionError> {
        let mut package = open_package(data, FormatFamily::Presentation)?;
        let slide_names = slide_order(&mut package)?;

        let mut units = Vec::new();
        for (position, name) in slide_names.iter().enumerate() {
            let slide_number = (position + 1) as u32;
            let Some(xml) = read_part(&mut package, name, FormatFamily::Presentation)? else {
                continue;
            };
            units.extend(parse_slide_xml(&xml, slide_number)?);
        }

        let mut extraction = RawExtraction::new(units);
        extraction.metadata = core_properties(&mut package, FormatFamily::Presentation);
        extraction
            .metadata
            .insert("slideCount".to_string(), slide_names.len().into());
        Ok(extraction)
    }
}

impl Default for PresentationAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_PARSE_TIMEOUT)
    }
}

#[async_trait]
impl FormatExtractor for PresentationAdapter {
    fn family(&self) -> FormatFamily {
        FormatFamily::Presentation
    }

    #[tracing::instrument(skip(self, data), fields(file_name = %file_name, bytes = data.len()))]
    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let owned = data.to_vec();
        let extraction = parse_on_blocking_pool(FormatFamily::Presentation, self.timeout, move || {
            Self::parse(owned)
        })
        .await?;

        tracing::info!(units = extraction.units.len(), "Presentation extraction complete");
        Ok(extraction)
    }
}

/// Slide parts in deck order: `p:sldIdLst` resolved through the
/// presentation relationships. Packages without those parts fall back to
/// the numeric suffix of the slide part names.
fn slide_order(package: &mut Package) -> Result<Vec<String>, ExtractionError> {
    let Some(presentation) = read_part(package, PRESENTATION_PART, FormatFamily::Presentation)?
    else {
        return Ok(slide_part_names(package));
    };
    let Some(rels) = read_part(package, PRESENTATION_RELS_PART, FormatFamily::Presentation)? else {
        tracing::debug!("Presentation has no relationships part; ordering slides by part name");
        return Ok(slide_part_names(package));
    };

    let targets = relationship_targets(&rels)?;
    let names = slide_relationship_ids(&presentation)?
        .into_iter()
        .filter_map(|id| match targets.get(&id) {
            Some(target) => Some(resolve_target(target)),
            None => {
                tracing::warn!(relationship = %id, "Slide relationship not found");
                None
            }
        })
        .collect();
    Ok(names)
}

/// Slide parts sorted by their numeric suffix.
fn slide_part_names(package: &Package) -> Vec<String> {
    let mut slides: Vec<(u32, String)> = package
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix(SLIDE_PREFIX)?
                .strip_suffix(SLIDE_SUFFIX)?
                .parse::<u32>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);
    slides.into_iter().map(|(_, name)| name).collect()
}

/// The `r:id` of every `p:sldId`, in list order.
fn slide_relationship_ids(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractionError::malformed(
                FormatFamily::Presentation,
                format!("invalid XML in {PRESENTATION_PART}: {e}"),
            )
        })?;

        match event {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = relationship_id(&e) {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

fn relationship_targets(xml: &str) -> Result<HashMap<String, String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut targets = HashMap::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractionError::malformed(
                FormatFamily::Presentation,
                format!("invalid XML in {PRESENTATION_RELS_PART}: {e}"),
            )
        })?;

        match event {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) =
                    (attribute_value(&e, b"Id"), attribute_value(&e, b"Target"))
                {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

/// `sldId` carries both a plain `id` and the prefixed relationship `r:id`.
fn relationship_id(element: &BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id")
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Relationship targets are relative to `ppt/` unless absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{target}"),
    }
}

#[derive(Default)]
struct SlideState {
    title: Option<String>,
    units: Vec<RawContentUnit>,
    in_shape: bool,
    shape_is_title: bool,
    shape_paragraphs: Vec<String>,
    paragraph: String,
    in_text: bool,
    table_depth: usize,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

impl SlideState {
    fn finish_paragraph(&mut self) {
        let text = std::mem::take(&mut self.paragraph);
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if self.table_depth > 0 {
            if !self.cell.is_empty() {
                self.cell.push(' ');
            }
            self.cell.push_str(text);
        } else if self.in_shape {
            self.shape_paragraphs.push(text.to_string());
        }
    }

    fn finish_shape(&mut self) {
        let paragraphs = std::mem::take(&mut self.shape_paragraphs);
        if paragraphs.is_empty() {
            return;
        }

        if self.shape_is_title {
            let title = paragraphs.join(" ");
            if self.title.is_none() {
                self.title = Some(title.clone());
            }
            self.units.push(RawContentUnit::heading(title));
        } else {
            self.units
                .extend(paragraphs.into_iter().map(RawContentUnit::paragraph));
        }
    }

    fn finish_table(&mut self) {
        let rows = std::mem::take(&mut self.rows);
        let text = render_table(&rows);
        if !text.is_empty() {
            self.units.push(RawContentUnit::table(text));
        }
    }
}

fn parse_slide_xml(xml: &str, slide_number: u32) -> Result<Vec<RawContentUnit>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut state = SlideState::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            ExtractionError::malformed(
                FormatFamily::Presentation,
                format!("invalid XML in slide {slide_number}: {e}"),
            )
        })?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => {
                    state.in_shape = true;
                    state.shape_is_title = false;
                    state.shape_paragraphs.clear();
                }
                b"ph" => state.shape_is_title |= is_title_placeholder(&e),
                b"p" => state.paragraph.clear(),
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
                b"ph" => state.shape_is_title |= is_title_placeholder(&e),
                b"br" => state.paragraph.push('\n'),
                _ => {}
            },
            Event::Text(e) if state.in_text => {
                let text = e.unescape().map_err(|err| {
                    ExtractionError::malformed(
                        FormatFamily::Presentation,
                        format!("bad text run in slide {slide_number}: {err}"),
                    )
                })?;
                state.paragraph.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => state.in_text = false,
                b"p" => state.finish_paragraph(),
                b"sp" => {
                    state.finish_shape();
                    state.in_shape = false;
                }
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

    let title = state.title.clone();
    Ok(state
        .units
        .into_iter()
        .map(|unit| {
            let section = if unit.kind == ChunkType::Heading {
                None
            } else {
                title.clone()
            };
            unit.on_page(slide_number).in_section(section)
        })
        .collect())
}

fn is_title_placeholder(element: &BytesStart<'_>) -> bool {
    matches!(
        attribute_value(element, b"type").as_deref(),
        Some("title") | Some("ctrTitle")
    )
}
