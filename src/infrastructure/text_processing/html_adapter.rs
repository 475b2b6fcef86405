use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use crate::application::ports::{ExtractionError, FormatExtractor};
use crate::domain::{FormatFamily, Metadata, RawContentUnit, RawExtraction};

use super::blocking_parse::{DEFAULT_PARSE_TIMEOUT, parse_on_blocking_pool};
use super::text_sanitizer::{render_list, render_table};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static AUTHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="author"]"#).unwrap());
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

const IGNORED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// HTML pages. Structural elements map onto chunk types; a page without any
/// of them falls back to its visible body text.
pub struct HtmlAdapter {
    timeout: Duration,
}

impl HtmlAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn parse(data: Vec<u8>) -> RawExtraction {
        let source = String::from_utf8_lossy(&data);
        let document = Html::parse_document(&source);

        let root = document
            .select(&BODY)
            .next()
            .unwrap_or_else(|| document.root_element());

        let mut walker = StructureWalker::default();
        walker.walk(root);

        let mut units = walker.units;
        if units.is_empty() {
            let text = visible_text(root);
            if !text.trim().is_empty() {
                units.push(RawContentUnit::paragraph(text));
            }
        }

        let mut extraction = RawExtraction::new(units);
        extraction.metadata = page_metadata(&document);
        extraction
    }
}

impl Default for HtmlAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_PARSE_TIMEOUT)
    }
}

#[async_trait]
impl FormatExtractor for HtmlAdapter {
    fn family(&self) -> FormatFamily {
        FormatFamily::Html
    }

    #[tracing::instrument(skip(self, data), fields(file_name = %file_name, bytes = data.len()))]
    async fn extract(&self, data: &[u8], file_name: &str) -> Result<RawExtraction, ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        let owned = data.to_vec();
        let extraction = parse_on_blocking_pool(FormatFamily::Html, self.timeout, move || {
            Ok(Self::parse(owned))
        })
        .await?;

        tracing::info!(units = extraction.units.len(), "HTML extraction complete");
        Ok(extraction)
    }
}

#[derive(Default)]
struct StructureWalker {
    units: Vec<RawContentUnit>,
    section: Option<String>,
}

impl StructureWalker {
    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children().filter_map(ElementRef::wrap) {
            let name = child.value().name();
            match name {
                _ if IGNORED_TAGS.contains(&name) => {}
                "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                    let text = visible_text(child);
                    if !text.trim().is_empty() {
                        self.section = Some(text.trim().to_string());
                        self.units.push(RawContentUnit::heading(text));
                    }
                }
                "p" | "blockquote" | "pre" => {
                    self.push(RawContentUnit::paragraph(visible_text(child)));
                }
                "ul" | "ol" => {
                    let items: Vec<String> = child
                        .children()
                        .filter_map(ElementRef::wrap)
                        .filter(|item| item.value().name() == "li")
                        .map(|item| visible_text(item).split_whitespace().collect::<Vec<_>>().join(" "))
                        .collect();
                    self.push(RawContentUnit::list(render_list(&items)));
                }
                "table" => {
                    self.push(RawContentUnit::table(render_table(&table_rows(child))));
                }
                _ => self.walk(child),
            }
        }
    }

    fn push(&mut self, unit: RawContentUnit) {
        if !unit.text.trim().is_empty() {
            self.units.push(unit.in_section(self.section.clone()));
        }
    }
}

/// Rows that belong to `table` itself, not to tables nested inside it.
fn table_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    table
        .select(&ROW)
        .filter(|row| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|ancestor| ancestor.value().name() == "table")
                .is_some_and(|owner| owner.id() == table.id())
        })
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(|cell| visible_text(cell).split_whitespace().collect::<Vec<_>>().join(" "))
                .collect()
        })
        .collect()
}

/// Text content with scripts and styles removed. Line breaks and block
/// boundaries become newlines.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    collect_text(element, &mut text);
    text
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for node in element.children() {
        if let Some(text) = node.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(child) = ElementRef::wrap(node) else {
            continue;
        };
        let name = child.value().name();
        if IGNORED_TAGS.contains(&name) {
            continue;
        }
        if name == "br" {
            out.push('\n');
            continue;
        }

        let block = matches!(
            name,
            "p" | "div" | "li" | "tr" | "td" | "th" | "section" | "article" | "blockquote" | "pre"
        );
        if block && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        collect_text(child, out);
        if block && !out.ends_with('\n') {
            out.push('\n');
        }
    }
}

fn page_metadata(document: &Html) -> Metadata {
    let mut metadata = Metadata::new();

    if let Some(title) = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
    {
        metadata.insert("title".to_string(), title.into());
    }

    if let Some(author) = document
        .select(&AUTHOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|author| !author.is_empty())
    {
        metadata.insert("author".to_string(), author.into());
    }

    if let Some(lang) = document.root_element().value().attr("lang") {
        metadata.insert("language".to_string(), lang.into());
    }

    metadata
}
