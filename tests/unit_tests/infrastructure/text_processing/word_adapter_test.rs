use nural_extractor::application::ports::{ExtractionError, FormatExtractor};
use nural_extractor::domain::{ChunkType, FormatFamily};
use nural_extractor::infrastructure::text_processing::WordAdapter;

use crate::fixtures::{docx, zip_package};

fn run(text: &str) -> String {
    format!("<w:r><w:t>{text}</w:t></w:r>")
}

fn paragraph(text: &str) -> String {
    format!("<w:p>{}</w:p>", run(text))
}

fn styled(style: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr>{}</w:p>"#,
        run(text)
    )
}

fn list_item(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr>{}</w:p>"#,
        run(text)
    )
}

fn table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|cell| format!("<w:tc>{}</w:tc>", paragraph(cell)))
                .collect();
            format!("<w:tr>{cells}</w:tr>")
        })
        .collect();
    format!("<w:tbl>{rows}</w:tbl>")
}

#[tokio::test]
async fn given_docx_when_extracting_then_structure_is_preserved() {
    let body = [
        styled("Heading1", "Overview"),
        paragraph("Revenue grew."),
        list_item("First item"),
        list_item("Second item"),
        table(&[&["Region", "Total"], &["North", "10"]]),
        styled("Heading2", "Outlook"),
        paragraph("Stable &amp; steady."),
    ]
    .concat();

    let extraction = WordAdapter::default()
        .extract(&docx(&body), "report.docx")
        .await
        .unwrap();

    let units: Vec<(ChunkType, &str, Option<&str>)> = extraction
        .units
        .iter()
        .map(|u| (u.kind, u.text.as_str(), u.section.as_deref()))
        .collect();
    assert_eq!(
        units,
        vec![
            (ChunkType::Heading, "Overview", None),
            (ChunkType::Paragraph, "Revenue grew.", Some("Overview")),
            (ChunkType::List, "- First item\n- Second item", Some("Overview")),
            (ChunkType::Table, "Region | Total\nNorth | 10", Some("Overview")),
            (ChunkType::Heading, "Outlook", None),
            (ChunkType::Paragraph, "Stable & steady.", Some("Outlook")),
        ]
    );
}

#[tokio::test]
async fn given_core_properties_when_extracting_then_title_and_author_are_metadata() {
    let extraction = WordAdapter::default()
        .extract(&docx(&paragraph("Body")), "report.docx")
        .await
        .unwrap();

    assert_eq!(extraction.metadata["title"], "Quarterly Report");
    assert_eq!(extraction.metadata["author"], "Ada");
}

#[tokio::test]
async fn given_zip_without_document_part_when_extracting_then_malformed() {
    let package = zip_package(&[("other.xml", "<x/>")]);

    let result = WordAdapter::default().extract(&package, "odd.docx").await;

    assert!(matches!(
        result,
        Err(ExtractionError::Malformed { format: FormatFamily::Word, .. })
    ));
}

#[tokio::test]
async fn given_non_zip_bytes_when_extracting_then_malformed() {
    let result = WordAdapter::default()
        .extract(b"plain bytes, not a package", "fake.docx")
        .await;

    assert!(matches!(result, Err(ExtractionError::Malformed { .. })));
}
