use nural_extractor::application::ports::{ExtractionError, FormatExtractor};
use nural_extractor::domain::{ChunkType, FormatFamily};
use nural_extractor::infrastructure::text_processing::PdfAdapter;

use crate::fixtures::pdf_document;

#[tokio::test]
async fn given_zero_bytes_when_extracting_then_returns_empty_input_error() {
    let result = PdfAdapter::default().extract(&[], "broken.pdf").await;

    assert!(matches!(result, Err(ExtractionError::EmptyInput)));
}

#[tokio::test]
async fn given_non_pdf_bytes_when_extracting_then_returns_an_error() {
    let result = PdfAdapter::default()
        .extract(b"this is not a pdf document", "fake.pdf")
        .await;

    assert!(result.is_err());
}

#[test]
fn given_adapter_when_asked_for_family_then_pdf() {
    assert_eq!(PdfAdapter::default().family(), FormatFamily::Pdf);
}

fn page_text(extraction: &nural_extractor::domain::RawExtraction, page: u32) -> String {
    extraction
        .units
        .iter()
        .filter(|u| u.page == Some(page))
        .map(|u| u.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::test]
async fn given_three_page_pdf_with_blank_middle_page_when_extracting_then_units_carry_their_page() {
    let data = pdf_document(&[&["Opening remarks"], &[], &["Closing summary"]]);

    let extraction = PdfAdapter::default()
        .extract(&data, "minutes.pdf")
        .await
        .unwrap();

    assert_eq!(extraction.metadata["pageCount"], 3);
    assert!(!extraction.units.is_empty());
    assert!(extraction.units.iter().all(|u| u.kind == ChunkType::Paragraph));
    assert!(extraction.units.iter().all(|u| !u.text.trim().is_empty()));
    assert!(extraction.units.iter().all(|u| u.page != Some(2)));
    assert!(page_text(&extraction, 1).contains("Opening"));
    assert!(page_text(&extraction, 3).contains("Closing"));
}

#[tokio::test]
async fn given_pdf_pages_when_extracting_then_units_follow_page_order() {
    let data = pdf_document(&[&["First page body"], &["Second page body"]]);

    let extraction = PdfAdapter::default()
        .extract(&data, "ordered.pdf")
        .await
        .unwrap();

    let pages: Vec<u32> = extraction.units.iter().filter_map(|u| u.page).collect();
    assert_eq!(pages.len(), extraction.units.len());
    assert!(pages.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(pages.first(), Some(&1));
    assert_eq!(pages.last(), Some(&2));
    assert_eq!(extraction.metadata["pageCount"], 2);
}
