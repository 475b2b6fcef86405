use nural_extractor::application::ports::FormatExtractor;
use nural_extractor::domain::ChunkType;
use nural_extractor::infrastructure::text_processing::PresentationAdapter;

use crate::fixtures::{body_shape, core_properties, slide, title_shape, zip_package};

fn deck() -> Vec<u8> {
    let first = slide(&[title_shape("Welcome"), body_shape(&["Agenda", "Goals"])].concat());
    let second = slide(&title_shape("Roadmap"));
    let tenth = slide(&body_shape(&["Untitled notes"]));
    let props = core_properties("Kickoff", "Grace");

    // Stored out of order; slide10 must sort after slide2.
    zip_package(&[
        ("ppt/slides/slide10.xml", &tenth),
        ("ppt/slides/slide2.xml", &second),
        ("ppt/slides/slide1.xml", &first),
        ("docProps/core.xml", &props),
    ])
}

#[tokio::test]
async fn given_pptx_without_presentation_part_when_extracting_then_slides_follow_part_numbers() {
    let extraction = PresentationAdapter::default()
        .extract(&deck(), "kickoff.pptx")
        .await
        .unwrap();

    let units: Vec<(ChunkType, &str, Option<u32>, Option<&str>)> = extraction
        .units
        .iter()
        .map(|u| (u.kind, u.text.as_str(), u.page, u.section.as_deref()))
        .collect();
    assert_eq!(
        units,
        vec![
            (ChunkType::Heading, "Welcome", Some(1), None),
            (ChunkType::Paragraph, "Agenda", Some(1), Some("Welcome")),
            (ChunkType::Paragraph, "Goals", Some(1), Some("Welcome")),
            (ChunkType::Heading, "Roadmap", Some(2), None),
            (ChunkType::Paragraph, "Untitled notes", Some(3), None),
        ]
    );
}

#[tokio::test]
async fn given_pptx_when_extracting_then_slide_count_and_core_properties_are_metadata() {
    let extraction = PresentationAdapter::default()
        .extract(&deck(), "kickoff.pptx")
        .await
        .unwrap();

    assert_eq!(extraction.metadata["slideCount"], 3);
    assert_eq!(extraction.metadata["title"], "Kickoff");
}

fn presentation_part(relationship_ids: &[&str]) -> String {
    let ids: String = relationship_ids
        .iter()
        .enumerate()
        .map(|(i, id)| format!(r#"<p:sldId id="{}" r:id="{id}"/>"#, 256 + i))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#
    )
}

fn presentation_rels(targets: &[(&str, &str)]) -> String {
    let rels: String = targets
        .iter()
        .map(|(id, target)| {
            format!(
                r#"<Relationship Id="{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="{target}"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
    )
}

#[tokio::test]
async fn given_reordered_deck_when_extracting_then_slide_list_sets_reading_order() {
    let first_part = slide(&title_shape("Moved to the end"));
    let second_part = slide(&title_shape("Now the opener"));
    let presentation = presentation_part(&["rId3", "rId2"]);
    let rels = presentation_rels(&[
        ("rId2", "slides/slide1.xml"),
        ("rId3", "/ppt/slides/slide2.xml"),
    ]);
    let data = zip_package(&[
        ("ppt/presentation.xml", &presentation),
        ("ppt/_rels/presentation.xml.rels", &rels),
        ("ppt/slides/slide1.xml", &first_part),
        ("ppt/slides/slide2.xml", &second_part),
    ]);

    let extraction = PresentationAdapter::default()
        .extract(&data, "reordered.pptx")
        .await
        .unwrap();

    let units: Vec<(&str, Option<u32>)> = extraction
        .units
        .iter()
        .map(|u| (u.text.as_str(), u.page))
        .collect();
    assert_eq!(
        units,
        vec![("Now the opener", Some(1)), ("Moved to the end", Some(2))]
    );
    assert_eq!(extraction.metadata["slideCount"], 2);
}

#[tokio::test]
async fn given_slide_list_with_unknown_relationship_when_extracting_then_that_entry_is_skipped() {
    let only = slide(&body_shape(&["Kept"]));
    let presentation = presentation_part(&["rId2", "rId9"]);
    let rels = presentation_rels(&[("rId2", "slides/slide1.xml")]);
    let data = zip_package(&[
        ("ppt/presentation.xml", &presentation),
        ("ppt/_rels/presentation.xml.rels", &rels),
        ("ppt/slides/slide1.xml", &only),
    ]);

    let extraction = PresentationAdapter::default()
        .extract(&data, "partial.pptx")
        .await
        .unwrap();

    assert_eq!(extraction.units.len(), 1);
    assert_eq!(extraction.units[0].text, "Kept");
    assert_eq!(extraction.metadata["slideCount"], 1);
}
