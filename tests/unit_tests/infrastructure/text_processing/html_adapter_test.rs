use nural_extractor::application::ports::FormatExtractor;
use nural_extractor::domain::ChunkType;
use nural_extractor::infrastructure::text_processing::HtmlAdapter;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title> Release Notes </title>
  <meta name="author" content="Linus">
  <style>body { color: red; }</style>
</head>
<body>
  <script>var ignored = true;</script>
  <div class="content">
    <h1>Version 2</h1>
    <p>Faster <b>parsing</b>.</p>
    <ul><li>New API</li><li>Fewer bugs</li></ul>
    <h2>Data</h2>
    <table>
      <tr><th>Metric</th><th>Value</th></tr>
      <tr><td>Speed</td><td>2x</td></tr>
    </table>
    <blockquote>Quoted text</blockquote>
  </div>
</body>
</html>"#;

#[tokio::test]
async fn given_structured_html_when_extracting_then_elements_map_to_chunk_types() {
    let extraction = HtmlAdapter::default()
        .extract(PAGE.as_bytes(), "notes.html")
        .await
        .unwrap();

    let units: Vec<(ChunkType, String, Option<&str>)> = extraction
        .units
        .iter()
        .map(|u| {
            (
                u.kind,
                u.text.split_whitespace().collect::<Vec<_>>().join(" "),
                u.section.as_deref(),
            )
        })
        .collect();
    assert_eq!(
        units,
        vec![
            (ChunkType::Heading, "Version 2".to_string(), None),
            (ChunkType::Paragraph, "Faster parsing.".to_string(), Some("Version 2")),
            (ChunkType::List, "- New API - Fewer bugs".to_string(), Some("Version 2")),
            (ChunkType::Heading, "Data".to_string(), None),
            (ChunkType::Table, "Metric | Value Speed | 2x".to_string(), Some("Data")),
            (ChunkType::Paragraph, "Quoted text".to_string(), Some("Data")),
        ]
    );
}

#[tokio::test]
async fn given_head_elements_when_extracting_then_title_author_and_language_are_metadata() {
    let extraction = HtmlAdapter::default()
        .extract(PAGE.as_bytes(), "notes.html")
        .await
        .unwrap();

    assert_eq!(extraction.metadata["title"], "Release Notes");
    assert_eq!(extraction.metadata["author"], "Linus");
    assert_eq!(extraction.metadata["language"], "en");
}

#[tokio::test]
async fn given_html_without_structure_when_extracting_then_body_text_is_one_paragraph() {
    let html = b"<html><body><div>Just <span>some</span> text</div><script>x()</script></body></html>";

    let extraction = HtmlAdapter::default().extract(html, "bare.html").await.unwrap();

    assert_eq!(extraction.units.len(), 1);
    assert_eq!(extraction.units[0].kind, ChunkType::Paragraph);
    assert_eq!(extraction.units[0].text.trim(), "Just some text");
}
