use nural_extractor::domain::{ChunkId, ChunkType};

#[test]
fn given_positions_when_creating_sequential_ids_then_numbering_starts_at_one() {
    assert_eq!(ChunkId::sequential(0).as_str(), "chunk-1");
    assert_eq!(ChunkId::sequential(9).to_string(), "chunk-10");
}

#[test]
fn given_chunk_types_when_rendered_then_use_wire_names() {
    assert_eq!(ChunkType::Heading.as_str(), "heading");
    assert_eq!(ChunkType::Paragraph.as_str(), "paragraph");
    assert_eq!(ChunkType::Table.to_string(), "table");
    assert_eq!(ChunkType::List.to_string(), "list");
}
