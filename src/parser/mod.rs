pub mod blocks;
pub mod extract;
pub mod metadata;
pub mod sections;
pub mod types;

pub use types::{Item, Metadata, ParsedDocument};

/// Three-pass pipeline: markdown → lines → sections → metadata.
///
/// Pure and total: any input, including empty text, yields a document.
pub fn parse_markdown_document(content: &str, filename: &str) -> ParsedDocument {
    let lines = blocks::classify_lines(content);
    let sections = sections::build_sections(&lines);
    let metadata = metadata::aggregate(&sections);
    ParsedDocument {
        filename: filename.to_string(),
        title: sections::derive_title(filename),
        sections,
        metadata,
    }
}
