use super::types::{Metadata, Section};

/// Count every item in the tree exactly once: each section's own items,
/// then its subsections' items, left to right.
pub fn aggregate(sections: &[Section]) -> Metadata {
    let mut metadata = Metadata::default();
    for item in sections.iter().flat_map(Section::all_items) {
        metadata.total_items += 1;
        metadata.starred_items += usize::from(item.is_starred);
        metadata.index_items += usize::from(item.is_index);
        metadata.cross_references += usize::from(item.is_cross_reference);
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blocks::classify_lines;
    use crate::parser::sections::build_sections;

    fn metadata(md: &str) -> Metadata {
        aggregate(&build_sections(&classify_lines(md)))
    }

    #[test]
    fn empty() {
        assert_eq!(aggregate(&[]), Metadata::default());
    }

    #[test]
    fn counts_sections_and_subsections() {
        let md = "# ► A\n* ⭐ one\n## ▷ B\n* 🌐 two\n* ↪️ three\n# ► C\n* four ⭐ 🌐";
        let m = metadata(md);
        assert_eq!(m.total_items, 4);
        assert_eq!(m.starred_items, 2);
        assert_eq!(m.index_items, 2);
        assert_eq!(m.cross_references, 1);
    }

    #[test]
    fn flags_never_exceed_total() {
        let md = "# ► A\n* ⭐🌐↪️ all\n* ⭐ ⭐ twice\n## ▷ B\n* plain";
        let m = metadata(md);
        assert_eq!(m.total_items, 3);
        assert!(m.starred_items <= m.total_items);
        assert!(m.index_items <= m.total_items);
        assert!(m.cross_references <= m.total_items);
        assert_eq!(m.starred_items, 2);
    }

    #[test]
    fn total_matches_reachable_items() {
        let md = std::fs::read_to_string("tests/fixtures/video-tools.md").unwrap();
        let sections = build_sections(&classify_lines(&md));
        let reachable: usize = sections.iter().map(|s| s.all_items().count()).sum();
        assert_eq!(aggregate(&sections).total_items, reachable);
    }
}
