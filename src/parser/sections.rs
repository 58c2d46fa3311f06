use super::blocks::Line;
use super::extract::parse_item;
use super::types::{Item, Section, Subsection};

/// Open state while walking a document. Only one section and one
/// subsection can be open at a time.
#[derive(Default)]
struct Builder {
    sections: Vec<Section>,
    current_section: Option<Section>,
    current_subsection: Option<Subsection>,
}

impl Builder {
    fn open_section(&mut self, title: &str) {
        self.close_section();
        self.current_section = Some(Section::new(title));
    }

    fn open_subsection(&mut self, title: &str) {
        // A subsection marker outside any section has nothing to nest under.
        if self.current_section.is_none() {
            return;
        }
        self.flush_subsection();
        self.current_subsection = Some(Subsection::new(title));
    }

    fn push_item(&mut self, item: Item) {
        if let Some(sub) = self.current_subsection.as_mut() {
            sub.items.push(item);
        } else if let Some(section) = self.current_section.as_mut() {
            section.items.push(item);
        }
        // Otherwise dropped: no open section to attach to.
    }

    fn flush_subsection(&mut self) {
        if let Some(sub) = self.current_subsection.take() {
            if let Some(section) = self.current_section.as_mut() {
                section.subsections.push(sub);
            }
        }
    }

    fn close_section(&mut self) {
        self.flush_subsection();
        if let Some(section) = self.current_section.take() {
            self.sections.push(section);
        }
    }

    fn finish(mut self) -> Vec<Section> {
        self.close_section();
        self.sections
    }
}

/// Build the two-level section tree in a single forward pass.
pub fn build_sections(lines: &[Line]) -> Vec<Section> {
    let mut builder = Builder::default();

    for line in lines {
        match line {
            Line::Skip | Line::Prose => {}
            Line::Section(title) => builder.open_section(title),
            Line::Subsection(title) => builder.open_subsection(title),
            Line::Entry(text) => {
                if let Some(item) = parse_item(text) {
                    builder.push_item(item);
                }
            }
        }
    }

    builder.finish()
}

/// `video-tools.md` → `Video Tools`.
pub fn derive_title(filename: &str) -> String {
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    let spaced = stem.replace('-', " ");

    let mut title = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if at_word_start && !c.is_whitespace() {
            title.extend(c.to_uppercase());
        } else {
            title.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    title
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blocks::classify_lines;

    fn sections(md: &str) -> Vec<Section> {
        build_sections(&classify_lines(md))
    }

    #[test]
    fn two_flat_sections() {
        let md = "# ► Section A\n* one\n* two\n* three\n# ► Section B\n* four";
        let s = sections(md);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].title, "Section A");
        assert_eq!(s[0].items.len(), 3);
        assert!(s[0].subsections.is_empty());
        assert_eq!(s[1].title, "Section B");
        assert_eq!(s[1].items.len(), 1);
        assert!(s[1].subsections.is_empty());
    }

    #[test]
    fn items_before_and_inside_subsections() {
        let md = "# ► Video\n* top\n## ▷ Streaming\n* a\n* b\n## ▷ Downloading\n* c\n# ► Audio\n* d";
        let s = sections(md);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].items.len(), 1);
        assert_eq!(s[0].items[0].name, "top");
        assert_eq!(s[0].subsections.len(), 2);
        assert_eq!(s[0].subsections[0].title, "Streaming");
        assert_eq!(s[0].subsections[0].items.len(), 2);
        assert_eq!(s[0].subsections[1].title, "Downloading");
        assert_eq!(s[0].subsections[1].items.len(), 1);
        // New section clears the open subsection.
        assert_eq!(s[1].items.len(), 1);
        assert!(s[1].subsections.is_empty());
    }

    #[test]
    fn items_without_section_dropped() {
        let md = "* orphan\n- another\n# ► A\n* kept";
        let s = sections(md);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].items.len(), 1);
        assert_eq!(s[0].items[0].name, "kept");
    }

    #[test]
    fn subsection_without_section_ignored() {
        let md = "## ▷ Floating\n* orphan\n# ► A\n* one";
        let s = sections(md);
        assert_eq!(s.len(), 1);
        assert!(s[0].subsections.is_empty());
        assert_eq!(s[0].items.len(), 1);
    }

    #[test]
    fn separators_and_navigation_never_items() {
        let md = "**[◄◄ Back to Wiki Index](https://fmhy.net)**\n# ► A\n***\n\n## ▷ B\n***\n* one\n   \n";
        let s = sections(md);
        assert_eq!(s[0].items.len(), 0);
        assert_eq!(s[0].subsections[0].items.len(), 1);
    }

    #[test]
    fn empty_section_kept() {
        let s = sections("# ► Empty\n# ► Also Empty\n## ▷ Empty Sub");
        assert_eq!(s.len(), 2);
        assert_eq!(s[1].subsections.len(), 1);
        assert!(s[1].subsections[0].items.is_empty());
    }

    #[test]
    fn prose_ignored() {
        let s = sections("Intro paragraph\n# ► A\nSome prose\n### Heading\n* one");
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].items.len(), 1);
    }

    #[test]
    fn empty_input() {
        assert!(sections("").is_empty());
    }

    #[test]
    fn title_derivation() {
        assert_eq!(derive_title("video-tools.md"), "Video Tools");
        assert_eq!(derive_title("ai"), "Ai");
        assert_eq!(derive_title("internet-tools.md"), "Internet Tools");
        assert_eq!(derive_title("non-english.MD"), "Non English.MD");
        assert_eq!(derive_title("gaming-tools-guide.md"), "Gaming Tools Guide");
        assert_eq!(derive_title(""), "");
    }
}
