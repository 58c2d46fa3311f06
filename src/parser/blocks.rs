use super::extract::item::is_skippable;

pub const SECTION_MARKER: &str = "# ►";
pub const SUBSECTION_MARKER: &str = "## ▷";

/// One classified source line. Borrowed from the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank, `***`, or navigation-back line.
    Skip,
    Section(&'a str),
    Subsection(&'a str),
    /// Bullet line, still untrimmed of its marker; the item extractor handles that.
    Entry(&'a str),
    /// Prose, other headings, anything without structural meaning.
    Prose,
}

pub fn classify_lines(markdown: &str) -> Vec<Line<'_>> {
    markdown.lines().map(classify).collect()
}

/// First match wins, in priority order.
pub fn classify(line: &str) -> Line<'_> {
    let line = line.trim();

    // ── Blank / separator / navigation ──
    if is_skippable(line) {
        return Line::Skip;
    }

    // ── Main section: # ► Title ──
    if let Some(title) = line.strip_prefix(SECTION_MARKER) {
        return Line::Section(title.trim());
    }

    // ── Subsection: ## ▷ Title ──
    if let Some(title) = line.strip_prefix(SUBSECTION_MARKER) {
        return Line::Subsection(title.trim());
    }

    // ── Bullet entry ──
    if line.starts_with('*') || line.starts_with('-') {
        return Line::Entry(line);
    }

    Line::Prose
}
