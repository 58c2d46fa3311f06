use std::sync::LazyLock;

use regex::Regex;

use super::links::{collapse_links, extract_links};
use crate::parser::types::Item;

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\s*\-]+").unwrap());
static BOLD_LINK_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\*\[([^\]]*)\]").unwrap());

pub const SEPARATOR: &str = "***";
pub const NAV_BACK_MARKER: &str = "**[◄◄";
const NAME_SEPARATOR: &str = " - ";
const VARIATION_SELECTOR: char = '\u{FE0F}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Starred,
    Index,
    CrossReference,
}

// Order is the stripping priority for a leading glyph; detection checks all of them.
const FLAG_GLYPHS: &[(Flag, &str)] = &[
    (Flag::Starred, "⭐"),
    (Flag::Index, "🌐"),
    (Flag::CrossReference, "↪"),
];

/// Lines that never carry an item, regardless of builder state.
pub fn is_skippable(line: &str) -> bool {
    line.is_empty() || line == SEPARATOR || line.starts_with(NAV_BACK_MARKER)
}

/// Parse one list-entry line. `None` for blank, separator, navigation,
/// or marker-only lines.
pub fn parse_item(line: &str) -> Option<Item> {
    let raw = line.trim();
    if is_skippable(raw) {
        return None;
    }

    let has = |flag: Flag| {
        FLAG_GLYPHS
            .iter()
            .any(|(f, glyph)| *f == flag && raw.contains(*glyph))
    };

    let content = strip_leading_glyph(&BULLET_RE.replace(raw, "")).to_string();
    if content.is_empty() {
        return None;
    }

    let (name, description) = match content.split_once(NAME_SEPARATOR) {
        Some((name, rest)) => (name.trim(), rest.trim()),
        None => (content.as_str(), ""),
    };

    Some(Item {
        name: refine_name(name),
        description: description.to_string(),
        links: extract_links(&content),
        is_starred: has(Flag::Starred),
        is_index: has(Flag::Index),
        is_cross_reference: has(Flag::CrossReference),
        raw_content: raw.to_string(),
    })
}

/// Remove at most one leading flag glyph and the whitespace after it.
fn strip_leading_glyph(content: &str) -> &str {
    for (_, glyph) in FLAG_GLYPHS {
        if let Some(rest) = content.strip_prefix(*glyph) {
            return rest.trim_start_matches(VARIATION_SELECTOR).trim_start();
        }
    }
    content
}

fn refine_name(name: &str) -> String {
    let refined = match BOLD_LINK_OPEN_RE.captures(name) {
        Some(caps) => caps[1].trim().to_string(),
        None => collapse_links(&name.replace("**", "")).trim().to_string(),
    };
    // `[](url)` style names collapse to nothing; keep the unrefined text instead.
    if refined.is_empty() {
        name.to_string()
    } else {
        refined
    }
}
