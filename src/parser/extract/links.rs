use std::sync::LazyLock;

use regex::Regex;

use crate::parser::types::{Link, LinkType};

static INLINE_LINKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap());

#[derive(Debug, Clone, Copy)]
enum Target {
    Url,
    Label,
}

struct Rule {
    target: Target,
    needles: &'static [&'static str],
    link_type: LinkType,
}

// First match wins. Label needles are lowercase and compared against the lowercased label.
const RULES: &[Rule] = &[
    Rule { target: Target::Url, needles: &["github.com"], link_type: LinkType::Github },
    Rule { target: Target::Url, needles: &["discord.com", "discord.gg"], link_type: LinkType::Discord },
    Rule { target: Target::Label, needles: &["github"], link_type: LinkType::Github },
    Rule { target: Target::Label, needles: &["discord"], link_type: LinkType::Discord },
];

/// All `[label](url)` links in `text`, left to right.
pub fn extract_links(text: &str) -> Vec<Link> {
    INLINE_LINKS_RE
        .captures_iter(text)
        .map(|caps| {
            let label = caps[1].trim();
            let url = caps[2].trim();
            Link {
                url: url.to_string(),
                text: label.to_string(),
                link_type: classify(url, label),
            }
        })
        .collect()
}

fn classify(url: &str, label: &str) -> LinkType {
    let label = label.to_lowercase();
    RULES
        .iter()
        .find(|rule| {
            let haystack = match rule.target {
                Target::Url => url,
                Target::Label => label.as_str(),
            };
            rule.needles.iter().any(|n| haystack.contains(n))
        })
        .map(|rule| rule.link_type)
        .unwrap_or(LinkType::Other)
}

/// Replace every `[label](url)` with `label`.
pub fn collapse_links(text: &str) -> String {
    INLINE_LINKS_RE.replace_all(text, "$1").into_owned()
}
