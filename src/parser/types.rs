use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    // Reserved; the link extractor never produces these two.
    #[allow(dead_code)]
    Primary,
    #[allow(dead_code)]
    Secondary,
    Github,
    Discord,
    Other,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Primary => "primary",
            LinkType::Secondary => "secondary",
            LinkType::Github => "github",
            LinkType::Discord => "discord",
            LinkType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub text: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

/// One catalog entry. `raw_content` is always the trimmed source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub description: String,
    pub links: Vec<Link>,
    pub is_starred: bool,
    pub is_index: bool,
    pub is_cross_reference: bool,
    pub raw_content: String,
}

/// Level-1 grouping opened by `# ►`.
///
/// The tree is exactly two levels deep: a `Section` owns its subsections,
/// and a `Subsection` has nowhere to put a third level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub items: Vec<Item>,
    pub subsections: Vec<Subsection>,
}

/// Level-2 grouping opened by `## ▷`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub title: String,
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            subsections: Vec::new(),
        }
    }

    pub fn level(&self) -> u8 {
        1
    }

    /// Direct items followed by every subsection's items.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .chain(self.subsections.iter().flat_map(|s| s.items.iter()))
    }
}

impl Subsection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn level(&self) -> u8 {
        2
    }
}

// Both levels serialize to the same `{title, level, items, subsections}` shape.

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Section", 4)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("level", &self.level())?;
        s.serialize_field("items", &self.items)?;
        s.serialize_field("subsections", &self.subsections)?;
        s.end()
    }
}

impl Serialize for Subsection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let no_subsections: [Subsection; 0] = [];
        let mut s = serializer.serialize_struct("Section", 4)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("level", &self.level())?;
        s.serialize_field("items", &self.items)?;
        s.serialize_field("subsections", &no_subsections)?;
        s.end()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total_items: usize,
    pub starred_items: usize,
    pub index_items: usize,
    pub cross_references: usize,
}

impl Metadata {
    /// Field-wise sum, used when combining documents.
    pub fn merge(&mut self, other: &Metadata) {
        self.total_items += other.total_items;
        self.starred_items += other.starred_items;
        self.index_items += other.index_items;
        self.cross_references += other.cross_references;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDocument {
    pub filename: String,
    pub title: String,
    pub sections: Vec<Section>,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> Item {
        Item {
            name: name.to_string(),
            description: String::new(),
            links: Vec::new(),
            is_starred: false,
            is_index: false,
            is_cross_reference: false,
            raw_content: format!("* {}", name),
        }
    }

    #[test]
    fn item_serializes_camel_case() {
        let v = serde_json::to_value(item("Tool")).unwrap();
        assert_eq!(v["name"], "Tool");
        assert_eq!(v["isStarred"], false);
        assert_eq!(v["isCrossReference"], false);
        assert_eq!(v["rawContent"], "* Tool");
    }

    #[test]
    fn link_type_key_is_type() {
        let link = Link {
            url: "https://discord.gg/x".into(),
            text: "Discord".into(),
            link_type: LinkType::Discord,
        };
        let v = serde_json::to_value(&link).unwrap();
        assert_eq!(v["type"], "discord");
    }

    #[test]
    fn subsection_serializes_as_level_two_section() {
        let mut section = Section::new("Video");
        let mut sub = Subsection::new("Streaming");
        sub.items.push(item("Player"));
        section.subsections.push(sub);

        let v = serde_json::to_value(&section).unwrap();
        assert_eq!(v["level"], 1);
        assert_eq!(v["subsections"][0]["level"], 2);
        assert_eq!(v["subsections"][0]["subsections"], serde_json::json!([]));
        assert_eq!(v["subsections"][0]["items"][0]["name"], "Player");
    }

    #[test]
    fn all_items_covers_both_levels() {
        let mut section = Section::new("A");
        section.items.push(item("one"));
        let mut sub = Subsection::new("B");
        sub.items.push(item("two"));
        section.subsections.push(sub);
        let names: Vec<_> = section.all_items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn metadata_merge_sums() {
        let mut a = Metadata { total_items: 3, starred_items: 1, index_items: 0, cross_references: 2 };
        let b = Metadata { total_items: 2, starred_items: 1, index_items: 1, cross_references: 0 };
        a.merge(&b);
        assert_eq!(a, Metadata { total_items: 5, starred_items: 2, index_items: 1, cross_references: 2 });
    }
}
