//! Declarative folder templates.
//!
//! A template maps folder names to one of three shapes:
//!
//! ```json
//! {
//!   "00_Inbox": [],
//!   "21_Courses": ["2023", "2024"],
//!   "10_Work": { "11_Clients": [], "12_University": [] }
//! }
//! ```
//!
//! An empty value is a leaf folder, a list names plain subfolders, and a
//! mapping nests another template. Entries keep the order they were
//! declared in, both in memory and when serialized.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Children of a single template entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateNode {
    /// A folder with no children.
    Empty,
    /// A folder whose children are plain folders with no descendants.
    Leaves(Vec<String>),
    /// A folder containing another template.
    Nested(FolderTemplate),
}

/// Ordered name -> children mapping describing a folder tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderTemplate {
    entries: Vec<(String, TemplateNode)>,
}

impl FolderTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a folder with no children.
    pub fn folder(self, name: impl Into<String>) -> Self {
        self.with(name, TemplateNode::Empty)
    }

    /// Add a folder containing the listed plain subfolders.
    pub fn folder_with<I, S>(self, name: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children: Vec<String> = children.into_iter().map(Into::into).collect();
        if children.is_empty() {
            self.with(name, TemplateNode::Empty)
        } else {
            self.with(name, TemplateNode::Leaves(children))
        }
    }

    /// Add a folder containing a nested template.
    pub fn nested(self, name: impl Into<String>, template: FolderTemplate) -> Self {
        self.with(name, TemplateNode::Nested(template))
    }

    fn with(mut self, name: impl Into<String>, node: TemplateNode) -> Self {
        self.insert(name.into(), node);
        self
    }

    /// Insert an entry, replacing the children of an existing entry with
    /// the same name in place.
    pub fn insert(&mut self, name: String, node: TemplateNode) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = node,
            None => self.entries.push((name, node)),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &TemplateNode)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn get(&self, name: &str) -> Option<&TemplateNode> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every directory the template describes under `base`, depth-first in
    /// declaration order. Parents always precede their children.
    pub fn directories(&self, base: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        self.collect_directories(base, &mut out);
        out
    }

    fn collect_directories(&self, base: &Path, out: &mut Vec<PathBuf>) {
        for (name, node) in &self.entries {
            let path = base.join(name);
            out.push(path.clone());
            match node {
                TemplateNode::Empty => {}
                TemplateNode::Leaves(children) => {
                    out.extend(children.iter().map(|child| path.join(child)));
                }
                TemplateNode::Nested(template) => template.collect_directories(&path, out),
            }
        }
    }

    /// Check that every name is a single, normal path component.
    pub fn validate(&self) -> Result<()> {
        for (name, node) in &self.entries {
            validate_name(name)?;
            match node {
                TemplateNode::Empty => {}
                TemplateNode::Leaves(children) => {
                    for child in children {
                        validate_name(child)?;
                    }
                }
                TemplateNode::Nested(template) => template.validate()?,
            }
        }
        Ok(())
    }

    /// Parse a template from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the template to JSON, preserving entry order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Reject names that would leave their parent folder (`..`, `/`, absolute
/// paths) or are blank.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None)
            if !name.trim().is_empty() && !name.contains(['/', '\\']) =>
        {
            Ok(())
        }
        _ => Err(Error::InvalidInput(format!(
            "Folder name must be a single path component: {:?}",
            name
        ))),
    }
}

impl Serialize for FolderTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for TemplateNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TemplateNode::Empty => serializer.serialize_seq(Some(0))?.end(),
            TemplateNode::Leaves(children) => {
                let mut seq = serializer.serialize_seq(Some(children.len()))?;
                for child in children {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
            TemplateNode::Nested(template) => template.serialize(serializer),
        }
    }
}

fn visit_template_map<'de, A: MapAccess<'de>>(
    mut access: A,
) -> std::result::Result<FolderTemplate, A::Error> {
    let mut template = FolderTemplate::new();
    while let Some((name, node)) = access.next_entry::<String, TemplateNode>()? {
        template.insert(name, node);
    }
    Ok(template)
}

struct FolderTemplateVisitor;

impl<'de> Visitor<'de> for FolderTemplateVisitor {
    type Value = FolderTemplate;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of folder names")
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<Self::Value, A::Error> {
        visit_template_map(access)
    }
}

impl<'de> Deserialize<'de> for FolderTemplate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(FolderTemplateVisitor)
    }
}

struct TemplateNodeVisitor;

impl<'de> Visitor<'de> for TemplateNodeVisitor {
    type Value = TemplateNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("null, a list of folder names, or a nested mapping")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(TemplateNode::Empty)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(TemplateNode::Empty)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut children = Vec::new();
        while let Some(child) = seq.next_element::<String>()? {
            children.push(child);
        }
        if children.is_empty() {
            Ok(TemplateNode::Empty)
        } else {
            Ok(TemplateNode::Leaves(children))
        }
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<Self::Value, A::Error> {
        let template = visit_template_map(access)?;
        if template.is_empty() {
            Ok(TemplateNode::Empty)
        } else {
            Ok(TemplateNode::Nested(template))
        }
    }
}

impl<'de> Deserialize<'de> for TemplateNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(TemplateNodeVisitor)
    }
}
