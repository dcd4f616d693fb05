//! Change records produced by the change-set builder.

use crate::diff::model::TextDiff;
use serde::{Deserialize, Serialize};

/// Semantic category of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Text,
    Image,
    Asset,
    Node,
    DateTime,
    Boolean,
    Array,
    Other,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Text => "text",
            ChangeKind::Image => "image",
            ChangeKind::Asset => "asset",
            ChangeKind::Node => "node",
            ChangeKind::DateTime => "datetime",
            ChangeKind::Boolean => "boolean",
            ChangeKind::Array => "array",
            ChangeKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One changed property. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    property_name: String,
    property_label: String,
    old_value: String,
    new_value: String,
    #[serde(rename = "oldType")]
    old_kind: ChangeKind,
    #[serde(rename = "newType")]
    new_kind: ChangeKind,
    diff: Option<TextDiff>,
}

impl Change {
    pub fn new(
        property_name: impl Into<String>,
        property_label: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
        old_kind: ChangeKind,
        new_kind: ChangeKind,
        diff: Option<TextDiff>,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            property_label: property_label.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
            old_kind,
            new_kind,
            diff,
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn property_label(&self) -> &str {
        &self.property_label
    }

    /// Serialized old value
    pub fn old_value(&self) -> &str {
        &self.old_value
    }

    /// Serialized new value
    pub fn new_value(&self) -> &str {
        &self.new_value
    }

    pub fn old_kind(&self) -> ChangeKind {
        self.old_kind
    }

    pub fn new_kind(&self) -> ChangeKind {
        self.new_kind
    }

    /// Line diff; present only for text-to-text changes with at least one hunk
    pub fn diff(&self) -> Option<&TextDiff> {
        self.diff.as_ref()
    }
}

/// Ordered change set for one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changes(Vec<Change>);

impl Changes {
    pub fn new(changes: Vec<Change>) -> Self {
        Self(changes)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the change recorded for a property name
    pub fn get(&self, property_name: &str) -> Option<&Change> {
        self.0.iter().find(|c| c.property_name == property_name)
    }
}

impl IntoIterator for Changes {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
