//! Node type schema as seen by the history renderer.

use crate::model::value::PropertyValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declared metadata for one property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<PropertyValue>,
    /// Label id; passed through the translation lookup before display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Declared shape of a node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySchema>,
}

impl NodeSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, property: PropertySchema) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn default_for(&self, property: &str) -> Option<&PropertyValue> {
        self.properties
            .get(property)
            .and_then(|p| p.default_value.as_ref())
    }

    pub fn label_for(&self, property: &str) -> Option<&str> {
        self.properties
            .get(property)
            .and_then(|p| p.label.as_deref())
    }
}

impl PropertySchema {
    pub fn with_default(mut self, value: impl Into<PropertyValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
