//! In-memory node type registry loaded from NodeTypes YAML.
//!
//! ```yaml
//! 'Vendor:Document':
//!   abstract: true
//!   properties:
//!     title:
//!       defaultValue: ''
//!       ui:
//!         label: 'Vendor:NodeTypes.Document:properties.title'
//!
//! 'Vendor:Text':
//!   superTypes:
//!     'Vendor:Document': true
//!   ui:
//!     icon: 'file-text'
//!   properties:
//!     body:
//!       ui:
//!         label: 'Body'
//! ```
//!
//! Properties inherited through `superTypes` come first, in super type
//! declaration order; a type's own declarations override inherited ones.

#![allow(clippy::result_large_err)]

use crate::changes::collaborators::SchemaProvider;
use crate::errors::{ExError, HistoryError, Result};
use crate::model::node_type::{NodeSchema, PropertySchema};
use crate::model::value::PropertyValue;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNodeType {
    #[serde(default)]
    super_types: IndexMap<String, Option<bool>>,
    #[serde(default)]
    ui: RawUi,
    #[serde(default)]
    properties: IndexMap<String, Option<RawProperty>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUi {
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProperty {
    #[serde(default)]
    default_value: Option<serde_json::Value>,
    #[serde(default)]
    ui: RawUi,
}

/// Declared node types, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, NodeSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(mut self, schema: NodeSchema) -> Self {
        self.insert(schema);
        self
    }

    pub fn insert(&mut self, schema: NodeSchema) {
        self.schemas.insert(schema.name.clone(), schema);
    }

    pub fn get(&self, node_type: &str) -> Option<&NodeSchema> {
        self.schemas.get(node_type)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Parse a NodeTypes YAML document.
    ///
    /// # Errors
    ///
    /// `InvalidSchema` for malformed YAML, unknown or cyclic super types,
    /// and default values that are not valid property values.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: IndexMap<String, Option<RawNodeType>> =
            serde_yaml::from_str(content).map_err(|e| invalid(format!("YAML parse error: {}", e)))?;
        let raw: IndexMap<String, RawNodeType> = raw
            .into_iter()
            .map(|(name, node_type)| (name, node_type.unwrap_or_default()))
            .collect();

        let mut registry = Self::new();
        for name in raw.keys() {
            let mut chain = Vec::new();
            let schema = resolve(name, &raw, &mut chain)?;
            registry.insert(schema);
        }
        tracing::debug!(node_type_count = registry.len(), "node types loaded");
        Ok(registry)
    }

    /// Read and parse a NodeTypes YAML file.
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, otherwise as [`Self::from_yaml_str`].
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

impl SchemaProvider for SchemaRegistry {
    fn schema(&self, node_type: &str) -> std::result::Result<NodeSchema, ExError> {
        self.get(node_type).cloned().ok_or_else(|| {
            ExError::from(HistoryError::NodeTypeNotFound {
                node_type: node_type.to_string(),
            })
            .with_op("schema")
        })
    }
}

fn invalid(reason: impl Into<String>) -> HistoryError {
    HistoryError::InvalidSchema {
        reason: reason.into(),
    }
}

fn resolve(
    name: &str,
    raw: &IndexMap<String, RawNodeType>,
    chain: &mut Vec<String>,
) -> Result<NodeSchema> {
    if chain.iter().any(|seen| seen == name) {
        chain.push(name.to_string());
        return Err(invalid(format!("cyclic superTypes: {}", chain.join(" -> "))));
    }
    let node_type = raw
        .get(name)
        .ok_or_else(|| invalid(format!("unknown super type `{}`", name)))?;
    chain.push(name.to_string());

    let mut schema = NodeSchema::new(name);
    for (super_name, enabled) in &node_type.super_types {
        // `false` removes an inherited super type
        if *enabled == Some(false) {
            continue;
        }
        let parent = resolve(super_name, raw, chain)?;
        if schema.icon.is_none() {
            schema.icon = parent.icon;
        }
        for (property, declared) in parent.properties {
            schema.properties.insert(property, declared);
        }
    }
    chain.pop();

    if node_type.ui.icon.is_some() {
        schema.icon = node_type.ui.icon.clone();
    }
    for (property, declared) in &node_type.properties {
        let declared = declared.as_ref();
        let inherited = schema.properties.get(property).cloned().unwrap_or_default();
        let merged = PropertySchema {
            default_value: match declared.and_then(|d| d.default_value.as_ref()) {
                Some(value) => Some(PropertyValue::from_json(value).map_err(|e| {
                    invalid(format!("{}.{}: bad defaultValue: {}", name, property, e))
                })?),
                None => inherited.default_value,
            },
            label: declared
                .and_then(|d| d.ui.label.clone())
                .or(inherited.label),
        };
        schema.properties.insert(property.clone(), merged);
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    const NODE_TYPES: &str = r#"
'Vendor:Document':
  ui:
    icon: 'file'
  properties:
    title:
      defaultValue: ''
      ui:
        label: 'i18n:title'
    hidden:
      defaultValue: false

'Vendor:Text':
  superTypes:
    'Vendor:Document': true
  ui:
    icon: 'file-text'
  properties:
    body:
      ui:
        label: 'Body'
    title:
      defaultValue: 'Untitled'
"#;

    #[test]
    fn test_inherits_and_overrides() {
        let registry = SchemaRegistry::from_yaml_str(NODE_TYPES).unwrap();
        let text = registry.get("Vendor:Text").unwrap();
        assert_eq!(text.icon.as_deref(), Some("file-text"));

        let names: Vec<&str> = text.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["title", "hidden", "body"]);
        assert_eq!(text.default_for("title"), Some(&PropertyValue::from("Untitled")));
        assert_eq!(text.label_for("title"), Some("i18n:title"));
        assert_eq!(text.default_for("hidden"), Some(&PropertyValue::from(false)));
    }

    #[test]
    fn test_unknown_type_is_not_found() {
        let registry = SchemaRegistry::from_yaml_str(NODE_TYPES).unwrap();
        let err = registry.schema("Vendor:Missing").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        assert_eq!(err.entity_id(), Some("Vendor:Missing"));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let yaml = "A:\n  superTypes: { B: true }\nB:\n  superTypes: { A: true }\n";
        let err = SchemaRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidSchema { .. }));
    }

    #[test]
    fn test_empty_type_declaration() {
        let registry = SchemaRegistry::from_yaml_str("'Vendor:Empty': ~\n").unwrap();
        assert!(registry.get("Vendor:Empty").unwrap().properties.is_empty());
    }
}
