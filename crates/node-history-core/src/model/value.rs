//! Property values as recorded in publish events.
//!
//! A node's property bag mixes plain scalars with references to other
//! domain objects (assets, images, nodes) and date/time values. In the
//! event log those references are stored as JSON objects carrying a
//! `__type` discriminator:
//!
//! ```json
//! { "__type": "image", "identifier": "a1", "filename": "hero.jpg", "width": 800 }
//! { "__type": "node", "identifier": "n1", "label": "About us" }
//! { "__type": "datetime", "value": "2024-05-01T10:00:00+02:00" }
//! ```
//!
//! Every other JSON shape decodes to a scalar, an array, or [`PropertyValue::Other`].

use crate::errors::HistoryError;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key of the discriminator field on reference objects.
pub const TYPE_KEY: &str = "__type";

const TYPE_ASSET: &str = "asset";
const TYPE_IMAGE: &str = "image";
const TYPE_NODE: &str = "node";
const TYPE_DATETIME: &str = "datetime";

/// Reference to a media asset (document, video, any uploaded file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    pub identifier: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl AssetRef {
    pub fn new(identifier: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            filename: filename.into(),
            title: None,
            media_type: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title for display; an empty or missing title falls back to the filename.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &self.filename,
        }
    }
}

/// Reference to an image. Every image is also an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(flatten)]
    pub asset: AssetRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageRef {
    pub fn new(asset: AssetRef) -> Self {
        Self {
            asset,
            width: None,
            height: None,
        }
    }
}

/// Reference to another content node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    pub identifier: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

impl NodeRef {
    pub fn new(identifier: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            node_type: None,
        }
    }
}

/// A single raw property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    String(String),
    Bool(bool),
    Array(Vec<PropertyValue>),
    Asset(AssetRef),
    Image(ImageRef),
    Node(NodeRef),
    DateTime(DateTime<FixedOffset>),
    /// Numbers, plain objects and anything else without a dedicated variant
    Other(Value),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, PropertyValue::String(_))
    }

    /// Equality that also tells apart date/times naming the same instant
    /// in different offsets; `==` compares instants only.
    pub fn is_identical(&self, other: &PropertyValue) -> bool {
        match (self, other) {
            (PropertyValue::DateTime(a), PropertyValue::DateTime(b)) => {
                a.to_rfc3339() == b.to_rfc3339()
            }
            (PropertyValue::Array(a), PropertyValue::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_identical(y))
            }
            _ => self == other,
        }
    }

    /// The asset behind this value; images answer too.
    pub fn as_asset(&self) -> Option<&AssetRef> {
        match self {
            PropertyValue::Asset(asset) => Some(asset),
            PropertyValue::Image(image) => Some(&image.asset),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageRef> {
        match self {
            PropertyValue::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&NodeRef> {
        match self {
            PropertyValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            PropertyValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            PropertyValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// True for values that carry no content: null, `""`, `"0"`, `false`,
    /// zero, and empty arrays or objects. References are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            PropertyValue::Null => true,
            PropertyValue::String(s) => s.is_empty() || s == "0",
            PropertyValue::Bool(b) => !b,
            PropertyValue::Array(items) => items.is_empty(),
            PropertyValue::Asset(_)
            | PropertyValue::Image(_)
            | PropertyValue::Node(_)
            | PropertyValue::DateTime(_) => false,
            PropertyValue::Other(value) => match value {
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::Number(n) => n.as_f64() == Some(0.0),
                Value::String(s) => s.is_empty() || s == "0",
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
            },
        }
    }

    /// Decode a JSON value from the event log.
    ///
    /// # Errors
    ///
    /// `InvalidEvent` when an object carries a known `__type` but its fields
    /// do not match that reference shape.
    pub fn from_json(value: &Value) -> Result<Self, HistoryError> {
        match value {
            Value::Null => Ok(PropertyValue::Null),
            Value::String(s) => Ok(PropertyValue::String(s.clone())),
            Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
            Value::Array(items) => items
                .iter()
                .map(PropertyValue::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(PropertyValue::Array),
            Value::Object(map) => decode_object(map),
            Value::Number(_) => Ok(PropertyValue::Other(value.clone())),
        }
    }

    /// Encode back into the event-log JSON shape.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null => Value::Null,
            PropertyValue::String(s) => Value::String(s.clone()),
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Array(items) => {
                Value::Array(items.iter().map(PropertyValue::to_json).collect())
            }
            PropertyValue::Asset(asset) => tagged(TYPE_ASSET, asset),
            PropertyValue::Image(image) => tagged(TYPE_IMAGE, image),
            PropertyValue::Node(node) => tagged(TYPE_NODE, node),
            PropertyValue::DateTime(dt) => {
                let mut map = Map::new();
                map.insert(TYPE_KEY.to_string(), Value::from(TYPE_DATETIME));
                map.insert("value".to_string(), Value::from(dt.to_rfc3339()));
                Value::Object(map)
            }
            PropertyValue::Other(value) => value.clone(),
        }
    }
}

fn decode_object(map: &Map<String, Value>) -> Result<PropertyValue, HistoryError> {
    let Some(type_tag) = map.get(TYPE_KEY).and_then(Value::as_str) else {
        return Ok(PropertyValue::Other(Value::Object(map.clone())));
    };

    let mut fields = map.clone();
    fields.remove(TYPE_KEY);
    let fields = Value::Object(fields);

    match type_tag {
        TYPE_ASSET => serde_json::from_value(fields)
            .map(PropertyValue::Asset)
            .map_err(|e| reference_error(type_tag, e)),
        TYPE_IMAGE => serde_json::from_value(fields)
            .map(PropertyValue::Image)
            .map_err(|e| reference_error(type_tag, e)),
        TYPE_NODE => serde_json::from_value(fields)
            .map(PropertyValue::Node)
            .map_err(|e| reference_error(type_tag, e)),
        TYPE_DATETIME => {
            let raw = fields
                .get("value")
                .and_then(Value::as_str)
                .ok_or_else(|| HistoryError::InvalidEvent {
                    reason: "datetime reference without a string `value`".to_string(),
                })?;
            DateTime::parse_from_rfc3339(raw)
                .map(PropertyValue::DateTime)
                .map_err(|e| HistoryError::InvalidEvent {
                    reason: format!("datetime `{}` is not RFC 3339: {}", raw, e),
                })
        }
        // Unknown discriminators are kept verbatim
        _ => Ok(PropertyValue::Other(Value::Object(map.clone()))),
    }
}

fn reference_error(type_tag: &str, err: serde_json::Error) -> HistoryError {
    HistoryError::InvalidEvent {
        reason: format!("malformed {} reference: {}", type_tag, err),
    }
}

fn tagged<T: Serialize>(type_tag: &str, reference: &T) -> Value {
    let mut map = Map::new();
    map.insert(TYPE_KEY.to_string(), Value::from(type_tag));
    if let Ok(Value::Object(fields)) = serde_json::to_value(reference) {
        map.extend(fields);
    }
    Value::Object(map)
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        PropertyValue::from_json(&value).map_err(D::Error::custom)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<AssetRef> for PropertyValue {
    fn from(asset: AssetRef) -> Self {
        PropertyValue::Asset(asset)
    }
}

impl From<ImageRef> for PropertyValue {
    fn from(image: ImageRef) -> Self {
        PropertyValue::Image(image)
    }
}

impl From<NodeRef> for PropertyValue {
    fn from(node: NodeRef) -> Self {
        PropertyValue::Node(node)
    }
}

impl From<DateTime<FixedOffset>> for PropertyValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        PropertyValue::DateTime(dt)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(items: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(items)
    }
}

/// A node's property bag at one point in time, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySnapshot(IndexMap<String, PropertyValue>);

impl PropertySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// Insert or replace a property; a new name is appended at the end.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for PropertySnapshot {
    fn from_iter<I: IntoIterator<Item = (K, PropertyValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
