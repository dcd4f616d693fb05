//! Node events as stored in the CMS event log.
//!
//! ```json
//! {
//!   "timestamp": "2024-03-01T10:15:00+01:00",
//!   "accountIdentifier": "editor-1",
//!   "nodeIdentifier": "8f2c...",
//!   "eventType": "NODE_UPDATED",
//!   "data": {
//!     "nodeType": "Vendor:Text",
//!     "old": { "title": "Draft" },
//!     "new": { "title": "Final" }
//!   }
//! }
//! ```

#![allow(clippy::result_large_err)]

use crate::errors::{ExError, ExErrorKind, HistoryError};
use crate::model::value::{PropertySnapshot, PropertyValue};
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

/// Before/after payload of a node event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    pub node_type: String,
    /// Absent when the node was created by this event
    pub old: Option<PropertySnapshot>,
    pub new: PropertySnapshot,
}

impl EventData {
    pub fn new(node_type: impl Into<String>, new: PropertySnapshot) -> Self {
        Self {
            node_type: node_type.into(),
            old: None,
            new,
        }
    }

    pub fn with_old(mut self, old: PropertySnapshot) -> Self {
        self.old = Some(old);
        self
    }
}

/// One persisted event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeEvent {
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub account_identifier: Option<String>,
    pub node_identifier: Option<String>,
    pub event_type: Option<String>,
    pub data: Option<EventData>,
}

impl NodeEvent {
    pub fn with_data(data: EventData) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn node_type(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.node_type.as_str())
    }
}

fn invalid(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidEvent)
        .with_op("parse_event_bytes")
        .with_message(message)
}

/// Decode one event from raw JSON bytes.
///
/// # Errors
///
/// - `InvalidEvent`: bytes are not UTF-8 JSON, the root is not an object,
///   or a field has the wrong type
/// - `MissingField`: `data` is a non-empty object without `data.nodeType`
pub fn parse_event_bytes(bytes: &[u8]) -> Result<NodeEvent, ExError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| invalid(format!("event is not valid UTF-8: {}", e)))?;
    let raw: Value = serde_json::from_str(text)
        .map_err(|e| invalid(format!("event is not valid JSON: {}", e)))?;
    decode_event(&raw)
}

/// Decode a JSON array of events, preserving order.
///
/// # Errors
///
/// `InvalidEvent` when the root is not an array, plus any error of
/// [`parse_event_bytes`] for an element, with the element index as entity id.
pub fn parse_events_bytes(bytes: &[u8]) -> Result<Vec<NodeEvent>, ExError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| invalid(format!("events are not valid UTF-8: {}", e)))?;
    let raw: Value = serde_json::from_str(text)
        .map_err(|e| invalid(format!("events are not valid JSON: {}", e)))?;
    let items = raw
        .as_array()
        .ok_or_else(|| invalid("events JSON root must be an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| decode_event(item).map_err(|e| e.with_entity_id(index.to_string())))
        .collect()
}

fn decode_event(raw: &Value) -> Result<NodeEvent, ExError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| invalid("event JSON root must be an object"))?;

    let timestamp = match optional_str(obj, "timestamp")? {
        Some(ts) => Some(
            DateTime::parse_from_rfc3339(ts)
                .map_err(|e| invalid(format!("`timestamp` is not RFC 3339: {}", e)))?,
        ),
        None => None,
    };

    let data = match obj.get("data") {
        None | Some(Value::Null) => None,
        // `{}` carries nothing to diff
        Some(Value::Object(data)) if data.is_empty() => None,
        Some(Value::Object(data)) => Some(decode_data(data)?),
        Some(other) => return Err(invalid(format!("`data` must be an object, got: {}", other))),
    };

    Ok(NodeEvent {
        timestamp,
        account_identifier: optional_str(obj, "accountIdentifier")?.map(str::to_string),
        node_identifier: optional_str(obj, "nodeIdentifier")?.map(str::to_string),
        event_type: optional_str(obj, "eventType")?.map(str::to_string),
        data,
    })
}

fn optional_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a str>, ExError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(invalid(format!("`{}` must be a string, got: {}", key, other))),
    }
}

fn decode_data(data: &Map<String, Value>) -> Result<EventData, ExError> {
    let node_type = match data.get("nodeType") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            return Err(ExError::from(HistoryError::MissingField {
                field: "data.nodeType".to_string(),
            })
            .with_op("parse_event_bytes"))
        }
        Some(other) => {
            return Err(invalid(format!("`data.nodeType` must be a string, got: {}", other)))
        }
    };

    let old = match data.get("old") {
        None | Some(Value::Null) => None,
        Some(value) => Some(decode_snapshot("data.old", value)?),
    };
    let new = match data.get("new") {
        None | Some(Value::Null) => PropertySnapshot::new(),
        Some(value) => decode_snapshot("data.new", value)?,
    };

    Ok(EventData { node_type, old, new })
}

fn decode_snapshot(field: &str, value: &Value) -> Result<PropertySnapshot, ExError> {
    let map = value
        .as_object()
        .ok_or_else(|| invalid(format!("`{}` must be an object", field)))?;

    map.iter()
        .map(|(name, raw)| {
            PropertyValue::from_json(raw)
                .map(|value| (name.clone(), value))
                .map_err(|e| ExError::from(e).with_op("parse_event_bytes").with_property(name.clone()))
        })
        .collect()
}
