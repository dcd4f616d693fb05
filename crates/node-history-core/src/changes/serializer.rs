//! Deterministic string form of property values, used for both equality
//! checks and display.

use crate::changes::collaborators::ThumbnailProvider;
use crate::model::value::{AssetRef, ImageRef, PropertyValue};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Placeholder for values that cannot be encoded.
pub const UNSERIALIZABLE: &str = "[unserializable value]";

const INDENT: &[u8] = b"    ";

/// Pretty-printed JSON with four-space indentation, or [`UNSERIALIZABLE`].
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if value.serialize(&mut ser).is_err() {
        return UNSERIALIZABLE.to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| UNSERIALIZABLE.to_string())
}

#[derive(Serialize)]
struct AssetPreview<'a> {
    src: String,
    alt: &'a str,
    title: &'a str,
}

/// Serializes values, resolving asset thumbnails through a provider.
#[derive(Clone, Copy)]
pub struct ValueSerializer<'a> {
    thumbnails: &'a dyn ThumbnailProvider,
}

impl<'a> ValueSerializer<'a> {
    pub fn new(thumbnails: &'a dyn ThumbnailProvider) -> Self {
        Self { thumbnails }
    }

    /// Total: every value has a string form.
    ///
    /// With `simple`, assets collapse to their filename; this is how array
    /// elements are rendered.
    pub fn serialize(&self, value: &PropertyValue, simple: bool) -> String {
        match value {
            PropertyValue::String(s) => s.clone(),
            PropertyValue::Asset(asset) | PropertyValue::Image(ImageRef { asset, .. }) => {
                if simple {
                    asset.filename.clone()
                } else {
                    self.asset_preview(asset)
                }
            }
            PropertyValue::Node(node) => format!("{} ({})", node.label, node.identifier),
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Array(items) => {
                let elements: Vec<String> =
                    items.iter().map(|item| self.serialize(item, true)).collect();
                to_pretty_json(&elements)
            }
            PropertyValue::DateTime(dt) => to_pretty_json(&dt.to_rfc3339()),
            PropertyValue::Null => to_pretty_json(&Value::Null),
            PropertyValue::Other(raw) => to_pretty_json(raw),
        }
    }

    fn asset_preview(&self, asset: &AssetRef) -> String {
        let preview = AssetPreview {
            src: self.thumbnail_uri(asset),
            alt: &asset.filename,
            title: asset.display_title(),
        };
        to_pretty_json(&preview)
    }

    fn thumbnail_uri(&self, asset: &AssetRef) -> String {
        match self.thumbnails.thumbnail_uri(asset) {
            Ok(uri) => uri.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(
                    asset_id = %asset.identifier,
                    err.code = err.code(),
                    "thumbnail lookup failed: {}",
                    err
                );
                String::new()
            }
        }
    }
}
