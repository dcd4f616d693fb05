//! Seams to the surrounding CMS: schema lookup, thumbnails, label translation.

use crate::errors::ExError;
use crate::model::node_type::NodeSchema;
use crate::model::value::AssetRef;
use serde::Deserialize;
use std::collections::HashMap;

/// Supplies the declared schema of a node type.
pub trait SchemaProvider: Send + Sync {
    /// # Errors
    ///
    /// `NotFound` when the node type is not declared; other kinds for
    /// lookup failures.
    fn schema(&self, node_type: &str) -> Result<NodeSchema, ExError>;
}

/// Resolves a preview URI for an asset.
pub trait ThumbnailProvider: Send + Sync {
    /// `Ok(None)` when the asset has no thumbnail.
    ///
    /// # Errors
    ///
    /// Any kind; callers substitute an empty URI.
    fn thumbnail_uri(&self, asset: &AssetRef) -> Result<Option<String>, ExError>;
}

/// Provider for hosts that do not render thumbnails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThumbnails;

impl ThumbnailProvider for NoThumbnails {
    fn thumbnail_uri(&self, _asset: &AssetRef) -> Result<Option<String>, ExError> {
        Ok(None)
    }
}

/// Translates label ids such as `Vendor.Site:NodeTypes.Text:properties.title`.
pub trait Translator: Send + Sync {
    /// `None` when no translation exists.
    fn translate(&self, id: &str) -> Option<String>;
}

impl<F> Translator for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn translate(&self, id: &str) -> Option<String> {
        self(id)
    }
}

/// Translator that never translates; labels show their raw ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTranslation;

impl Translator for NoTranslation {
    fn translate(&self, _id: &str) -> Option<String> {
        None
    }
}

/// Fixed id-to-label catalog, e.g. loaded from a YAML map.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StaticTranslations {
    labels: HashMap<String, String>,
}

impl StaticTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(id.into(), label.into());
        self
    }
}

impl Translator for StaticTranslations {
    fn translate(&self, id: &str) -> Option<String> {
        self.labels.get(id).cloned()
    }
}
