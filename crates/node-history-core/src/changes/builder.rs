//! Change-set builder.
//!
//! Walks the new snapshot in declaration order and emits one [`Change`] per
//! property whose serialized form differs from the old snapshot, skipping
//! default or empty values on creation.
//!
//! ## Logging
//!
//! - `log_op_start!` / `log_op_end!` around [`ChangeSetBuilder::build`]
//! - `warn!` when the node type is unknown and the event is skipped

#![allow(clippy::result_large_err)]

use crate::changes::classifier::classify;
use crate::changes::collaborators::{
    NoThumbnails, NoTranslation, SchemaProvider, ThumbnailProvider, Translator,
};
use crate::changes::serializer::ValueSerializer;
use crate::config::DiffOptions;
use crate::diff::renderer::DiffRenderer;
use crate::diff::text::TextDiffer;
use crate::errors::{ExError, ExErrorKind};
use crate::event::NodeEvent;
use crate::model::change::{Change, Changes};
use crate::model::node_type::NodeSchema;
use crate::model::value::{PropertySnapshot, PropertyValue};
use crate::{log_op_end, log_op_error, log_op_start};

static NULL_VALUE: PropertyValue = PropertyValue::Null;

/// Builds [`Changes`] for node events.
///
/// Collaborators are borrowed; the builder itself holds no mutable state and
/// can be shared across threads.
pub struct ChangeSetBuilder<'a> {
    schemas: &'a dyn SchemaProvider,
    thumbnails: &'a dyn ThumbnailProvider,
    translator: &'a dyn Translator,
    differ: TextDiffer,
}

impl<'a> ChangeSetBuilder<'a> {
    /// Builder without thumbnails or label translation.
    pub fn new(schemas: &'a dyn SchemaProvider) -> Self {
        Self {
            schemas,
            thumbnails: &NoThumbnails,
            translator: &NoTranslation,
            differ: TextDiffer::default(),
        }
    }

    pub fn with_thumbnails(mut self, thumbnails: &'a dyn ThumbnailProvider) -> Self {
        self.thumbnails = thumbnails;
        self
    }

    pub fn with_translator(mut self, translator: &'a dyn Translator) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.differ = TextDiffer::new(options);
        self
    }

    /// Changes recorded by one event.
    ///
    /// Returns empty `Changes` when the event carries no data, when no
    /// renderer is supplied, or when the node type is unknown.
    ///
    /// # Errors
    ///
    /// Schema lookup failures other than `NotFound` are propagated.
    pub fn build(
        &self,
        event: &NodeEvent,
        renderer: Option<&dyn DiffRenderer>,
    ) -> Result<Changes, ExError> {
        let (Some(data), Some(renderer)) = (event.data.as_ref(), renderer) else {
            return Ok(Changes::empty());
        };

        log_op_start!(
            "build_changes",
            node_type = %data.node_type,
            property_count = data.new.len()
        );
        let start = std::time::Instant::now();

        let schema = match self.schemas.schema(&data.node_type) {
            Ok(schema) => schema,
            Err(err) if err.kind() == ExErrorKind::NotFound => {
                tracing::warn!(
                    node_type = %data.node_type,
                    err.code = err.code(),
                    "node type not declared, no changes rendered"
                );
                log_op_end!(
                    "build_changes",
                    duration_ms = start.elapsed().as_millis() as u64,
                    change_count = 0u64
                );
                return Ok(Changes::empty());
            }
            Err(err) => {
                log_op_error!(
                    "build_changes",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                return Err(ExError::new(err.kind())
                    .with_op("build_changes")
                    .with_entity_id(data.node_type.clone())
                    .with_message("schema lookup failed")
                    .with_source(err));
            }
        };

        let changes = self.build_changes(data.old.as_ref(), &data.new, &schema, renderer);

        log_op_end!(
            "build_changes",
            duration_ms = start.elapsed().as_millis() as u64,
            change_count = changes.len() as u64
        );
        Ok(changes)
    }

    /// Changes between two snapshots of a node with the given schema.
    ///
    /// `old` is `None` when the node is being created.
    pub fn build_changes(
        &self,
        old: Option<&PropertySnapshot>,
        new: &PropertySnapshot,
        schema: &NodeSchema,
        renderer: &dyn DiffRenderer,
    ) -> Changes {
        let serializer = ValueSerializer::new(self.thumbnails);
        let mut changes = Vec::new();

        for (name, new_value) in new.iter() {
            if is_suppressed(old.is_none(), new_value, schema.default_for(name)) {
                continue;
            }

            let original = old.and_then(|o| o.get(name)).unwrap_or(&NULL_VALUE);
            if original.is_identical(new_value) {
                continue;
            }

            let old_kind = classify(original);
            let new_kind = classify(new_value);

            let old_serialized = serializer.serialize(original, false);
            let new_serialized = serializer.serialize(new_value, false);
            if old_serialized == new_serialized {
                continue;
            }

            let diff = if original.is_string() && new_value.is_string() {
                Some(self.differ.diff(&old_serialized, &new_serialized, renderer))
                    .filter(|d| !d.is_empty())
            } else {
                None
            };

            tracing::debug!(property = name, %old_kind, %new_kind, "property changed");
            changes.push(Change::new(
                name,
                self.label(schema, name),
                old_serialized,
                new_serialized,
                old_kind,
                new_kind,
                diff,
            ));
        }
        Changes::new(changes)
    }

    fn label(&self, schema: &NodeSchema, name: &str) -> String {
        match schema.label_for(name) {
            Some(id) => self
                .translator
                .translate(id)
                .unwrap_or_else(|| id.to_string()),
            None => name.to_string(),
        }
    }
}

/// Creation with an empty value, or any value equal to the declared default.
fn is_suppressed(
    is_creation: bool,
    value: &PropertyValue,
    default: Option<&PropertyValue>,
) -> bool {
    (is_creation && value.is_empty()) || default.is_some_and(|d| d.is_identical(value))
}
