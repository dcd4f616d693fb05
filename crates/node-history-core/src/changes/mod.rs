//! Change classification, value serialization and change-set building.
//!
//! ```
//! use node_history_core::changes::ChangeSetBuilder;
//! use node_history_core::diff::HtmlArrayRenderer;
//! use node_history_core::model::{NodeSchema, PropertySnapshot};
//! use node_history_core::schema_registry::SchemaRegistry;
//!
//! let registry = SchemaRegistry::new().with_schema(NodeSchema::new("Vendor:Text"));
//! let builder = ChangeSetBuilder::new(&registry);
//! let old = PropertySnapshot::new().with("title", "Draft");
//! let new = PropertySnapshot::new().with("title", "Final");
//! let schema = NodeSchema::new("Vendor:Text");
//!
//! let changes = builder.build_changes(Some(&old), &new, &schema, &HtmlArrayRenderer);
//! assert_eq!(changes.len(), 1);
//! ```

pub mod builder;
pub mod classifier;
pub mod collaborators;
pub mod serializer;

pub use builder::ChangeSetBuilder;
pub use classifier::classify;
pub use collaborators::{
    NoThumbnails, NoTranslation, SchemaProvider, StaticTranslations, ThumbnailProvider, Translator,
};
pub use serializer::{to_pretty_json, ValueSerializer, UNSERIALIZABLE};
