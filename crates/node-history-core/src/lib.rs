//! Node History Core - change history rendering for content nodes
//!
//! This crate provides the pieces needed to show what an editor changed on a
//! content node, including:
//! - A property value model (text, assets, images, node references, dates, arrays)
//! - Kind classification and deterministic value serialization
//! - A line-oriented text diff with HTML and plain renderers
//! - The change-set builder that applies suppression rules per property
//! - Event decoding, a NodeTypes schema registry and timeline helpers

pub mod changes;
pub mod config;
pub mod diff;
pub mod errors;
pub mod event;
pub mod logging_facility;
pub mod model;
pub mod schema_registry;
pub mod timeline;

pub use node_history_core_types::schema as log_schema;

// Re-export commonly used types
pub use changes::{ChangeSetBuilder, SchemaProvider, ThumbnailProvider, Translator};
pub use config::DiffOptions;
pub use diff::{DiffRenderer, HtmlArrayRenderer, PlainArrayRenderer, TextDiff, TextDiffer};
pub use errors::{ExError, ExErrorKind, HistoryError, Result};
pub use event::{parse_event_bytes, parse_events_bytes, EventData, NodeEvent};
pub use model::{Change, ChangeKind, Changes, NodeSchema, PropertySnapshot, PropertyValue};
pub use schema_registry::SchemaRegistry;
