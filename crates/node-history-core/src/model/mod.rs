//! Domain models: property values, node type schemas and change records.

pub mod change;
pub mod node_type;
pub mod value;

pub use change::{Change, ChangeKind, Changes};
pub use node_type::{NodeSchema, PropertySchema};
pub use value::{AssetRef, ImageRef, NodeRef, PropertySnapshot, PropertyValue};
