//! Canonical schema constants for structured logging
//!
//! These constants keep log fields consistent between the diff engine,
//! the CLI and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_NODE_TYPE: &str = "node_type";
pub const FIELD_NODE_ID: &str = "node_id";
pub const FIELD_PROPERTY: &str = "property";
pub const FIELD_ASSET_ID: &str = "asset_id";

// Collection sizes
pub const FIELD_PROPERTY_COUNT: &str = "property_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
