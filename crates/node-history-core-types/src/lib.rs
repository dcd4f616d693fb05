//! Core types shared across node-history facilities
//!
//! Canonical field keys and event names used by the logging facility and
//! the error facility, so both sides agree on the structured schema.

pub mod schema;
