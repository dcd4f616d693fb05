//! Value kind classification.

use crate::model::change::ChangeKind;
use crate::model::value::PropertyValue;

type Predicate = fn(&PropertyValue) -> bool;

fn is_text(v: &PropertyValue) -> bool {
    v.is_string()
}

fn is_image(v: &PropertyValue) -> bool {
    v.as_image().is_some()
}

fn is_asset(v: &PropertyValue) -> bool {
    v.as_asset().is_some()
}

fn is_node(v: &PropertyValue) -> bool {
    v.as_node().is_some()
}

fn is_datetime(v: &PropertyValue) -> bool {
    v.as_datetime().is_some()
}

fn is_boolean(v: &PropertyValue) -> bool {
    v.as_bool().is_some()
}

fn is_array(v: &PropertyValue) -> bool {
    v.as_array().is_some()
}

/// Ordered dispatch table; the first matching predicate wins.
///
/// Image must precede Asset: `as_asset` answers for images too.
const KIND_TABLE: &[(Predicate, ChangeKind)] = &[
    (is_text, ChangeKind::Text),
    (is_image, ChangeKind::Image),
    (is_asset, ChangeKind::Asset),
    (is_node, ChangeKind::Node),
    (is_datetime, ChangeKind::DateTime),
    (is_boolean, ChangeKind::Boolean),
    (is_array, ChangeKind::Array),
];

/// Semantic kind of a raw value.
pub fn classify(value: &PropertyValue) -> ChangeKind {
    KIND_TABLE
        .iter()
        .find(|(predicate, _)| predicate(value))
        .map_or(ChangeKind::Other, |(_, kind)| *kind)
}
