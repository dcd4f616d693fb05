//! Change-set building: suppression rules, classification, labels and diffs.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{registry, text_event, text_schema};
use node_history_core::changes::{ChangeSetBuilder, SchemaProvider, ThumbnailProvider};
use node_history_core::diff::{HtmlArrayRenderer, PlainArrayRenderer};
use node_history_core::errors::{ExError, ExErrorKind};
use node_history_core::event::{EventData, NodeEvent};
use node_history_core::model::{
    AssetRef, ChangeKind, ImageRef, NodeRef, NodeSchema, PropertySnapshot, PropertyValue,
};
use proptest::prelude::*;
use serde_json::json;

fn numbers(values: &[i64]) -> PropertyValue {
    PropertyValue::Array(
        values
            .iter()
            .map(|n| PropertyValue::Other(json!(n)))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// Suppression
// ---------------------------------------------------------------------------

#[test]
fn test_identical_snapshots_have_no_changes() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let snapshot = PropertySnapshot::new()
        .with("title", "Home")
        .with("body", "<p>Welcome</p>")
        .with("tags", numbers(&[1, 2]))
        .with("hidden", true);

    let changes = builder.build_changes(
        Some(&snapshot),
        &snapshot,
        &text_schema(),
        &HtmlArrayRenderer,
    );
    assert!(changes.is_empty());
}

#[test]
fn test_default_value_on_creation_is_suppressed() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let new = PropertySnapshot::new().with("title", "");

    let changes = builder
        .build(&text_event(None, new), Some(&HtmlArrayRenderer))
        .unwrap();
    assert!(changes.is_empty());
}

#[test]
fn test_default_value_on_update_is_suppressed() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let old = PropertySnapshot::new().with("hidden", true);
    let new = PropertySnapshot::new().with("hidden", false);

    let changes = builder
        .build(&text_event(Some(old), new), Some(&HtmlArrayRenderer))
        .unwrap();
    assert!(changes.is_empty());
}

#[test]
fn test_empty_values_on_creation_are_suppressed() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let new = PropertySnapshot::new()
        .with("teaser", "")
        .with("tags", PropertyValue::Array(vec![]))
        .with("count", PropertyValue::Other(json!(0)))
        .with("meta", PropertyValue::Null);

    let changes = builder.build_changes(None, &new, &text_schema(), &HtmlArrayRenderer);
    assert!(changes.is_empty());
}

#[test]
fn test_zero_string_on_creation_is_suppressed() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let created = builder.build_changes(
        None,
        &PropertySnapshot::new().with("title", "0"),
        &NodeSchema::new("T"),
        &HtmlArrayRenderer,
    );
    assert!(created.is_empty());

    let old = PropertySnapshot::new().with("title", "1");
    let updated = builder.build_changes(
        Some(&old),
        &PropertySnapshot::new().with("title", "0"),
        &NodeSchema::new("T"),
        &HtmlArrayRenderer,
    );
    assert_eq!(updated.get("title").unwrap().new_value(), "0");
}

#[test]
fn test_same_instant_in_another_offset_is_a_change() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let utc = chrono::DateTime::parse_from_rfc3339("2024-01-01T10:00:00+00:00").unwrap();
    let berlin = chrono::DateTime::parse_from_rfc3339("2024-01-01T11:00:00+01:00").unwrap();
    assert_eq!(utc, berlin);

    let old = PropertySnapshot::new().with("publishAt", utc);
    let new = PropertySnapshot::new().with("publishAt", berlin);
    let changes = builder.build_changes(Some(&old), &new, &NodeSchema::new("T"), &HtmlArrayRenderer);

    assert_eq!(changes.len(), 1);
    let change = changes.get("publishAt").unwrap();
    assert_eq!(change.new_kind(), ChangeKind::DateTime);
    assert_eq!(change.old_value(), "\"2024-01-01T10:00:00+00:00\"");
    assert_eq!(change.new_value(), "\"2024-01-01T11:00:00+01:00\"");
}

#[test]
fn test_equal_serialized_forms_are_suppressed() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let asset = AssetRef::new("a1", "hero.jpg");
    let old = PropertySnapshot::new().with("hero", asset.clone());
    let new = PropertySnapshot::new().with("hero", ImageRef::new(asset));

    let changes = builder.build_changes(Some(&old), &new, &text_schema(), &HtmlArrayRenderer);
    assert!(changes.is_empty(), "asset and image with equal previews differ only in kind");
}

// ---------------------------------------------------------------------------
// Text changes
// ---------------------------------------------------------------------------

#[test]
fn test_body_change_has_inline_diff() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let old = PropertySnapshot::new().with("body", "<p>Hello  world</p>");
    let new = PropertySnapshot::new().with("body", "<p>Hello, world</p>");

    let changes = builder
        .build(&text_event(Some(old), new), Some(&HtmlArrayRenderer))
        .unwrap();
    assert_eq!(changes.len(), 1);

    let change = changes.get("body").unwrap();
    assert_eq!(change.property_label(), "Body");
    assert_eq!(change.old_kind(), ChangeKind::Text);
    assert_eq!(change.new_kind(), ChangeKind::Text);
    assert_eq!(change.old_value(), "<p>Hello  world</p>");
    assert_eq!(change.new_value(), "<p>Hello, world</p>");

    let diff = change.diff().expect("text change should carry a diff");
    assert!(!diff.is_empty());
    let block = diff.blocks().next().unwrap();
    assert_eq!(
        block.changed.lines,
        vec!["&lt;p&gt;Hello<ins>,</ins> world&lt;/p&gt;"]
    );
    assert_eq!(
        block.base.lines,
        vec!["&lt;p&gt;Hello<del></del> world&lt;/p&gt;"]
    );
}

#[test]
fn test_whitespace_only_change_is_kept_without_diff() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let old = PropertySnapshot::new().with("body", "a  b");
    let new = PropertySnapshot::new().with("body", "a b");

    let changes = builder.build_changes(Some(&old), &new, &text_schema(), &HtmlArrayRenderer);
    assert_eq!(changes.len(), 1);
    assert!(changes.get("body").unwrap().diff().is_none());
}

#[test]
fn test_added_paragraph_is_marked_inserted() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let old = PropertySnapshot::new().with("body", "First");
    let new = PropertySnapshot::new().with("body", "First<br>Second");

    let changes = builder.build_changes(Some(&old), &new, &text_schema(), &PlainArrayRenderer);
    let diff = changes.get("body").unwrap().diff().unwrap();
    let inserted: Vec<&String> = diff
        .blocks()
        .flat_map(|b| b.changed.lines.iter())
        .filter(|l| l.starts_with("{+"))
        .collect();
    assert_eq!(inserted, vec!["{+Second+}"]);
}

#[test]
fn test_created_text_compares_against_null() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let new = PropertySnapshot::new().with("title", "Home");

    let changes = builder.build_changes(None, &new, &text_schema(), &HtmlArrayRenderer);
    let change = changes.get("title").unwrap();
    assert_eq!(change.old_value(), "null");
    assert_eq!(change.old_kind(), ChangeKind::Other);
    assert_eq!(change.new_kind(), ChangeKind::Text);
    assert!(change.diff().is_none());
}

// ---------------------------------------------------------------------------
// Other kinds
// ---------------------------------------------------------------------------

#[test]
fn test_array_change_has_no_diff() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let old = PropertySnapshot::new().with("tags", numbers(&[1, 2]));
    let new = PropertySnapshot::new().with("tags", numbers(&[1, 2, 3]));

    let changes = builder.build_changes(Some(&old), &new, &text_schema(), &HtmlArrayRenderer);
    assert_eq!(changes.len(), 1);
    let change = changes.get("tags").unwrap();
    assert_eq!(change.old_kind(), ChangeKind::Array);
    assert_eq!(change.new_kind(), ChangeKind::Array);
    assert_eq!(change.new_value(), "[\n    \"1\",\n    \"2\",\n    \"3\"\n]");
    assert!(change.diff().is_none());
}

#[test]
fn test_image_change_is_classified_as_image() {
    struct Cdn;

    impl ThumbnailProvider for Cdn {
        fn thumbnail_uri(&self, asset: &AssetRef) -> Result<Option<String>, ExError> {
            Ok(Some(format!("/thumbs/{}", asset.identifier)))
        }
    }

    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry).with_thumbnails(&Cdn);
    let old = PropertySnapshot::new().with("hero", ImageRef::new(AssetRef::new("i1", "a.jpg")));
    let new = PropertySnapshot::new().with("hero", ImageRef::new(AssetRef::new("i2", "b.jpg")));

    let changes = builder.build_changes(Some(&old), &new, &text_schema(), &HtmlArrayRenderer);
    let change = changes.get("hero").unwrap();
    assert_eq!(change.old_kind(), ChangeKind::Image);
    assert_eq!(change.new_kind(), ChangeKind::Image);
    assert!(change.new_value().contains("\"src\": \"/thumbs/i2\""));
    assert!(change.diff().is_none());
}

#[test]
fn test_node_reference_and_boolean_changes() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let old = PropertySnapshot::new()
        .with("link", NodeRef::new("n-1", "Home"))
        .with("featured", false);
    let new = PropertySnapshot::new()
        .with("link", NodeRef::new("n-2", "About"))
        .with("featured", true);

    let changes = builder.build_changes(Some(&old), &new, &text_schema(), &HtmlArrayRenderer);
    let link = changes.get("link").unwrap();
    assert_eq!(link.old_value(), "Home (n-1)");
    assert_eq!(link.new_value(), "About (n-2)");
    assert_eq!(link.new_kind(), ChangeKind::Node);
    assert_eq!(changes.get("featured").unwrap().new_value(), "true");
}

#[test]
fn test_changes_follow_new_snapshot_order() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let new = PropertySnapshot::new()
        .with("zeta", "z")
        .with("alpha", "a")
        .with("body", "b");

    let changes = builder.build_changes(None, &new, &text_schema(), &HtmlArrayRenderer);
    let names: Vec<&str> = changes.iter().map(|c| c.property_name()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "body"]);
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[test]
fn test_labels_are_translated_with_fallback() {
    let registry = registry();
    let translate = |id: &str| {
        (id == "Vendor:NodeTypes.Text:properties.title").then(|| "Title".to_string())
    };
    let builder = ChangeSetBuilder::new(&registry).with_translator(&translate);
    let new = PropertySnapshot::new()
        .with("title", "Home")
        .with("body", "Text")
        .with("undeclared", "x");

    let changes = builder.build_changes(None, &new, &text_schema(), &HtmlArrayRenderer);
    assert_eq!(changes.get("title").unwrap().property_label(), "Title");
    assert_eq!(changes.get("body").unwrap().property_label(), "Body");
    assert_eq!(changes.get("undeclared").unwrap().property_label(), "undeclared");
}

// ---------------------------------------------------------------------------
// Short-circuits
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_node_type_yields_empty_changes() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);
    let event = NodeEvent::with_data(EventData::new(
        "Vendor:Removed",
        PropertySnapshot::new().with("title", "Gone"),
    ));

    let changes = builder.build(&event, Some(&HtmlArrayRenderer)).unwrap();
    assert!(changes.is_empty());
}

#[test]
fn test_missing_data_or_renderer_yields_empty_changes() {
    let registry = registry();
    let builder = ChangeSetBuilder::new(&registry);

    assert!(builder
        .build(&NodeEvent::default(), Some(&HtmlArrayRenderer))
        .unwrap()
        .is_empty());

    let event = text_event(None, PropertySnapshot::new().with("title", "Home"));
    assert!(builder.build(&event, None).unwrap().is_empty());
}

#[test]
fn test_schema_failure_other_than_not_found_propagates() {
    struct Offline;

    impl SchemaProvider for Offline {
        fn schema(&self, _node_type: &str) -> Result<NodeSchema, ExError> {
            Err(ExError::new(ExErrorKind::ExternalService).with_message("registry offline"))
        }
    }

    let builder = ChangeSetBuilder::new(&Offline);
    let event = text_event(None, PropertySnapshot::new().with("title", "Home"));
    let err = builder.build(&event, Some(&HtmlArrayRenderer)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ExternalService);
    assert_eq!(err.op(), Some("build_changes"));
    assert_eq!(err.entity_id(), Some("Vendor:Text"));
    assert_eq!(
        err.source_error().map(|e| e.message()),
        Some("registry offline")
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_same_snapshot_never_changes(
        entries in proptest::collection::vec(("[a-z]{1,8}", ".{0,40}", any::<bool>()), 0..8)
    ) {
        let registry = registry();
        let builder = ChangeSetBuilder::new(&registry);
        let mut snapshot = PropertySnapshot::new();
        for (name, text, flag) in &entries {
            snapshot.insert(format!("{name}_text"), text.as_str());
            snapshot.insert(format!("{name}_flag"), *flag);
        }
        let changes = builder.build_changes(
            Some(&snapshot),
            &snapshot,
            &text_schema(),
            &HtmlArrayRenderer,
        );
        prop_assert!(changes.is_empty());
    }

    #[test]
    fn prop_text_change_serializes_verbatim(old in ".{1,40}", new in ".{1,40}") {
        prop_assume!(old != new);
        let registry = registry();
        let builder = ChangeSetBuilder::new(&registry);
        let before = PropertySnapshot::new().with("body", old.as_str());
        let after = PropertySnapshot::new().with("body", new.as_str());

        let changes = builder.build_changes(Some(&before), &after, &text_schema(), &HtmlArrayRenderer);
        prop_assert_eq!(changes.len(), 1);
        let change = changes.get("body").unwrap();
        prop_assert_eq!(change.old_value(), old.as_str());
        prop_assert_eq!(change.new_value(), new.as_str());
    }
}
