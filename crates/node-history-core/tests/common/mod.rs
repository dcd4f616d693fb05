use node_history_core::event::{EventData, NodeEvent};
use node_history_core::model::{NodeSchema, PropertySchema, PropertySnapshot};
use node_history_core::schema_registry::SchemaRegistry;

pub const TEXT_TYPE: &str = "Vendor:Text";

/// `Vendor:Text` with a defaulted title, a labelled body and a hidden flag
#[allow(dead_code)]
pub fn text_schema() -> NodeSchema {
    NodeSchema::new(TEXT_TYPE)
        .with_icon("file-text")
        .with_property(
            "title",
            PropertySchema::default()
                .with_default("")
                .with_label("Vendor:NodeTypes.Text:properties.title"),
        )
        .with_property("body", PropertySchema::default().with_label("Body"))
        .with_property("hidden", PropertySchema::default().with_default(false))
}

#[allow(dead_code)]
pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new().with_schema(text_schema())
}

/// Event for `Vendor:Text`; `old = None` models node creation
#[allow(dead_code)]
pub fn text_event(old: Option<PropertySnapshot>, new: PropertySnapshot) -> NodeEvent {
    let mut data = EventData::new(TEXT_TYPE, new);
    data.old = old;
    NodeEvent::with_data(data)
}
