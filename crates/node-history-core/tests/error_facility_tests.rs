use node_history_core::errors::{ExError, ExErrorKind, HistoryError};

#[test]
fn test_node_type_not_found_verifiable_by_kind() {
    let err = HistoryError::NodeTypeNotFound {
        node_type: "Vendor:Gone".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.entity_id(), Some("Vendor:Gone"));
}

#[test]
fn test_missing_field_names_the_property() {
    let err = HistoryError::MissingField {
        field: "data.nodeType".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::MissingField);
    assert_eq!(ex_err.property(), Some("data.nodeType"));
    assert!(ex_err.message().contains("data.nodeType"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::InvalidEvent, "ERR_INVALID_EVENT"),
        (ExErrorKind::MissingField, "ERR_MISSING_FIELD"),
        (ExErrorKind::InvalidSchema, "ERR_INVALID_SCHEMA"),
        (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::ExternalService, "ERR_EXTERNAL_SERVICE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_json_error_becomes_serialization() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: HistoryError = json_err.into();
    assert!(matches!(err, HistoryError::Serialization { .. }));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::Serialization);
}

#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "events.json");
    let err: HistoryError = io_err.into();
    assert_eq!(err.to_string(), "I/O error: events.json");
    assert_eq!(ExError::from(err).code(), "ERR_IO");
}

#[test]
fn test_display_format() {
    let err = ExError::new(ExErrorKind::InvalidEvent)
        .with_op("parse_event_bytes")
        .with_property("timestamp")
        .with_message("not RFC 3339");
    assert_eq!(
        err.to_string(),
        "[ERR_INVALID_EVENT] in operation 'parse_event_bytes': not RFC 3339 (property: timestamp)"
    );
}
