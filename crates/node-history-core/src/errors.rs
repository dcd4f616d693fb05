use thiserror::Error;

/// Result type alias using HistoryError
pub type Result<T> = std::result::Result<T, HistoryError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    /// Event bytes are not valid UTF-8 JSON or have the wrong shape
    InvalidEvent,
    /// A required event or schema field is absent
    MissingField,
    /// A NodeTypes document could not be parsed
    InvalidSchema,
    /// A diff configuration file could not be parsed
    InvalidConfig,

    // Lookup
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    /// A best-effort collaborator (thumbnail proxy, user directory) failed
    ExternalService,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidEvent => "ERR_INVALID_EVENT",
            ExErrorKind::MissingField => "ERR_MISSING_FIELD",
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional
/// context (operation, entity, property) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    property: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            property: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (node type name, asset identifier, account id)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add property name context
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(property) = &self.property {
            write!(f, " (property: {})", property)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for history rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// Node type is not (or no longer) declared
    #[error("Node type not found: {node_type}")]
    NodeTypeNotFound { node_type: String },

    /// Event payload is malformed
    #[error("Invalid event: {reason}")]
    InvalidEvent { reason: String },

    /// A required field is missing from an event payload
    #[error("Missing field: {field}")]
    MissingField { field: String },

    /// NodeTypes document is malformed
    #[error("Invalid node type schema: {reason}")]
    InvalidSchema { reason: String },

    /// Diff configuration is malformed
    #[error("Invalid diff configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Filesystem error (CLI input files)
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<HistoryError> for ExError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NodeTypeNotFound { node_type } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(node_type)
                .with_message("Node type not found"),
            HistoryError::InvalidEvent { reason } => ExError::new(ExErrorKind::InvalidEvent)
                .with_message(format!("Invalid event: {}", reason)),
            HistoryError::MissingField { field } => ExError::new(ExErrorKind::MissingField)
                .with_property(field.clone())
                .with_message(format!("required field `{}` is absent", field)),
            HistoryError::InvalidSchema { reason } => ExError::new(ExErrorKind::InvalidSchema)
                .with_message(format!("Invalid node type schema: {}", reason)),
            HistoryError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidConfig)
                .with_message(format!("Invalid diff configuration: {}", reason)),
            HistoryError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
            HistoryError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for HistoryError {
    fn from(err: std::io::Error) -> Self {
        HistoryError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidEvent, "ERR_INVALID_EVENT"),
            (ExErrorKind::MissingField, "ERR_MISSING_FIELD"),
            (ExErrorKind::InvalidSchema, "ERR_INVALID_SCHEMA"),
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::ExternalService, "ERR_EXTERNAL_SERVICE"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("schema")
            .with_entity_id("Vendor:Gone")
            .with_message("Node type not found");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_NOT_FOUND]"));
        assert!(rendered.contains("'schema'"));
        assert!(rendered.contains("Vendor:Gone"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk gone");
        let outer = ExError::new(ExErrorKind::InvalidSchema).with_source(inner);
        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Io)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
