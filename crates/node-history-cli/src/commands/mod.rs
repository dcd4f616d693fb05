pub mod diff;
pub mod timeline;

use node_history_core::errors::HistoryError;
use node_history_core::ExError;
use std::path::Path;

/// Read a whole input file, naming it in the error.
pub fn read_input(path: &Path) -> Result<Vec<u8>, ExError> {
    std::fs::read(path).map_err(|e| {
        ExError::from(HistoryError::from(e))
            .with_op("read_input")
            .with_entity_id(path.display().to_string())
    })
}

/// Parse an optional YAML side file (translations, user directory).
pub fn read_yaml<T>(path: Option<&Path>) -> Result<T, ExError>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let bytes = read_input(path)?;
    serde_yaml::from_slice(&bytes).map_err(|e| {
        ExError::from(HistoryError::InvalidConfig {
            reason: e.to_string(),
        })
        .with_op("read_yaml")
        .with_entity_id(path.display().to_string())
    })
}
