use super::FormatError;
use serde::Serialize;

/// Serialize a result to YAML
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, FormatError> {
    serde_yaml::to_string(value).map_err(FormatError::from)
}
