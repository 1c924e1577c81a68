use super::FormatError;
use serde::Serialize;

/// Serialize a result to pretty-printed JSON
pub fn to_json<T: Serialize>(value: &T) -> Result<String, FormatError> {
    serde_json::to_string_pretty(value).map_err(FormatError::from)
}

/// Serialize a result to compact JSON
pub fn to_json_compact<T: Serialize>(value: &T) -> Result<String, FormatError> {
    serde_json::to_string(value).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisResult;

    #[test]
    fn test_to_json() {
        let mut result = AnalysisResult::default();
        result.imports.insert("numpy".to_string());

        let json = to_json(&result).unwrap();
        assert!(json.contains("\"cells\""));
        assert!(json.contains("\"files_read\""));
        assert!(json.contains("\"numpy\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json_compact(&AnalysisResult::default()).unwrap();
        assert_eq!(
            json,
            r#"{"cells":[],"imports":[],"files_read":[],"files_written":[]}"#
        );
    }
}
