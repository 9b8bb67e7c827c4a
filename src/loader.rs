//! schema and override loading

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// read a schema document into a string
pub fn load_schema_to_string(path: &Path) -> Result<String> {
    let schema = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    tracing::debug!(path = %path.display(), bytes = schema.len(), "loaded schema");
    Ok(schema)
}

/// read a json override document; a malformed document is a config error
pub(crate) fn load_json_document<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .map_err(|err| Error::Config(format!("cannot read {what} file {}: {err}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|err| Error::Config(format!("invalid {what} file {}: {err}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_load_schema_missing_file() {
        let err = load_schema_to_string(Path::new("/nonexistent/schema.graphql")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_load_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("hooks.json");
        fs::write(&good, r#"{"Comment": {"afterFind": "linkify"}}"#).unwrap();
        let hooks: BTreeMap<String, BTreeMap<String, String>> =
            load_json_document(&good, "hooks").unwrap();
        assert_eq!(hooks["Comment"]["afterFind"], "linkify");

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        let err = load_json_document::<BTreeMap<String, String>>(&bad, "hooks").unwrap_err();
        assert!(matches!(err, Error::Config(message) if message.contains("invalid hooks file")));
    }
}
