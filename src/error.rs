//! error types
//!
//! structured errors for config, io, schema structure, and rendering.

use std::path::PathBuf;

/// library result type
pub type Result<T> = std::result::Result<T, Error>;

/// error type for the generation pipeline
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {}: {source}", path.display())]
    Io {
        /// file that failed to read or write
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema parse error: {0}")]
    SchemaParse(String),

    #[error("could not find model {model} in build schema")]
    MissingModel {
        /// model name discovered in the source schema
        model: String,
    },

    #[error(
        "fragment {fragment} on model {model} references unknown fields: {}",
        fields.join(", ")
    )]
    UnknownFragmentFields {
        /// model owning the fragment
        model: String,
        /// fragment key
        fragment: String,
        /// every offending field, nested ones as dotted paths
        fields: Vec<String>,
    },

    #[error("invalid query kind: {0}")]
    InvalidQueryKind(String),

    #[error("render error in template {template}: {message}")]
    Render {
        /// template id passed to the renderer
        template: String,
        /// renderer message
        message: String,
    },
}

impl Error {
    /// build an io error for a path
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// true if the error comes from the schema itself rather than config or io
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Error::SchemaParse(_)
                | Error::MissingModel { .. }
                | Error::UnknownFragmentFields { .. }
                | Error::InvalidQueryKind(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_schema_error() {
        let err = Error::MissingModel {
            model: "Blog".to_string(),
        };
        assert!(err.is_schema_error());

        let err = Error::InvalidQueryKind("fetch".to_string());
        assert!(err.is_schema_error());

        let err = Error::Config("missing src_schema".to_string());
        assert!(!err.is_schema_error());
    }

    #[test]
    fn test_unknown_fields_message_lists_all() {
        let err = Error::UnknownFragmentFields {
            model: "Blog".to_string(),
            fragment: "Broken".to_string(),
            fields: vec!["nope".to_string(), "posts.titel".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "fragment Broken on model Blog references unknown fields: nope, posts.titel"
        );
    }

    #[test]
    fn test_io_message_names_path() {
        let err = Error::io(
            "schema.graphql",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("schema.graphql"));
    }
}
