//! input type extraction
//!
//! input blocks are documentation only; they are never linked to models.

use crate::error::Result;
use crate::scanner::SchemaScanner;
use indexmap::IndexMap;

/// input name -> field name -> raw type
pub type InputRegistry = IndexMap<String, IndexMap<String, String>>;

pub struct InputTypeExtractor<'s, S: SchemaScanner + ?Sized> {
    scanner: &'s S,
}

impl<'s, S: SchemaScanner + ?Sized> InputTypeExtractor<'s, S> {
    pub fn new(scanner: &'s S) -> Self {
        Self { scanner }
    }

    pub fn extract(&self) -> Result<InputRegistry> {
        let inputs: InputRegistry = self
            .scanner
            .scan_input_blocks()?
            .into_iter()
            .map(|decl| (decl.name, decl.fields))
            .collect();
        tracing::debug!(count = inputs.len(), "extracted input types");
        Ok(inputs)
    }
}

/// map every raw field type to its documentation type
pub fn documentation(inputs: &InputRegistry) -> InputRegistry {
    inputs
        .iter()
        .map(|(name, fields)| {
            let fields = fields
                .iter()
                .map(|(field, raw)| (field.clone(), doc_type(raw)))
                .collect();
            (name.clone(), fields)
        })
        .collect()
}

/// documentation type for a raw graphql type.
///
/// scalars map to js types, lists to `Array<T>`, and nullable types get a
/// leading `?`. inputs and enums keep their names.
pub fn doc_type(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_suffix('!') {
        Some(inner) => doc_type_inner(inner),
        None => format!("?{}", doc_type_inner(raw)),
    }
}

fn doc_type_inner(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('!');
    if let Some(element) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        return format!("Array<{}>", doc_type_inner(element));
    }
    match raw {
        "ID" | "String" | "AWSDate" | "AWSDateTime" | "AWSTime" | "AWSEmail" | "AWSURL"
        | "AWSPhone" | "AWSIPAddress" => "string".to_string(),
        "Int" | "Float" | "AWSTimestamp" => "number".to_string(),
        "Boolean" => "boolean".to_string(),
        "AWSJSON" => "Object".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_scanner::TextScanner;

    #[test]
    fn test_doc_type() {
        assert_eq!(doc_type("ID!"), "string");
        assert_eq!(doc_type("String"), "?string");
        assert_eq!(doc_type("Int"), "?number");
        assert_eq!(doc_type("[ID!]!"), "Array<string>");
        assert_eq!(doc_type("[ModelPostFilterInput]"), "?Array<ModelPostFilterInput>");
        assert_eq!(doc_type("AWSJSON!"), "Object");
        assert_eq!(doc_type("PostStatus"), "?PostStatus");
    }

    #[test]
    fn test_extract_and_document() {
        let build = r#"
input CreatePostInput {
  id: ID
  title: String!
  blogID: ID!
}

input DeletePostInput {
  id: ID!
}
"#;
        let scanner = TextScanner::new("", build);
        let inputs = InputTypeExtractor::new(&scanner).extract().unwrap();
        let names: Vec<_> = inputs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["CreatePostInput", "DeletePostInput"]);
        assert_eq!(inputs["CreatePostInput"]["title"], "String!");

        let docs = documentation(&inputs);
        assert_eq!(docs["CreatePostInput"]["id"], "?string");
        assert_eq!(docs["CreatePostInput"]["title"], "string");
    }
}
