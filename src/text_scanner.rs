//! regex based schema scanner
//!
//! tolerant of loosely formatted schema text: comments, descriptions and
//! annotation arguments are blanked out first, then type/input/enum blocks
//! are matched by a flat (non-nesting) block pattern.

use crate::diagnostics::OperationBlock;
use crate::error::{Error, Result};
use crate::scanner::{
    is_connection_wrapper, normalize_type, EnumDeclaration, FieldDeclaration, InputDeclaration,
    ModelDeclaration, OperationDeclaration, SchemaScanner, MODEL_ANNOTATION,
    RELATIONSHIP_ANNOTATIONS,
};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(type|input|enum|interface)\s+([A-Za-z_][A-Za-z0-9_]*)([^{}]*)\{([^{}]*)\}")
        .expect("block regex is valid")
});

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([A-Za-z_][A-Za-z0-9_]*)\s*(?:\(([^)]*)\))?\s*:\s*([A-Za-z0-9_\[\]!]+)((?:\s*@[A-Za-z_][A-Za-z0-9_]*)*)",
    )
    .expect("field regex is valid")
});

static PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\s*:\s*([A-Za-z0-9_\[\]!]+)")
        .expect("param regex is valid")
});

/// text scanner over a source schema and a build schema
#[derive(Debug, Clone)]
pub struct TextScanner {
    source: String,
    build: String,
}

struct Block<'t> {
    keyword: &'t str,
    name: &'t str,
    header: &'t str,
    body: &'t str,
}

struct RawField<'t> {
    name: &'t str,
    args: Option<&'t str>,
    field_type: &'t str,
    annotations: &'t str,
}

impl TextScanner {
    pub fn new(source: &str, build: &str) -> Self {
        Self {
            source: clean_schema(source),
            build: clean_schema(build),
        }
    }
}

impl SchemaScanner for TextScanner {
    fn scan_model_names(&self) -> Result<Vec<ModelDeclaration>> {
        let marker = format!("@{MODEL_ANNOTATION}");
        let models: Vec<ModelDeclaration> = blocks(&self.source)
            .filter(|block| block.keyword == "type")
            .filter(|block| block.header.split_whitespace().any(|token| token == marker))
            .map(|block| ModelDeclaration {
                name: block.name.to_string(),
                relationship_fields: fields(block.body)
                    .filter(|field| has_relationship_annotation(field.annotations))
                    .map(|field| field.name.to_string())
                    .collect(),
            })
            .collect();

        tracing::debug!(count = models.len(), "found models in source schema");
        Ok(models)
    }

    fn scan_model_fields(&self, model: &str) -> Result<Vec<FieldDeclaration>> {
        let block = blocks(&self.build)
            .find(|block| block.keyword == "type" && block.name == model)
            .ok_or_else(|| Error::MissingModel {
                model: model.to_string(),
            })?;

        let fields = fields(block.body)
            .map(|field| FieldDeclaration {
                name: field.name.to_string(),
                field_type: normalize_type(field.field_type),
                paginated: is_connection_wrapper(field.field_type),
            })
            .collect();
        Ok(fields)
    }

    fn scan_operation_block(&self, block: OperationBlock) -> Result<Vec<OperationDeclaration>> {
        let name = block.type_name();
        let mut operations = Vec::new();
        for found in blocks(&self.build).filter(|b| b.keyword == "type" && b.name == name) {
            for field in fields(found.body) {
                operations.push(OperationDeclaration {
                    name: field.name.to_string(),
                    params: field.args.map(parse_params).unwrap_or_default(),
                    return_type: field.field_type.to_string(),
                });
            }
        }

        tracing::debug!(block = name, count = operations.len(), "scanned operations");
        Ok(operations)
    }

    fn scan_input_blocks(&self) -> Result<Vec<InputDeclaration>> {
        let inputs = blocks(&self.build)
            .filter(|block| block.keyword == "input")
            .map(|block| InputDeclaration {
                name: block.name.to_string(),
                fields: parse_input_fields(block.body),
            })
            .collect();
        Ok(inputs)
    }

    fn scan_enum_blocks(&self) -> Result<Vec<EnumDeclaration>> {
        let enums = blocks(&self.build)
            .filter(|block| block.keyword == "enum")
            .map(|block| EnumDeclaration {
                name: block.name.to_string(),
                values: block
                    .body
                    .split(|ch: char| ch.is_whitespace() || ch == ',')
                    .filter(|value| !value.is_empty() && !value.starts_with('@'))
                    .map(str::to_string)
                    .collect(),
            })
            .collect();
        Ok(enums)
    }
}

fn blocks(text: &str) -> impl Iterator<Item = Block<'_>> {
    BLOCK.captures_iter(text).filter_map(|caps| {
        Some(Block {
            keyword: caps.get(1)?.as_str(),
            name: caps.get(2)?.as_str(),
            header: caps.get(3)?.as_str(),
            body: caps.get(4)?.as_str(),
        })
    })
}

fn fields(body: &str) -> impl Iterator<Item = RawField<'_>> {
    FIELD.captures_iter(body).filter_map(|caps| {
        Some(RawField {
            name: caps.get(1)?.as_str(),
            args: caps.get(2).map(|m| m.as_str()),
            field_type: caps.get(3)?.as_str(),
            annotations: caps.get(4).map(|m| m.as_str()).unwrap_or_default(),
        })
    })
}

fn has_relationship_annotation(annotations: &str) -> bool {
    annotations
        .split_whitespace()
        .filter_map(|token| token.strip_prefix('@'))
        .any(|name| RELATIONSHIP_ANNOTATIONS.contains(&name))
}

fn parse_params(args: &str) -> IndexMap<String, String> {
    PARAM
        .captures_iter(args)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

// `name: Type` pairs; default values and stray words match nothing
fn parse_input_fields(body: &str) -> IndexMap<String, String> {
    fields(body)
        .map(|field| (field.name.to_string(), field.field_type.to_string()))
        .collect()
}

/// blank out comments, string descriptions and annotation argument groups.
///
/// annotation names are kept (`@model`, `@connection`) so headers and field
/// lines can still be inspected for them.
pub(crate) fn clean_schema(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '"' => {
                i = skip_string(&chars, i);
                out.push(' ');
            }
            '@' => {
                out.push('@');
                i += 1;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    out.push(chars[i]);
                    i += 1;
                }
                let mut next = i;
                while next < chars.len() && chars[next].is_whitespace() {
                    next += 1;
                }
                if next < chars.len() && chars[next] == '(' {
                    i = skip_group(&chars, next);
                    out.push(' ');
                }
            }
            ch => {
                out.push(ch);
                i += 1;
            }
        }
    }

    out
}

fn skip_string(chars: &[char], start: usize) -> usize {
    let block = chars.get(start..start + 3) == Some(&['"', '"', '"'][..]);
    if block {
        let mut i = start + 3;
        while i < chars.len() {
            if chars.get(i..i + 3) == Some(&['"', '"', '"'][..]) {
                return i + 3;
            }
            i += 1;
        }
        return chars.len();
    }

    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '"' => return i + 1,
            '\n' => return i,
            _ => i += 1,
        }
    }
    chars.len()
}

fn skip_group(chars: &[char], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '"' => {
                i = skip_string(chars, i);
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
# blog schema
type Blog @model @auth(rules: [{ allow: public, operations: [read] }]) {
  id: ID!
  name: String!
  posts: [Post] @connection(name: "BlogPosts")
}

type Post @model {
  id: ID!
  title: String!
  blog: Blog @connection(name: "BlogPosts")
}

"""not a model"""
type Address {
  street: String
}
"#;

    const BUILD: &str = r#"
type Blog {
  id: ID!
  name: String!
  posts(filter: ModelPostFilterInput, sortDirection: ModelSortDirection, limit: Int, nextToken: String): ModelPostConnection
  createdAt: AWSDateTime!
}

type Post {
  id: ID!
  title: String!
  blog: Blog
}

enum ModelSortDirection {
  ASC
  DESC
}

type Query {
  getBlog(id: ID!): Blog @aws_iam
  listBlogs(filter: ModelBlogFilterInput, limit: Int = 100, nextToken: String): ModelBlogConnection
  echo: String
}

type Mutation {
  createBlog(input: CreateBlogInput!, condition: ModelBlogConditionInput): Blog @aws_cognito_user_pools(cognito_groups: ["Admin"])
}

input CreateBlogInput {
  id: ID
  name: String!
  this line has no type
}
"#;

    #[test]
    fn test_scan_model_names_tolerates_trailing_annotations() {
        let scanner = TextScanner::new(SOURCE, BUILD);
        let models = scanner.scan_model_names().unwrap();
        let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Blog", "Post"]);
        assert_eq!(models[0].relationship_fields, vec!["posts"]);
        assert_eq!(models[1].relationship_fields, vec!["blog"]);
    }

    #[test]
    fn test_scan_model_fields_strips_arguments_and_normalizes() {
        let scanner = TextScanner::new(SOURCE, BUILD);
        let fields = scanner.scan_model_fields("Blog").unwrap();
        let pairs: Vec<_> = fields
            .iter()
            .map(|f| (f.name.as_str(), f.field_type.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("id", "ID!"),
                ("name", "String!"),
                ("posts", "[Post]"),
                ("createdAt", "AWSDateTime!"),
            ]
        );
        assert!(fields[2].paginated);
        assert!(!fields[0].paginated);
    }

    #[test]
    fn test_scan_model_fields_missing_model() {
        let scanner = TextScanner::new(SOURCE, BUILD);
        let err = scanner.scan_model_fields("Comment").unwrap_err();
        assert!(matches!(err, Error::MissingModel { model } if model == "Comment"));
    }

    #[test]
    fn test_scan_operation_block() {
        let scanner = TextScanner::new(SOURCE, BUILD);
        let queries = scanner.scan_operation_block(OperationBlock::Query).unwrap();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].name, "getBlog");
        assert_eq!(queries[0].params.get("id").map(String::as_str), Some("ID!"));
        assert_eq!(queries[0].return_type, "Blog");
        assert_eq!(queries[1].name, "listBlogs");
        let params: Vec<_> = queries[1].params.keys().map(String::as_str).collect();
        assert_eq!(params, vec!["filter", "limit", "nextToken"]);
        assert_eq!(queries[1].return_type, "ModelBlogConnection");
        assert!(queries[2].params.is_empty());

        let mutations = scanner
            .scan_operation_block(OperationBlock::Mutation)
            .unwrap();
        assert_eq!(mutations.len(), 1);
        assert_eq!(mutations[0].return_type, "Blog");
        assert_eq!(
            mutations[0].params.get("input").map(String::as_str),
            Some("CreateBlogInput!")
        );
    }

    #[test]
    fn test_scan_missing_operation_block_is_empty() {
        let scanner = TextScanner::new(SOURCE, "type Blog { id: ID! }");
        let ops = scanner
            .scan_operation_block(OperationBlock::Mutation)
            .unwrap();
        assert!(ops.is_empty());
    }

    #[test]
    fn test_scan_input_blocks_drops_unparsable_lines() {
        let scanner = TextScanner::new(SOURCE, BUILD);
        let inputs = scanner.scan_input_blocks().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "CreateBlogInput");
        let pairs: Vec<_> = inputs[0]
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("id", "ID"), ("name", "String!")]);
    }

    #[test]
    fn test_scan_input_blocks_with_commas_and_one_line_bodies() {
        let build = "input CreateBlogInput {\n  id: ID,\n  name: String!,\n}\n\ninput OneLine { a: Int b: String! }\n\ninput Paged {\n  limit: Int = 100\n  sort: ModelSortDirection = ASC\n  nextToken: String\n}\n";
        let scanner = TextScanner::new("", build);
        let inputs = scanner.scan_input_blocks().unwrap();
        let pairs: Vec<Vec<_>> = inputs
            .iter()
            .map(|input| {
                input
                    .fields
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect()
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                vec![("id", "ID"), ("name", "String!")],
                vec![("a", "Int"), ("b", "String!")],
                vec![
                    ("limit", "Int"),
                    ("sort", "ModelSortDirection"),
                    ("nextToken", "String"),
                ],
            ]
        );
    }

    #[test]
    fn test_scan_enum_blocks() {
        let scanner = TextScanner::new(SOURCE, BUILD);
        let enums = scanner.scan_enum_blocks().unwrap();
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].name, "ModelSortDirection");
        assert_eq!(enums[0].values, vec!["ASC", "DESC"]);
    }

    #[test]
    fn test_clean_schema_removes_noise() {
        let cleaned = clean_schema("type A @auth(rules: [{a: \"(x\"}]) { # note\n id: ID! }");
        assert!(cleaned.contains("type A @auth"));
        assert!(!cleaned.contains("rules"));
        assert!(!cleaned.contains("note"));
        assert!(cleaned.contains("id: ID!"));
    }
}
