//! schema scanning seam
//!
//! a [`SchemaScanner`] turns the source schema and the build schema into raw
//! declarations. the graph builder and the operation classifier only see
//! these declarations, so the text scanner and the graphql-parser backed
//! document scanner are interchangeable.

use crate::diagnostics::OperationBlock;
use crate::error::Result;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// annotations on a source schema field that mark a relationship
pub const RELATIONSHIP_ANNOTATIONS: &[&str] =
    &["connection", "hasMany", "hasOne", "belongsTo", "manyToMany"];

/// annotation that marks a type as a model
pub const MODEL_ANNOTATION: &str = "model";

static CONNECTION_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Model([A-Za-z0-9_]+)Connection!?$").expect("connection wrapper regex is valid")
});

/// a type declared with the model annotation in the source schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDeclaration {
    pub name: String,
    /// fields carrying a relationship annotation, declaration order
    pub relationship_fields: Vec<String>,
}

/// a field of a model type in the build schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    /// field name with any argument list removed
    pub name: String,
    /// raw type, connection wrappers already normalized to `[X]`
    pub field_type: String,
    /// true if the schema declared a `Model<X>Connection` wrapper
    pub paginated: bool,
}

/// one `name(param: Type, ...): ReturnType` entry of `Query` or `Mutation`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDeclaration {
    pub name: String,
    pub params: IndexMap<String, String>,
    pub return_type: String,
}

/// one `input Name { ... }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeclaration {
    pub name: String,
    pub fields: IndexMap<String, String>,
}

/// one `enum Name { ... }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    pub name: String,
    pub values: Vec<String>,
}

/// extract raw declarations from a source schema and a build schema
pub trait SchemaScanner {
    /// model types declared in the source schema
    fn scan_model_names(&self) -> Result<Vec<ModelDeclaration>>;

    /// field list of a model type in the build schema.
    ///
    /// fails with [`crate::Error::MissingModel`] if the type is absent.
    fn scan_model_fields(&self, model: &str) -> Result<Vec<FieldDeclaration>>;

    /// operations of the `Query` or `Mutation` block; empty if the block is absent
    fn scan_operation_block(&self, block: OperationBlock) -> Result<Vec<OperationDeclaration>>;

    /// every input block of the build schema
    fn scan_input_blocks(&self) -> Result<Vec<InputDeclaration>>;

    /// every enum block of the build schema
    fn scan_enum_blocks(&self) -> Result<Vec<EnumDeclaration>>;
}

/// rewrite `Model<X>Connection` to `[X]`, leaving every other type untouched
pub fn normalize_type(raw: &str) -> String {
    match CONNECTION_WRAPPER.captures(raw.trim()) {
        Some(caps) => format!("[{}]", &caps[1]),
        None => raw.trim().to_string(),
    }
}

/// true if the type is a `Model<X>Connection` wrapper
pub fn is_connection_wrapper(raw: &str) -> bool {
    CONNECTION_WRAPPER.is_match(raw.trim())
}

/// remove every non-null marker
pub fn strip_nullability(raw: &str) -> String {
    raw.chars().filter(|ch| *ch != '!').collect()
}

/// named type inside any list brackets and non-null markers
pub fn base_type_name(raw: &str) -> &str {
    raw.trim_matches(|ch: char| ch == '[' || ch == ']' || ch == '!' || ch.is_whitespace())
}

/// list element type if the type is list-wrapped
pub fn list_element(raw: &str) -> Option<&str> {
    let raw = raw.trim().trim_end_matches('!');
    raw.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .map(|inner| inner.trim().trim_end_matches('!'))
}
