//! model entities
//!
//! a [`Model`] is one `@model` type with its classified fields, attached
//! operations, fragments and hooks.

use crate::error::{Error, Result};
use crate::query::QueryDefinition;
use crate::scanner::{base_type_name, strip_nullability};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// scalars selected without a sub-selection
pub const SCALAR_TYPES: &[&str] = &[
    "ID",
    "String",
    "Float",
    "Int",
    "Boolean",
    "AWSDate",
    "AWSDateTime",
    "AWSJSON",
];

/// scalar holding arbitrary json
pub const JSON_SCALAR: &str = "AWSJSON";

/// key of the fragment every model starts with
pub const DEFAULT_FRAGMENT: &str = "FragmentDefault";

/// one entry of a fragment selection tree
///
/// deserializes from the plain json shape: `"id"` or `{"posts": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSelection {
    Field(String),
    Nested(IndexMap<String, Vec<FieldSelection>>),
}

impl FieldSelection {
    pub fn field(name: impl Into<String>) -> Self {
        FieldSelection::Field(name.into())
    }

    /// single-connection entry
    pub fn nested(name: impl Into<String>, selection: Vec<FieldSelection>) -> Self {
        let mut map = IndexMap::new();
        map.insert(name.into(), selection);
        FieldSelection::Nested(map)
    }
}

/// an `@model` type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub(crate) name: String,
    pub(crate) fields: IndexMap<String, String>,
    pub(crate) primitive_fields: Vec<String>,
    pub(crate) complex_fields: Vec<String>,
    pub(crate) json_fields: Vec<String>,
    pub(crate) connections: IndexMap<String, String>,
    pub(crate) queries: Vec<QueryDefinition>,
    pub(crate) fragments: IndexMap<String, Vec<FieldSelection>>,
    pub(crate) hooks: IndexMap<String, String>,
}

impl Model {
    /// create a model and classify its fields.
    ///
    /// `enums` extends the scalar set: an enum-typed field is primitive.
    pub fn new(
        name: impl Into<String>,
        fields: IndexMap<String, String>,
        enums: &BTreeSet<String>,
    ) -> Self {
        let mut primitive_fields = Vec::new();
        let mut complex_fields = Vec::new();
        let mut json_fields = Vec::new();

        for (field, field_type) in &fields {
            let base = base_type_name(field_type);
            if SCALAR_TYPES.contains(&base) || enums.contains(base) {
                primitive_fields.push(field.clone());
            } else {
                complex_fields.push(field.clone());
            }
            if strip_nullability(field_type) == JSON_SCALAR {
                json_fields.push(field.clone());
            }
        }

        let mut fragments = IndexMap::new();
        fragments.insert(
            DEFAULT_FRAGMENT.to_string(),
            primitive_fields
                .iter()
                .cloned()
                .map(FieldSelection::Field)
                .collect(),
        );

        Self {
            name: name.into(),
            fields,
            primitive_fields,
            complex_fields,
            json_fields,
            connections: IndexMap::new(),
            queries: Vec::new(),
            fragments,
            hooks: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// pluralised module name for the generated collection
    pub fn collection_name(&self) -> String {
        format!("{}s", self.name)
    }

    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    pub fn field_type(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn primitive_fields(&self) -> &[String] {
        &self.primitive_fields
    }

    pub fn complex_fields(&self) -> &[String] {
        &self.complex_fields
    }

    pub fn json_fields(&self) -> &[String] {
        &self.json_fields
    }

    pub fn connections(&self) -> &IndexMap<String, String> {
        &self.connections
    }

    pub fn queries(&self) -> &[QueryDefinition] {
        &self.queries
    }

    pub fn fragments(&self) -> &IndexMap<String, Vec<FieldSelection>> {
        &self.fragments
    }

    pub fn hooks(&self) -> &IndexMap<String, String> {
        &self.hooks
    }

    /// record a connection field; the target keeps list brackets, drops `!`
    pub(crate) fn add_connection(&mut self, field: &str) {
        if let Some(field_type) = self.fields.get(field) {
            self.connections
                .insert(field.to_string(), strip_nullability(field_type));
        }
    }

    pub(crate) fn add_query_definition(&mut self, query: QueryDefinition) {
        self.queries.push(query);
    }

    /// bind a hook name to a behaviour reference
    pub fn add_hook(&mut self, name: impl Into<String>, reference: impl Into<String>) -> Result<()> {
        let name = name.into();
        let reference = reference.into();
        if name.trim().is_empty() {
            return Err(Error::Config(format!("empty hook name on model {}", self.name)));
        }
        if reference.trim().is_empty() {
            return Err(Error::Config(format!(
                "hook {name} on model {} has an empty reference",
                self.name
            )));
        }
        self.hooks.insert(name, reference);
        Ok(())
    }
}
