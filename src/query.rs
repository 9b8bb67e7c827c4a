//! query definitions
//!
//! one [`QueryDefinition`] per generated data-access function.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// operation kind; decides which runtime helper a generated function calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    Get,
    List,
    Mutate,
    Iterate,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Get => "get",
            QueryKind::List => "list",
            QueryKind::Mutate => "mutate",
            QueryKind::Iterate => "iterate",
        }
    }

    /// runtime collection helper the generated function delegates to
    pub fn internal_function(self) -> &'static str {
        match self {
            QueryKind::Get => "_get",
            QueryKind::List => "_list",
            QueryKind::Mutate => "_mutate",
            QueryKind::Iterate => "_iterate",
        }
    }

    /// documented return type of the generated function
    pub fn return_type(self) -> &'static str {
        match self {
            QueryKind::Get | QueryKind::Mutate => "*",
            QueryKind::List => "Array<*>",
            QueryKind::Iterate => "GQLQueryIterator",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "get" => Ok(QueryKind::Get),
            "list" => Ok(QueryKind::List),
            "mutate" => Ok(QueryKind::Mutate),
            "iterate" => Ok(QueryKind::Iterate),
            other => Err(Error::InvalidQueryKind(other.to_string())),
        }
    }
}

/// a schema operation attached to a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefinition {
    kind: QueryKind,
    operation_name: String,
    params: IndexMap<String, String>,
}

impl QueryDefinition {
    pub fn new(
        kind: QueryKind,
        operation_name: impl Into<String>,
        params: IndexMap<String, String>,
    ) -> Self {
        Self {
            kind,
            operation_name: operation_name.into(),
            params,
        }
    }

    /// build from a kind name, rejecting anything outside the closed set
    pub fn parse(
        kind: &str,
        operation_name: impl Into<String>,
        params: IndexMap<String, String>,
    ) -> Result<Self> {
        Ok(Self::new(kind.parse()?, operation_name, params))
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    /// generated function name.
    ///
    /// iterate variants swap the first `list` for `iterate` (`listPosts` ->
    /// `iteratePosts`), or prefix `iterate` when there is no `list`.
    pub fn function_name(&self) -> String {
        if self.kind != QueryKind::Iterate {
            return self.operation_name.clone();
        }
        if self.operation_name.contains("list") {
            return self.operation_name.replacen("list", "iterate", 1);
        }
        format!("iterate{}", self.operation_name)
    }

    /// true if any param is non-null, making the input object itself required
    pub fn input_required(&self) -> bool {
        self.params.values().any(|ty| ty.contains('!'))
    }

    /// object-type signature of the generated function input: `{id: ID, limit?: Int}`
    pub fn input_type(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|(name, ty)| {
                let optional = if ty.contains('!') { "" } else { "?" };
                format!("{name}{optional}: {}", ty.replace('!', ""))
            })
            .collect();
        format!("{{{}}}", params.join(", "))
    }

    /// `operationName:{"param":"Type"}` entry of the query-input module
    pub fn query_param_definition(&self) -> Result<String> {
        Ok(format!(
            "{}:{}",
            self.operation_name,
            serde_json::to_string(&self.params)?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_kind_parse_rejects_unknown() {
        assert_eq!("list".parse::<QueryKind>().unwrap(), QueryKind::List);
        let err = QueryDefinition::parse("fetch", "fetchPosts", IndexMap::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidQueryKind(kind) if kind == "fetch"));
    }

    #[test]
    fn test_function_name() {
        let list = QueryDefinition::new(QueryKind::List, "listBlogs", IndexMap::new());
        assert_eq!(list.function_name(), "listBlogs");

        let iterate = QueryDefinition::new(QueryKind::Iterate, "listBlogs", IndexMap::new());
        assert_eq!(iterate.function_name(), "iterateBlogs");

        let iterate = QueryDefinition::new(QueryKind::Iterate, "postsByBlog", IndexMap::new());
        assert_eq!(iterate.function_name(), "iteratepostsByBlog");
    }

    #[test]
    fn test_input_type() {
        let query = QueryDefinition::new(
            QueryKind::List,
            "listBlogs",
            params(&[
                ("filter", "ModelBlogFilterInput"),
                ("limit", "Int"),
                ("ids", "[ID!]"),
            ]),
        );
        assert_eq!(
            query.input_type(),
            "{filter?: ModelBlogFilterInput, limit?: Int, ids: [ID]}"
        );

        let get = QueryDefinition::new(QueryKind::Get, "getBlog", params(&[("id", "ID!")]));
        assert_eq!(get.input_type(), "{id: ID}");
        assert!(get.input_required());
        assert!(!QueryDefinition::new(QueryKind::List, "listBlogs", params(&[("limit", "Int")]))
            .input_required());
    }

    #[test]
    fn test_internal_function_and_return_type() {
        assert_eq!(QueryKind::Iterate.internal_function(), "_iterate");
        assert_eq!(QueryKind::List.return_type(), "Array<*>");
        assert_eq!(QueryKind::Iterate.return_type(), "GQLQueryIterator");
    }

    #[test]
    fn test_query_param_definition_keeps_order() {
        let query = QueryDefinition::new(
            QueryKind::Get,
            "getBlog",
            params(&[("id", "ID!"), ("version", "Int")]),
        );
        assert_eq!(
            query.query_param_definition().unwrap(),
            r#"getBlog:{"id":"ID!","version":"Int"}"#
        );
    }
}
