//! non-fatal generation warnings
//!
//! every pipeline stage takes a `&mut Diagnostics` so warnings are scoped to
//! one invocation and can be inspected after generation.

use serde::Serialize;
use std::fmt;

/// operation block a declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationBlock {
    Query,
    Mutation,
}

impl OperationBlock {
    /// type name of the block in the schema
    pub fn type_name(self) -> &'static str {
        match self {
            OperationBlock::Query => "Query",
            OperationBlock::Mutation => "Mutation",
        }
    }
}

impl fmt::Display for OperationBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// kind of custom override supplied for a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideKind {
    Fragment,
    Hook,
}

/// schema-coverage warning; generation continues
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Warning {
    /// operation return type did not match any model, operation dropped
    #[serde(rename_all = "camelCase")]
    UnresolvedReturnType {
        block: OperationBlock,
        operation: String,
        return_type: String,
    },
    /// fragment entry under a model outside the build set, entry omitted
    #[serde(rename_all = "camelCase")]
    ExcludedConnection { model: String, field: String },
    /// override supplied for a model that is not being generated
    #[serde(rename_all = "camelCase")]
    UnknownOverrideModel { kind: OverrideKind, model: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnresolvedReturnType {
                block,
                operation,
                return_type,
            } => write!(
                f,
                "{block} operation {operation} returns {return_type}, which is not a model"
            ),
            Warning::ExcludedConnection { model, field } => write!(
                f,
                "skipping selection of {field}: model {model} is not in the build set"
            ),
            Warning::UnknownOverrideModel { kind, model } => {
                let kind = match kind {
                    OverrideKind::Fragment => "fragments",
                    OverrideKind::Hook => "hooks",
                };
                write!(f, "ignoring {kind} for {model}: model is not in the build set")
            }
        }
    }
}

/// warning sink for one generation run
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// record a warning and log it
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
