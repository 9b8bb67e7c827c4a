//! operation classification
//!
//! attaches `Query` and `Mutation` operations to the model they return.

use crate::diagnostics::{Diagnostics, OperationBlock, Warning};
use crate::error::Result;
use crate::graph::ModelGraph;
use crate::query::{QueryDefinition, QueryKind};
use crate::scanner::{strip_nullability, SchemaScanner};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReturnAlias {
    /// `Blog`
    Model,
    /// `ModelBlogConnection`
    Connection,
    /// `[Blog]`, returned by custom list resolvers
    List,
}

/// classifies scanned operations into query definitions
pub struct OperationClassifier<'s, S: SchemaScanner + ?Sized> {
    scanner: &'s S,
}

impl<'s, S: SchemaScanner + ?Sized> OperationClassifier<'s, S> {
    pub fn new(scanner: &'s S) -> Self {
        Self { scanner }
    }

    /// attach every resolvable operation to its model, in declaration order.
    ///
    /// `Query` is processed before `Mutation`. operations whose return type
    /// is not a model are dropped with a warning. every list operation also
    /// gets an iterate variant with the same name and params.
    pub fn classify(&self, graph: &mut ModelGraph, diagnostics: &mut Diagnostics) -> Result<()> {
        let lookup = return_type_lookup(graph);

        for block in [OperationBlock::Query, OperationBlock::Mutation] {
            let operations = self.scanner.scan_operation_block(block)?;
            for op in operations {
                let return_type = strip_nullability(&op.return_type);
                let Some((model_name, alias)) = lookup.get(&return_type) else {
                    diagnostics.warn(Warning::UnresolvedReturnType {
                        block,
                        operation: op.name,
                        return_type: op.return_type,
                    });
                    continue;
                };

                let kind = match block {
                    OperationBlock::Mutation => QueryKind::Mutate,
                    OperationBlock::Query if *alias == ReturnAlias::Connection => QueryKind::List,
                    OperationBlock::Query => QueryKind::Get,
                };

                let Some(model) = graph.get_mut(model_name) else {
                    continue;
                };
                tracing::debug!(
                    model = %model_name,
                    operation = %op.name,
                    kind = %kind,
                    "attached operation"
                );
                if kind == QueryKind::List {
                    model.add_query_definition(QueryDefinition::new(
                        QueryKind::List,
                        op.name.clone(),
                        op.params.clone(),
                    ));
                    model.add_query_definition(QueryDefinition::new(
                        QueryKind::Iterate,
                        op.name,
                        op.params,
                    ));
                } else {
                    model.add_query_definition(QueryDefinition::new(kind, op.name, op.params));
                }
            }
        }

        Ok(())
    }
}

fn return_type_lookup(graph: &ModelGraph) -> HashMap<String, (String, ReturnAlias)> {
    let mut lookup = HashMap::new();
    for model in graph.models() {
        let name = model.name();
        let aliases = [
            (name.to_string(), ReturnAlias::Model),
            (format!("Model{name}Connection"), ReturnAlias::Connection),
            (format!("[{name}]"), ReturnAlias::List),
        ];
        for (alias, kind) in aliases {
            lookup.entry(alias).or_insert_with(|| (name.to_string(), kind));
        }
    }
    lookup
}
