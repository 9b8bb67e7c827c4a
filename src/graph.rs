//! model graph
//!
//! [`ModelGraphBuilder`] turns scanned model declarations into a sorted
//! [`ModelGraph`]. the graph keeps the names of every discovered model, so
//! relationships into models outside the build set are still recognised.

use crate::error::{Error, Result};
use crate::model::{FieldSelection, Model};
use crate::scanner::{base_type_name, ModelDeclaration, SchemaScanner};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// enum name to ordered values
pub type EnumRegistry = IndexMap<String, Vec<String>>;

/// collect every enum block of the build schema
pub fn enum_registry<S: SchemaScanner + ?Sized>(scanner: &S) -> Result<EnumRegistry> {
    Ok(scanner
        .scan_enum_blocks()?
        .into_iter()
        .map(|decl| (decl.name, decl.values))
        .collect())
}

/// models of one generation run, sorted by name
#[derive(Debug, Clone, Default)]
pub struct ModelGraph {
    models: Vec<Model>,
    model_names: BTreeSet<String>,
}

impl ModelGraph {
    /// graph from already-built models; every model counts as discovered
    pub fn from_models(mut models: Vec<Model>) -> Self {
        models.sort_by(|a, b| a.name.cmp(&b.name));
        let model_names = models.iter().map(|m| m.name.clone()).collect();
        Self {
            models,
            model_names,
        }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn into_models(self) -> Vec<Model> {
        self.models
    }

    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Model> {
        self.models.iter_mut().find(|m| m.name == name)
    }

    /// true for any model of the source schema, built or not
    pub fn is_model(&self, name: &str) -> bool {
        self.model_names.contains(name)
    }

    /// add or replace a fragment, validating every level of the selection.
    ///
    /// nested levels are checked against the connected model when that model
    /// is part of the graph. offending names are reported as dotted paths.
    pub fn add_fragment(
        &mut self,
        model: &str,
        fragment: impl Into<String>,
        selection: Vec<FieldSelection>,
    ) -> Result<()> {
        let fragment = fragment.into();
        let owner = self
            .get(model)
            .ok_or_else(|| Error::Config(format!("no model named {model} in the build set")))?;

        let mut invalid = Vec::new();
        self.collect_unknown(owner, &selection, "", &mut invalid);
        if !invalid.is_empty() {
            return Err(Error::UnknownFragmentFields {
                model: model.to_string(),
                fragment,
                fields: invalid,
            });
        }

        if let Some(owner) = self.get_mut(model) {
            tracing::debug!(model, fragment = %fragment, "registered fragment");
            owner.fragments.insert(fragment, selection);
        }
        Ok(())
    }

    fn collect_unknown(
        &self,
        model: &Model,
        selection: &[FieldSelection],
        prefix: &str,
        invalid: &mut Vec<String>,
    ) {
        for entry in selection {
            match entry {
                FieldSelection::Field(field) => {
                    if !model.fields.contains_key(field) {
                        invalid.push(format!("{prefix}{field}"));
                    }
                }
                FieldSelection::Nested(map) => {
                    for (field, nested) in map {
                        let Some(field_type) = model.field_type(field) else {
                            invalid.push(format!("{prefix}{field}"));
                            continue;
                        };
                        if let Some(target) = self.get(base_type_name(field_type)) {
                            let prefix = format!("{prefix}{field}.");
                            self.collect_unknown(target, nested, &prefix, invalid);
                        }
                    }
                }
            }
        }
    }
}

/// builds models from scanned declarations
pub struct ModelGraphBuilder<'s, S: SchemaScanner + ?Sized> {
    scanner: &'s S,
    collections: BTreeSet<String>,
}

impl<'s, S: SchemaScanner + ?Sized> ModelGraphBuilder<'s, S> {
    pub fn new(scanner: &'s S) -> Self {
        Self {
            scanner,
            collections: BTreeSet::new(),
        }
    }

    /// restrict the build set; empty means every model
    pub fn with_collections<I, T>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.collections = collections.into_iter().map(Into::into).collect();
        self
    }

    /// build the graph.
    ///
    /// field lists come from the build schema; a model missing there is fatal.
    pub fn build(
        &self,
        declarations: &[ModelDeclaration],
        enums: &EnumRegistry,
    ) -> Result<ModelGraph> {
        let model_names: BTreeSet<String> =
            declarations.iter().map(|decl| decl.name.clone()).collect();

        if let Some(unknown) = self
            .collections
            .iter()
            .find(|name| !model_names.contains(*name))
        {
            return Err(Error::Config(format!(
                "collection {unknown} is not a model in the source schema"
            )));
        }

        let enum_names: BTreeSet<String> = enums.keys().cloned().collect();
        let mut models = Vec::new();

        for decl in declarations {
            if !self.collections.is_empty() && !self.collections.contains(&decl.name) {
                tracing::debug!(model = %decl.name, "skipping model outside the build set");
                continue;
            }

            let scanned = self.scanner.scan_model_fields(&decl.name)?;
            let fields: IndexMap<String, String> = scanned
                .iter()
                .map(|field| (field.name.clone(), field.field_type.clone()))
                .collect();

            let mut model = Model::new(decl.name.clone(), fields, &enum_names);
            for field in &scanned {
                if field.paginated || decl.relationship_fields.contains(&field.name) {
                    model.add_connection(&field.name);
                }
            }

            tracing::debug!(
                model = %model.name,
                fields = model.fields.len(),
                connections = model.connections.len(),
                "built model"
            );
            models.push(model);
        }

        models.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::info!(count = models.len(), "built model graph");

        Ok(ModelGraph {
            models,
            model_names,
        })
    }
}
