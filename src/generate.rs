//! generation pipeline
//!
//! runs scanning, graph building, classification and fragment composition
//! once and collects the renderer inputs into a [`Generation`].

use crate::classifier::OperationClassifier;
use crate::config::{GeneratorConfig, ParserKind};
use crate::diagnostics::{Diagnostics, Warning};
use crate::document_scanner::DocumentScanner;
use crate::error::Result;
use crate::fragment::{
    merge_custom_fragments, merge_custom_hooks, CustomFragments, CustomHooks, FragmentComposer,
    RenderedFragment,
};
use crate::graph::{enum_registry, EnumRegistry, ModelGraphBuilder};
use crate::inputs::{documentation, InputRegistry, InputTypeExtractor};
use crate::loader::load_schema_to_string;
use crate::model::Model;
use crate::query::{QueryDefinition, QueryKind};
use crate::scanner::SchemaScanner;
use crate::text_scanner::TextScanner;
use indexmap::IndexMap;
use serde::Serialize;

/// rendering inputs of one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOutput {
    pub function_name: String,
    pub operation_name: String,
    pub kind: QueryKind,
    pub internal_function: String,
    pub return_type: String,
    pub input_type: String,
    pub input_required: bool,
    pub params: IndexMap<String, String>,
    pub param_definition: String,
}

impl QueryOutput {
    fn from_query(query: &QueryDefinition) -> Result<Self> {
        Ok(Self {
            function_name: query.function_name(),
            operation_name: query.operation_name().to_string(),
            kind: query.kind(),
            internal_function: query.kind().internal_function().to_string(),
            return_type: query.kind().return_type().to_string(),
            input_type: query.input_type(),
            input_required: query.input_required(),
            params: query.params().clone(),
            param_definition: query.query_param_definition()?,
        })
    }
}

/// rendering inputs of one model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOutput {
    pub name: String,
    pub collection_name: String,
    pub fields: IndexMap<String, String>,
    pub primitive_fields: Vec<String>,
    pub complex_fields: Vec<String>,
    pub json_fields: Vec<String>,
    pub connections: IndexMap<String, String>,
    pub queries: Vec<QueryOutput>,
    pub fragments: Vec<RenderedFragment>,
    pub hooks: IndexMap<String, String>,
}

impl ModelOutput {
    fn from_model(
        model: &Model,
        composer: &FragmentComposer<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self> {
        let queries = model
            .queries()
            .iter()
            .map(QueryOutput::from_query)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: model.name().to_string(),
            collection_name: model.collection_name(),
            fields: model.fields().clone(),
            primitive_fields: model.primitive_fields().to_vec(),
            complex_fields: model.complex_fields().to_vec(),
            json_fields: model.json_fields().to_vec(),
            connections: model.connections().clone(),
            queries,
            fragments: composer.render_fragments(model.name(), diagnostics),
            hooks: model.hooks().clone(),
        })
    }
}

/// everything one run produces, sorted and deterministic
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub models: Vec<ModelOutput>,
    pub enums: EnumRegistry,
    /// input name -> field -> documentation type
    pub inputs: InputRegistry,
    /// operation name -> params, first occurrence wins
    pub query_inputs: IndexMap<String, IndexMap<String, String>>,
    pub warnings: Vec<Warning>,
}

impl Generation {
    pub fn model(&self, name: &str) -> Option<&ModelOutput> {
        self.models.iter().find(|m| m.name == name)
    }
}

/// run the whole pipeline over one scanner
pub fn generate<S: SchemaScanner + ?Sized>(
    scanner: &S,
    collections: &[String],
    fragments: &CustomFragments,
    hooks: &CustomHooks,
    diagnostics: &mut Diagnostics,
) -> Result<Generation> {
    let declarations = scanner.scan_model_names()?;
    let enums = enum_registry(scanner)?;

    let mut graph = ModelGraphBuilder::new(scanner)
        .with_collections(collections.iter().cloned())
        .build(&declarations, &enums)?;

    OperationClassifier::new(scanner).classify(&mut graph, diagnostics)?;
    merge_custom_fragments(&mut graph, fragments, diagnostics)?;
    merge_custom_hooks(&mut graph, hooks, diagnostics)?;

    let inputs = documentation(&InputTypeExtractor::new(scanner).extract()?);

    let mut query_inputs = IndexMap::new();
    for model in graph.models() {
        for query in model.queries() {
            query_inputs
                .entry(query.operation_name().to_string())
                .or_insert_with(|| query.params().clone());
        }
    }

    let composer = FragmentComposer::new(&graph);
    let models = graph
        .models()
        .iter()
        .map(|model| ModelOutput::from_model(model, &composer, diagnostics))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        models = models.len(),
        operations = query_inputs.len(),
        warnings = diagnostics.warnings().len(),
        "generation finished"
    );

    Ok(Generation {
        models,
        enums,
        inputs,
        query_inputs,
        warnings: diagnostics.warnings().to_vec(),
    })
}

/// load the configured schemas and overrides, then run the pipeline
pub fn generate_from_config(config: &GeneratorConfig) -> Result<Generation> {
    config.validate()?;
    let source = load_schema_to_string(config.src_schema())?;
    let build = load_schema_to_string(config.build_schema())?;
    let fragments = config.load_fragments()?;
    let hooks = config.load_hooks()?;
    let mut diagnostics = Diagnostics::new();

    tracing::debug!(parser = ?config.parser(), "scanning schemas");
    match config.parser() {
        ParserKind::Text => {
            let scanner = TextScanner::new(&source, &build);
            generate(&scanner, config.collections(), &fragments, &hooks, &mut diagnostics)
        }
        ParserKind::Document => {
            let scanner = DocumentScanner::new(&source, &build)?;
            generate(&scanner, config.collections(), &fragments, &hooks, &mut diagnostics)
        }
    }
}
