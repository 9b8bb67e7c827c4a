//! amplify orm generator
//!
//! this crate turns an amplify graphql schema pair into the data a
//! per-model data-access module needs: models and their field partitions,
//! connections, classified operations and rendered fragments. start with
//! [`GeneratorConfig`] and [`generate_from_config`], or drive [`generate`]
//! with your own [`SchemaScanner`].
//!
//! ## quick start
//!
//! ```
//! use amplify_orm::{generate, CustomFragments, CustomHooks, Diagnostics, TextScanner};
//!
//! let source = "type Blog @model {\n  id: ID!\n  name: String!\n}\n";
//! let build = "type Blog {\n  id: ID!\n  name: String!\n}\n\ntype Query {\n  getBlog(id: ID!): Blog\n}\n";
//!
//! let scanner = TextScanner::new(source, build);
//! let mut diagnostics = Diagnostics::new();
//! let generation = generate(
//!     &scanner,
//!     &[],
//!     &CustomFragments::new(),
//!     &CustomHooks::new(),
//!     &mut diagnostics,
//! )?;
//! assert_eq!(generation.models[0].queries[0].function_name, "getBlog");
//! # Ok::<(), amplify_orm::Error>(())
//! ```
//!
//! ## emitting files
//!
//! the `amplify-orm-codegen` tool reads a json config, runs the pipeline and
//! hands every model to a [`Renderer`] and an [`OutputWriter`].

mod classifier;
mod config;
mod diagnostics;
mod document_scanner;
mod error;
mod fragment;
mod generate;
mod graph;
mod inputs;
mod loader;
mod model;
mod query;
mod render;
mod scanner;
mod text_scanner;

pub use classifier::OperationClassifier;
pub use config::{GeneratorConfig, Overrides, ParserKind};
pub use diagnostics::{Diagnostics, OperationBlock, OverrideKind, Warning};
pub use document_scanner::DocumentScanner;
pub use error::{Error, Result};
pub use fragment::{
    fragment_identifier, merge_custom_fragments, merge_custom_hooks, CustomFragments, CustomHooks,
    FragmentComposer, RenderedFragment, INDENT,
};
pub use generate::{generate, generate_from_config, Generation, ModelOutput, QueryOutput};
pub use graph::{enum_registry, EnumRegistry, ModelGraph, ModelGraphBuilder};
pub use inputs::{doc_type, documentation, InputRegistry, InputTypeExtractor};
pub use loader::load_schema_to_string;
pub use model::{FieldSelection, Model, DEFAULT_FRAGMENT, JSON_SCALAR, SCALAR_TYPES};
pub use query::{QueryDefinition, QueryKind};
pub use render::{
    emit, FsWriter, JsonRenderer, OutputWriter, Renderer, COLLECTION_INDEX_TEMPLATE,
    COLLECTION_TEMPLATE, INPUT_TYPES_TEMPLATE, QUERY_INPUTS_TEMPLATE,
};
pub use scanner::{
    base_type_name, is_connection_wrapper, list_element, normalize_type, strip_nullability,
    EnumDeclaration, FieldDeclaration, InputDeclaration, ModelDeclaration, OperationDeclaration,
    SchemaScanner, MODEL_ANNOTATION, RELATIONSHIP_ANNOTATIONS,
};
pub use text_scanner::TextScanner;
