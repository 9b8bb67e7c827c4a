//! output emission
//!
//! template mechanics live behind [`Renderer`]; [`emit`] only decides which
//! template renders which bindings and where the result is written.

use crate::error::{Error, Result};
use crate::generate::Generation;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const COLLECTION_TEMPLATE: &str = "collection";
pub const COLLECTION_INDEX_TEMPLATE: &str = "collectionIndex";
pub const QUERY_INPUTS_TEMPLATE: &str = "queryInputs";
pub const INPUT_TYPES_TEMPLATE: &str = "inputTypes";

/// renders a named template with json bindings
pub trait Renderer {
    fn render(&self, template: &str, bindings: &Value) -> Result<String>;

    /// extension of emitted files, without the dot
    fn file_extension(&self) -> &str {
        "js"
    }
}

/// persists rendered output under a relative path
pub trait OutputWriter {
    fn write(&mut self, relative_path: &Path, contents: &str) -> Result<()>;
}

/// render and write every output file, returning how many were written
pub fn emit(
    generation: &Generation,
    renderer: &dyn Renderer,
    writer: &mut dyn OutputWriter,
    use_esm: bool,
) -> Result<usize> {
    let ext = renderer.file_extension();
    let mut written = 0;

    for model in &generation.models {
        let bindings = json!({
            "model": serde_json::to_value(model)?,
            "useESM": use_esm,
        });
        let contents = renderer.render(COLLECTION_TEMPLATE, &bindings)?;
        let path = PathBuf::from("collections").join(format!("{}.{ext}", model.collection_name));
        writer.write(&path, &contents)?;
        written += 1;
    }

    let collections: Vec<Value> = generation
        .models
        .iter()
        .map(|model| json!({"name": model.name, "collectionName": model.collection_name}))
        .collect();
    let index = renderer.render(
        COLLECTION_INDEX_TEMPLATE,
        &json!({"collections": collections, "useESM": use_esm}),
    )?;
    writer.write(&PathBuf::from("collections").join(format!("index.{ext}")), &index)?;
    written += 1;

    let query_inputs = renderer.render(
        QUERY_INPUTS_TEMPLATE,
        &json!({"queryInputs": generation.query_inputs, "useESM": use_esm}),
    )?;
    writer.write(Path::new(&format!("queryInputs.{ext}")), &query_inputs)?;
    written += 1;

    let input_types = renderer.render(
        INPUT_TYPES_TEMPLATE,
        &json!({
            "inputs": generation.inputs,
            "enums": generation.enums,
            "useESM": use_esm,
        }),
    )?;
    writer.write(Path::new(&format!("inputTypes.{ext}")), &input_types)?;
    written += 1;

    tracing::info!(files = written, "emitted generated modules");
    Ok(written)
}

/// writes the bindings themselves as pretty json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, template: &str, bindings: &Value) -> Result<String> {
        serde_json::to_string_pretty(&json!({"template": template, "bindings": bindings})).map_err(
            |err| Error::Render {
                template: template.to_string(),
                message: err.to_string(),
            },
        )
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

/// writes files below a root directory, creating parents as needed
#[derive(Debug, Clone)]
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl OutputWriter for FsWriter {
    fn write(&mut self, relative_path: &Path, contents: &str) -> Result<()> {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }
        fs::write(&path, contents).map_err(|err| Error::io(&path, err))?;
        tracing::debug!(path = %path.display(), "wrote output");
        Ok(())
    }
}
