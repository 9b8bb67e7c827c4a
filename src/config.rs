//! generator configuration
//!
//! build a [`GeneratorConfig`] in code or load it from a json config file.
//! relative paths in a config file resolve against the file's directory.

use crate::error::{Error, Result};
use crate::fragment::{CustomFragments, CustomHooks};
use crate::loader::load_json_document;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// which scanner reads the schemas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// regex scanner, tolerant of loose schema text
    #[default]
    Text,
    /// graphql-parser documents, requires valid sdl
    Document,
}

impl FromStr for ParserKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "text" => Ok(ParserKind::Text),
            "document" => Ok(ParserKind::Document),
            other => Err(Error::Config(format!(
                "unknown parser: {other}. must be text or document"
            ))),
        }
    }
}

/// overrides given either as a path to a json document or inline
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Overrides<T> {
    Path(PathBuf),
    Inline(T),
}

/// configuration for one generation run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// schema whose `@model` types are generated
    #[serde(default)]
    pub(crate) src_schema: PathBuf,

    /// expanded schema, authoritative for fields and operations
    #[serde(default)]
    pub(crate) build_schema: PathBuf,

    #[serde(default)]
    pub(crate) fragments: Option<Overrides<CustomFragments>>,

    #[serde(default)]
    pub(crate) hooks: Option<Overrides<CustomHooks>>,

    /// emit esm modules instead of commonjs
    #[serde(default, rename = "useESM", alias = "useEsm")]
    pub(crate) use_esm: bool,

    /// log at debug level
    #[serde(default)]
    pub(crate) debug: bool,

    /// models to generate; empty means all
    #[serde(default)]
    pub(crate) collections: Vec<String>,

    #[serde(default)]
    pub(crate) parser: ParserKind,
}

impl GeneratorConfig {
    /// create a configuration from the two schema paths
    ///
    /// # example
    ///
    /// ```
    /// use amplify_orm::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::new("schema.graphql", "build/schema.graphql")
    ///     .with_collections(["Blog", "Post"]);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(src_schema: impl Into<PathBuf>, build_schema: impl Into<PathBuf>) -> Self {
        Self {
            src_schema: src_schema.into(),
            build_schema: build_schema.into(),
            fragments: None,
            hooks: None,
            use_esm: false,
            debug: false,
            collections: Vec::new(),
            parser: ParserKind::default(),
        }
    }

    /// load a json config file and resolve its relative paths
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        let config: GeneratorConfig = serde_json::from_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let config = config.resolve_relative_to(base);
        config.validate()?;
        Ok(config)
    }

    /// inline custom fragments
    pub fn with_fragments(mut self, fragments: CustomFragments) -> Self {
        self.fragments = Some(Overrides::Inline(fragments));
        self
    }

    /// custom fragments from a json document
    pub fn with_fragments_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fragments = Some(Overrides::Path(path.into()));
        self
    }

    /// inline custom hooks
    pub fn with_hooks(mut self, hooks: CustomHooks) -> Self {
        self.hooks = Some(Overrides::Inline(hooks));
        self
    }

    /// custom hooks from a json document
    pub fn with_hooks_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.hooks = Some(Overrides::Path(path.into()));
        self
    }

    /// restrict generation to these models
    pub fn with_collections<I, T>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.collections = collections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parser(mut self, parser: ParserKind) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_esm(mut self, use_esm: bool) -> Self {
        self.use_esm = use_esm;
        self
    }

    pub fn src_schema(&self) -> &Path {
        &self.src_schema
    }

    pub fn build_schema(&self) -> &Path {
        &self.build_schema
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    pub fn parser(&self) -> ParserKind {
        self.parser
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn use_esm(&self) -> bool {
        self.use_esm
    }

    /// validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.src_schema.as_os_str().is_empty() {
            return Err(Error::Config("srcSchema is required".to_string()));
        }
        if self.build_schema.as_os_str().is_empty() {
            return Err(Error::Config("buildSchema is required".to_string()));
        }
        if let Some(Overrides::Path(path)) = &self.hooks {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("hooks path cannot be empty".to_string()));
            }
        }
        if let Some(Overrides::Path(path)) = &self.fragments {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("fragments path cannot be empty".to_string()));
            }
        }
        Ok(())
    }

    /// the custom fragment document, read from disk if configured as a path
    pub fn load_fragments(&self) -> Result<CustomFragments> {
        match &self.fragments {
            None => Ok(CustomFragments::new()),
            Some(Overrides::Inline(fragments)) => Ok(fragments.clone()),
            Some(Overrides::Path(path)) => load_json_document(path, "fragments"),
        }
    }

    /// the custom hook document, read from disk if configured as a path
    pub fn load_hooks(&self) -> Result<CustomHooks> {
        match &self.hooks {
            None => Ok(CustomHooks::new()),
            Some(Overrides::Inline(hooks)) => Ok(hooks.clone()),
            Some(Overrides::Path(path)) => load_json_document(path, "hooks"),
        }
    }

    fn resolve_relative_to(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if !path.as_os_str().is_empty() && path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.src_schema);
        resolve(&mut self.build_schema);
        if let Some(Overrides::Path(path)) = &mut self.fragments {
            resolve(path);
        }
        if let Some(Overrides::Path(path)) = &mut self.hooks {
            resolve(path);
        }
        self
    }
}
