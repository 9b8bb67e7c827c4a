//! fragment composition
//!
//! renders selection trees into indented graphql selection bodies and merges
//! custom fragment and hook overrides into the graph.
//!
//! recursion is driven by the selection tree only. connections are never
//! expanded beyond what the tree names, so cyclic schemas (blog -> post ->
//! blog) are safe at any caller-chosen depth.

use crate::diagnostics::{Diagnostics, OverrideKind, Warning};
use crate::error::Result;
use crate::graph::ModelGraph;
use crate::model::FieldSelection;
use crate::scanner::{base_type_name, list_element};
use indexmap::IndexMap;
use serde::Serialize;

/// indentation per depth level
pub const INDENT: &str = "  ";

/// model name -> fragment key -> selection
pub type CustomFragments = IndexMap<String, IndexMap<String, Vec<FieldSelection>>>;

/// model name -> hook name -> behaviour reference
pub type CustomHooks = IndexMap<String, IndexMap<String, String>>;

/// a fragment ready for the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedFragment {
    /// registry key, e.g. `FragmentDefault`
    pub key: String,
    /// emitted name, e.g. `BlogFragmentDefault`
    pub identifier: String,
    /// selection body indented one level
    pub body: String,
    /// full `fragment <identifier> on <Model> { ... }` definition
    pub text: String,
}

/// emitted fragment name; prefixing the model keeps keys unique across models
pub fn fragment_identifier(model: &str, key: &str) -> String {
    format!("{model}{key}")
}

pub struct FragmentComposer<'g> {
    graph: &'g ModelGraph,
}

impl<'g> FragmentComposer<'g> {
    pub fn new(graph: &'g ModelGraph) -> Self {
        Self { graph }
    }

    /// render a selection tree for `model`, two spaces per depth level
    pub fn compose_selection(
        &self,
        model: &str,
        selection: &[FieldSelection],
        depth: usize,
        diagnostics: &mut Diagnostics,
    ) -> String {
        let mut lines = Vec::new();
        self.compose_into(model, selection, depth, diagnostics, &mut lines);
        lines.join("\n")
    }

    fn compose_into(
        &self,
        model: &str,
        selection: &[FieldSelection],
        depth: usize,
        diagnostics: &mut Diagnostics,
        lines: &mut Vec<String>,
    ) {
        let pad = INDENT.repeat(depth);

        for entry in selection {
            let map = match entry {
                FieldSelection::Field(field) => {
                    lines.push(format!("{pad}{field}"));
                    continue;
                }
                FieldSelection::Nested(map) => map,
            };

            // without the owner we cannot know the field types underneath
            let Some(owner) = self.graph.get(model) else {
                for field in map.keys() {
                    diagnostics.warn(Warning::ExcludedConnection {
                        model: model.to_string(),
                        field: field.clone(),
                    });
                }
                continue;
            };

            for (field, nested) in map {
                let Some(field_type) = owner.field_type(field) else {
                    tracing::debug!(model, field = %field, "skipping field that is not on the model");
                    continue;
                };

                match list_element(field_type) {
                    Some(element) if self.graph.is_model(element) => {
                        lines.push(format!("{pad}{field} {{"));
                        lines.push(format!("{pad}{INDENT}items {{"));
                        self.compose_into(element, nested, depth + 2, diagnostics, lines);
                        lines.push(format!("{pad}{INDENT}}}"));
                        lines.push(format!("{pad}{INDENT}nextToken"));
                        lines.push(format!("{pad}}}"));
                    }
                    Some(element) => {
                        lines.push(format!("{pad}{field} {{"));
                        self.compose_into(element, nested, depth + 1, diagnostics, lines);
                        lines.push(format!("{pad}}}"));
                    }
                    None => {
                        lines.push(format!("{pad}{field} {{"));
                        let target = base_type_name(field_type);
                        self.compose_into(target, nested, depth + 1, diagnostics, lines);
                        lines.push(format!("{pad}}}"));
                    }
                }
            }
        }
    }

    /// render one fragment of a model
    pub fn render_fragment(
        &self,
        model: &str,
        key: &str,
        selection: &[FieldSelection],
        diagnostics: &mut Diagnostics,
    ) -> RenderedFragment {
        let identifier = fragment_identifier(model, key);
        let body = self.compose_selection(model, selection, 1, diagnostics);
        let text = format!("fragment {identifier} on {model} {{\n{body}\n}}");
        RenderedFragment {
            key: key.to_string(),
            identifier,
            body,
            text,
        }
    }

    /// render every registered fragment of a model, registry order
    pub fn render_fragments(
        &self,
        model: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<RenderedFragment> {
        let Some(owner) = self.graph.get(model) else {
            return Vec::new();
        };
        owner
            .fragments()
            .iter()
            .map(|(key, selection)| self.render_fragment(model, key, selection, diagnostics))
            .collect()
    }
}

/// validate and insert custom fragments; overrides for unbuilt models are skipped
pub fn merge_custom_fragments(
    graph: &mut ModelGraph,
    fragments: &CustomFragments,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    for (model, overrides) in fragments {
        if graph.get(model).is_none() {
            diagnostics.warn(Warning::UnknownOverrideModel {
                kind: OverrideKind::Fragment,
                model: model.clone(),
            });
            continue;
        }
        for (name, selection) in overrides {
            graph.add_fragment(model, name.clone(), selection.clone())?;
        }
    }
    Ok(())
}

/// bind custom hooks; hooks for unbuilt models are skipped
pub fn merge_custom_hooks(
    graph: &mut ModelGraph,
    hooks: &CustomHooks,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    for (model, bindings) in hooks {
        let Some(owner) = graph.get_mut(model) else {
            diagnostics.warn(Warning::UnknownOverrideModel {
                kind: OverrideKind::Hook,
                model: model.clone(),
            });
            continue;
        };
        for (name, reference) in bindings {
            owner.add_hook(name.clone(), reference.clone())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, DEFAULT_FRAGMENT};
    use std::collections::BTreeSet;

    fn model(name: &str, fields: &[(&str, &str)]) -> Model {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Model::new(name, fields, &BTreeSet::new())
    }

    fn graph() -> ModelGraph {
        ModelGraph::from_models(vec![
            model(
                "Blog",
                &[
                    ("id", "ID!"),
                    ("name", "String!"),
                    ("posts", "[Post]"),
                    ("tags", "[Tag]"),
                    ("owner", "Owner"),
                ],
            ),
            model(
                "Post",
                &[
                    ("id", "ID!"),
                    ("title", "String!"),
                    ("blog", "Blog"),
                    ("comments", "[Comment]"),
                ],
            ),
        ])
    }

    fn selection(json: &str) -> Vec<FieldSelection> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_default_fragment_body() {
        let graph = graph();
        let composer = FragmentComposer::new(&graph);
        let blog = graph.get("Blog").unwrap();
        let body = composer.compose_selection(
            "Blog",
            &blog.fragments()[DEFAULT_FRAGMENT],
            0,
            &mut Diagnostics::new(),
        );
        assert_eq!(body, "id\nname");
    }

    #[test]
    fn test_list_of_model_gets_pagination_envelope() {
        let graph = graph();
        let composer = FragmentComposer::new(&graph);
        let body = composer.compose_selection(
            "Blog",
            &selection(r#"["id", {"posts": ["id", "title"]}]"#),
            0,
            &mut Diagnostics::new(),
        );
        assert_eq!(
            body,
            "id\nposts {\n  items {\n    id\n    title\n  }\n  nextToken\n}"
        );
    }

    #[test]
    fn test_plain_list_and_object_have_no_envelope() {
        let graph = graph();
        let composer = FragmentComposer::new(&graph);
        let body = composer.compose_selection(
            "Blog",
            &selection(r#"[{"tags": ["label"], "owner": ["email"]}]"#),
            1,
            &mut Diagnostics::new(),
        );
        assert_eq!(
            body,
            "  tags {\n    label\n  }\n  owner {\n    email\n  }"
        );
        assert!(!body.contains("nextToken"));
    }

    #[test]
    fn test_self_referencing_selection_follows_tree_depth() {
        let graph = graph();
        let composer = FragmentComposer::new(&graph);
        let body = composer.compose_selection(
            "Blog",
            &selection(r#"[{"posts": [{"blog": [{"posts": ["id"]}]}]}]"#),
            0,
            &mut Diagnostics::new(),
        );
        let expected = [
            "posts {",
            "  items {",
            "    blog {",
            "      posts {",
            "        items {",
            "          id",
            "        }",
            "        nextToken",
            "      }",
            "    }",
            "  }",
            "  nextToken",
            "}",
        ]
        .join("\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn test_entries_under_unbuilt_models_are_omitted() {
        let graph = graph();
        let composer = FragmentComposer::new(&graph);
        let mut diagnostics = Diagnostics::new();
        let body = composer.compose_selection(
            "Post",
            &selection(r#"[{"comments": ["id", {"post": ["id"]}]}]"#),
            0,
            &mut diagnostics,
        );
        // comment is not a model here, so no envelope and no nested lookup
        assert_eq!(body, "comments {\n  id\n}");
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::ExcludedConnection {
                model: "Comment".to_string(),
                field: "post".to_string(),
            }]
        );
    }

    #[test]
    fn test_nested_entry_missing_from_model_is_skipped_quietly() {
        let graph = graph();
        let composer = FragmentComposer::new(&graph);
        let mut diagnostics = Diagnostics::new();
        let body = composer.compose_selection(
            "Blog",
            &selection(r#"["id", {"ghost": ["id"]}]"#),
            0,
            &mut diagnostics,
        );
        assert_eq!(body, "id");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_render_fragment_prefixes_model_name() {
        let graph = graph();
        let composer = FragmentComposer::new(&graph);
        let fragment = composer.render_fragment(
            "Post",
            "JustId",
            &selection(r#"["id"]"#),
            &mut Diagnostics::new(),
        );
        assert_eq!(fragment.identifier, "PostJustId");
        assert_eq!(fragment.text, "fragment PostJustId on Post {\n  id\n}");
    }

    #[test]
    fn test_merge_custom_fragments_and_hooks() {
        let mut graph = graph();
        let mut diagnostics = Diagnostics::new();
        let fragments: CustomFragments =
            serde_json::from_str(r#"{"Blog": {"JustID": ["id"]}, "Ghost": {"X": ["id"]}}"#)
                .unwrap();
        merge_custom_fragments(&mut graph, &fragments, &mut diagnostics).unwrap();

        let hooks: CustomHooks =
            serde_json::from_str(r#"{"Post": {"afterFind": "./hooks.js#linkify"}}"#).unwrap();
        merge_custom_hooks(&mut graph, &hooks, &mut diagnostics).unwrap();

        assert!(graph.get("Blog").unwrap().fragments().contains_key("JustID"));
        assert_eq!(
            graph.get("Post").unwrap().hooks().get("afterFind").map(String::as_str),
            Some("./hooks.js#linkify")
        );
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_merge_custom_fragments_rejects_unknown_fields() {
        let mut graph = graph();
        let fragments: CustomFragments =
            serde_json::from_str(r#"{"Blog": {"Bad": ["id", "bogus", "other"]}}"#).unwrap();
        let err = merge_custom_fragments(&mut graph, &fragments, &mut Diagnostics::new())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "fragment Bad on model Blog references unknown fields: bogus, other"
        );
    }
}
