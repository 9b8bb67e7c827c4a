//! graphql-parser backed schema scanner
//!
//! parses both schemas as sdl documents and reads declarations off the ast.
//! stricter than [`crate::TextScanner`]: both documents must be valid sdl.

use crate::diagnostics::OperationBlock;
use crate::error::{Error, Result};
use crate::scanner::{
    is_connection_wrapper, normalize_type, EnumDeclaration, FieldDeclaration, InputDeclaration,
    ModelDeclaration, OperationDeclaration, SchemaScanner, MODEL_ANNOTATION,
    RELATIONSHIP_ANNOTATIONS,
};
use graphql_parser::schema::{
    parse_schema, Definition, Document, Field, Type, TypeDefinition, TypeExtension,
};

/// document scanner over a source schema and a build schema
pub struct DocumentScanner<'a> {
    source: Document<'a, String>,
    build: Document<'a, String>,
    query_type: String,
    mutation_type: String,
}

impl<'a> DocumentScanner<'a> {
    pub fn new(source: &'a str, build: &'a str) -> Result<Self> {
        let source = parse_schema::<String>(source)
            .map_err(|err| Error::SchemaParse(format!("source schema: {err}")))?;
        let build = parse_schema::<String>(build)
            .map_err(|err| Error::SchemaParse(format!("build schema: {err}")))?;

        let mut query_type = OperationBlock::Query.type_name().to_string();
        let mut mutation_type = OperationBlock::Mutation.type_name().to_string();
        for def in &build.definitions {
            if let Definition::SchemaDefinition(schema) = def {
                if let Some(query) = &schema.query {
                    query_type = query.clone();
                }
                if let Some(mutation) = &schema.mutation {
                    mutation_type = mutation.clone();
                }
            }
        }

        Ok(Self {
            source,
            build,
            query_type,
            mutation_type,
        })
    }

    fn root_type(&self, block: OperationBlock) -> &str {
        match block {
            OperationBlock::Query => &self.query_type,
            OperationBlock::Mutation => &self.mutation_type,
        }
    }

    /// fields of every object definition or extension with this name
    fn object_fields(&self, name: &str) -> Vec<&Field<'a, String>> {
        let mut fields = Vec::new();
        for def in &self.build.definitions {
            match def {
                Definition::TypeDefinition(TypeDefinition::Object(obj)) if obj.name == name => {
                    fields.extend(obj.fields.iter());
                }
                Definition::TypeExtension(TypeExtension::Object(ext)) if ext.name == name => {
                    fields.extend(ext.fields.iter());
                }
                _ => {}
            }
        }
        fields
    }
}

impl SchemaScanner for DocumentScanner<'_> {
    fn scan_model_names(&self) -> Result<Vec<ModelDeclaration>> {
        let mut models = Vec::new();
        for def in &self.source.definitions {
            let Definition::TypeDefinition(TypeDefinition::Object(obj)) = def else {
                continue;
            };
            if !obj.directives.iter().any(|d| d.name == MODEL_ANNOTATION) {
                continue;
            }
            let relationship_fields = obj
                .fields
                .iter()
                .filter(|field| {
                    field
                        .directives
                        .iter()
                        .any(|d| RELATIONSHIP_ANNOTATIONS.contains(&d.name.as_str()))
                })
                .map(|field| field.name.clone())
                .collect();
            models.push(ModelDeclaration {
                name: obj.name.clone(),
                relationship_fields,
            });
        }

        tracing::debug!(count = models.len(), "found models in source document");
        Ok(models)
    }

    fn scan_model_fields(&self, model: &str) -> Result<Vec<FieldDeclaration>> {
        let obj = self
            .build
            .definitions
            .iter()
            .find_map(|def| match def {
                Definition::TypeDefinition(TypeDefinition::Object(obj)) if obj.name == model => {
                    Some(obj)
                }
                _ => None,
            })
            .ok_or_else(|| Error::MissingModel {
                model: model.to_string(),
            })?;

        Ok(obj
            .fields
            .iter()
            .map(|field| {
                let raw = format_gql_type(&field.field_type);
                FieldDeclaration {
                    name: field.name.clone(),
                    field_type: normalize_type(&raw),
                    paginated: is_connection_wrapper(&raw),
                }
            })
            .collect())
    }

    fn scan_operation_block(&self, block: OperationBlock) -> Result<Vec<OperationDeclaration>> {
        let operations: Vec<OperationDeclaration> = self
            .object_fields(self.root_type(block))
            .into_iter()
            .map(|field| OperationDeclaration {
                name: field.name.clone(),
                params: field
                    .arguments
                    .iter()
                    .map(|arg| (arg.name.clone(), format_gql_type(&arg.value_type)))
                    .collect(),
                return_type: format_gql_type(&field.field_type),
            })
            .collect();

        tracing::debug!(block = %block, count = operations.len(), "scanned operations");
        Ok(operations)
    }

    fn scan_input_blocks(&self) -> Result<Vec<InputDeclaration>> {
        Ok(self
            .build
            .definitions
            .iter()
            .filter_map(|def| match def {
                Definition::TypeDefinition(TypeDefinition::InputObject(input)) => {
                    Some(InputDeclaration {
                        name: input.name.clone(),
                        fields: input
                            .fields
                            .iter()
                            .map(|f| (f.name.clone(), format_gql_type(&f.value_type)))
                            .collect(),
                    })
                }
                _ => None,
            })
            .collect())
    }

    fn scan_enum_blocks(&self) -> Result<Vec<EnumDeclaration>> {
        Ok(self
            .build
            .definitions
            .iter()
            .filter_map(|def| match def {
                Definition::TypeDefinition(TypeDefinition::Enum(enum_ty)) => {
                    Some(EnumDeclaration {
                        name: enum_ty.name.clone(),
                        values: enum_ty.values.iter().map(|v| v.name.clone()).collect(),
                    })
                }
                _ => None,
            })
            .collect())
    }
}

fn format_gql_type(ty: &Type<String>) -> String {
    match ty {
        Type::NamedType(name) => name.clone(),
        Type::NonNullType(inner) => format!("{}!", format_gql_type(inner)),
        Type::ListType(inner) => format!("[{}]", format_gql_type(inner)),
    }
}
