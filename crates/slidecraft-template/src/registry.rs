/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template registry and template-definition loading.
//!
//! Template definitions are YAML files carrying `name`, `description`,
//! `category`, `schema` (restricted JSON-Schema subset), `output` (template
//! text), and optional `example` and `css` fields. The registry is a plain
//! name→definition map with last-write-wins registration: loading a
//! built-in tree and then a custom tree gives the custom tree override
//! priority for any colliding name. No inheritance, no merging.

use crate::error::TemplateError;
use crate::parser::Template;
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use slidecraft_schema::{FieldError, Schema, SchemaError, compile, join_field_errors};
use slidecraft_parse::yaml_to_json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use yaml_rust2::YamlLoader;

/// Errors that can occur while loading template definitions.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Reading a template file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed.
    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A template file is not well-formed YAML.
    #[error("YAML syntax error: {0}")]
    Yaml(#[from] yaml_rust2::scanner::ScanError),

    /// The declaration fails the definition-level schema.
    #[error("Invalid template definition: {}", join_field_errors(.errors))]
    InvalidDefinition { errors: Vec<FieldError> },

    /// The declared content schema does not compile.
    #[error("Invalid content schema: {0}")]
    Schema(#[from] SchemaError),

    /// The declared output template does not compile.
    #[error("Invalid output template: {0}")]
    Template(#[from] TemplateError),

    /// A failure scoped to one file during a directory load.
    #[error("Failed to load template from {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<RegistryError>,
    },
}

/// A loaded, compiled template definition.
#[derive(Debug, Clone)]
pub struct TemplateDefinition {
    /// Unique registry key.
    pub name: String,
    pub description: String,
    pub category: String,
    /// Compiled content schema slide content is validated against.
    pub schema: Schema,
    /// Compiled output template.
    pub output: Template,
    /// The raw output template text, as declared.
    pub output_source: String,
    /// Optional example content, for documentation surfaces.
    pub example: Option<String>,
    /// Optional stylesheet fragment aggregated into the document header.
    pub css: Option<String>,
}

/// Schema every template declaration must satisfy: non-empty `name` and
/// non-empty `output`; everything else is optional.
static DEFINITION_SCHEMA: Lazy<Schema> = Lazy::new(|| {
    compile(&json!({
        "type": "object",
        "required": ["name", "output"],
        "properties": {
            "name": {"type": "string", "pattern": "\\S"},
            "description": {"type": "string"},
            "category": {"type": "string"},
            "schema": {"type": "object"},
            "output": {"type": "string", "pattern": "\\S"},
            "example": {"type": "string"},
            "css": {"type": "string"}
        }
    }))
    .expect("definition schema is well-formed")
});

/// Name→definition map over loaded templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateDefinition>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse, validate, compile, and register one template declaration.
    ///
    /// Returns the registered name. Re-registering an existing name
    /// overwrites the previous definition.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML, a declaration violating the definition
    /// schema (every failure enumerated), an uncompilable content schema,
    /// or an uncompilable output template. A failure never affects
    /// previously registered templates.
    pub fn load_from_text(&mut self, text: &str) -> Result<String, RegistryError> {
        let documents = YamlLoader::load_from_str(text)?;
        let declaration = documents.first().map(yaml_to_json).unwrap_or(Value::Null);

        let outcome = DEFINITION_SCHEMA.validate(&declaration);
        if !outcome.valid {
            return Err(RegistryError::InvalidDefinition {
                errors: outcome.errors,
            });
        }

        let empty = serde_json::Map::new();
        let fields = declaration.as_object().unwrap_or(&empty);
        let name = string_field(fields, "name").unwrap_or_default();
        let output_source = string_field(fields, "output").unwrap_or_default();

        // Content schema defaults to an open object when absent.
        let schema = match fields.get("schema") {
            Some(declared) => compile(declared)?,
            None => compile(&json!({"type": "object"}))?,
        };
        let output = Template::compile(&output_source)?;

        if self.templates.contains_key(&name) {
            tracing::debug!(template = %name, "Overriding existing template registration");
        } else {
            tracing::debug!(template = %name, "Registering template");
        }

        self.templates.insert(
            name.clone(),
            TemplateDefinition {
                name: name.clone(),
                description: string_field(fields, "description").unwrap_or_default(),
                category: string_field(fields, "category").unwrap_or_default(),
                schema,
                output,
                output_source,
                example: string_field(fields, "example"),
                css: string_field(fields, "css"),
            },
        );
        Ok(name)
    }

    /// Recursively load every `*.yaml`/`*.yml` file under `path`, in
    /// sorted traversal order.
    ///
    /// Returns the number of templates loaded. A failing file aborts the
    /// call, but templates registered before it (including by earlier
    /// files of the same call) stay registered: loading is per-file
    /// atomic, not transactional across a batch.
    pub fn load_dir(&mut self, path: impl AsRef<Path>) -> Result<usize, RegistryError> {
        let mut loaded = 0;
        for entry in WalkDir::new(path.as_ref()).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_template_file(entry.path()) {
                continue;
            }
            let text = std::fs::read_to_string(entry.path())?;
            self.load_from_text(&text).map_err(|source| {
                RegistryError::File {
                    path: entry.path().to_path_buf(),
                    source: Box::new(source),
                }
            })?;
            loaded += 1;
        }
        tracing::debug!(count = loaded, dir = %path.as_ref().display(), "Loaded template directory");
        Ok(loaded)
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&TemplateDefinition> {
        self.templates.get(name)
    }

    /// All registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All definitions in a category, sorted by name.
    pub fn list_by_category(&self, category: &str) -> Vec<&TemplateDefinition> {
        let mut matches: Vec<&TemplateDefinition> = self
            .templates
            .values()
            .filter(|def| def.category == category)
            .collect();
        matches.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn is_template_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn string_field(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}
