//! Template module - Placeholder substitution and template rendering
//!
//! Placeholders are `%name%` or `%+name%` where `name` starts with an ASCII
//! letter followed by letters, digits or `_`. The `+` form marks the
//! declaration site of a name and expands to the same value. Both file
//! contents and relative paths are substituted.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::core::catalog;
use crate::core::config::{templates, vars};
use crate::extension::names::{NameError, PackageName};
use crate::extension::schema::SchemaError;
use crate::extension::stub;

/// Template loading and rendering errors
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("invalid manifest for template '{template}': {reason}")]
    InvalidManifest { template: String, reason: String },

    #[error("template '{template}' requires variable '{name}'")]
    MissingVariable { template: String, name: String },

    #[error("class name is invalid: {0} (expected an identifier starting with an uppercase letter)")]
    InvalidClassName(String),

    #[error("template file is not valid UTF-8: {0}")]
    NotUtf8(String),

    #[error("unsafe path in template: {0}")]
    UnsafePath(String),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("failed to render configuration schema: {0}")]
    Json(#[from] serde_json::Error),
}

/// Variables bound for one generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard variable set for a package
    pub fn for_package(
        package: &PackageName,
        class_name: Option<&str>,
        author: Option<&str>,
    ) -> Result<Self, TemplateError> {
        let class_name = match class_name {
            Some(name) => validate_class_name(name)?,
            None => package.to_class_name(),
        };
        let schema = stub::config_schema()?.to_json_pretty()?;
        let author = author.unwrap_or_default();
        let author_json = serde_json::to_string(author)?;

        let mut bound = Self::new();
        bound
            .insert(vars::PACKAGE_NAME, package.as_str())
            .insert(vars::CLASS_NAME, &class_name)
            .insert(vars::IDENT_NAME, &package.to_ident())
            .insert(vars::CONFIG_SCHEMA, &schema)
            .insert(vars::AUTHOR, author)
            .insert(vars::AUTHOR_JSON, &author_json);
        Ok(bound)
    }

    pub fn insert(&mut self, name: &str, value: &str) -> &mut Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn validate_class_name(name: &str) -> Result<String, TemplateError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name.to_string())
    } else {
        Err(TemplateError::InvalidClassName(name.to_string()))
    }
}

/// Replaces every bound placeholder in `input`
///
/// Identifier-shaped tokens with no bound variable are left as they are, so
/// adjacent C format specifiers such as `%s%d` survive rendering.
pub fn substitute(input: &str, bound: &TemplateVars) -> String {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replacement = parse_placeholder(after)
            .and_then(|(name, consumed)| bound.get(name).map(|value| (value, consumed)));
        match replacement {
            Some((value, consumed)) => {
                output.push_str(value);
                rest = &after[consumed..];
            }
            None => {
                output.push('%');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

// Returns the placeholder name and the bytes consumed after the opening `%`
fn parse_placeholder(after: &str) -> Option<(&str, usize)> {
    let offset = usize::from(after.starts_with('+'));
    let body = &after[offset..];

    let mut chars = body.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    for (index, c) in chars {
        if c == '%' {
            return Some((&body[..index], offset + index + 1));
        }
        if !c.is_ascii_alphanumeric() && c != '_' {
            return None;
        }
    }
    None
}

/// Lists the placeholder-shaped names in a text, in order of first use
pub fn placeholders(input: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut rest = input;
    while let Some(start) = rest.find('%') {
        let after = &rest[start + 1..];
        match parse_placeholder(after) {
            Some((name, consumed)) => {
                if !found.iter().any(|seen| seen == name) {
                    found.push(name.to_string());
                }
                rest = &after[consumed..];
            }
            None => rest = after,
        }
    }
    found
}

/// `template.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateManifest {
    pub name: String,
    pub description: String,

    /// External tools the generated package needs (checked by `stencil env`)
    #[serde(default)]
    pub requires: Vec<String>,

    /// Main source file, before substitution
    pub entry: Option<String>,

    /// Variables that must be bound before rendering
    #[serde(default)]
    pub variables: Vec<String>,
}

impl TemplateManifest {
    pub fn parse(content: &str, template: &str) -> Result<Self, TemplateError> {
        toml::from_str(content).map_err(|err| TemplateError::InvalidManifest {
            template: template.to_string(),
            reason: err.to_string(),
        })
    }
}

/// Where a template was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    Builtin,
    Disk(PathBuf),
}

/// One file of a template, path relative to the template root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: PathBuf,
    pub contents: String,
}

/// One file of a generated package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Generated source of a single file
pub type SourceText = RenderedFile;

#[derive(Debug, Clone)]
pub struct Template {
    pub manifest: TemplateManifest,
    pub origin: TemplateOrigin,
    files: Vec<TemplateFile>,
}

impl Template {
    pub fn new(
        manifest: TemplateManifest,
        origin: TemplateOrigin,
        mut files: Vec<TemplateFile>,
    ) -> Result<Self, TemplateError> {
        for file in &files {
            ensure_relative(&file.path)?;
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        if let Some(entry) = &manifest.entry {
            if !files.iter().any(|file| file.path == Path::new(entry)) {
                return Err(TemplateError::InvalidManifest {
                    template: manifest.name.clone(),
                    reason: format!("entry file not found: {entry}"),
                });
            }
        }

        Ok(Self {
            manifest,
            origin,
            files,
        })
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn files(&self) -> &[TemplateFile] {
        &self.files
    }

    /// Renders every file, substituting both paths and contents
    pub fn render(&self, bound: &TemplateVars) -> Result<Vec<RenderedFile>, TemplateError> {
        self.check_variables(bound)?;
        self.files
            .iter()
            .map(|file| self.render_file(file, bound))
            .collect()
    }

    /// Renders only the entry file
    pub fn render_entry(&self, bound: &TemplateVars) -> Result<SourceText, TemplateError> {
        self.check_variables(bound)?;
        let entry = self
            .manifest
            .entry
            .as_deref()
            .ok_or_else(|| TemplateError::InvalidManifest {
                template: self.manifest.name.clone(),
                reason: "no entry file declared".to_string(),
            })?;
        let file = self
            .files
            .iter()
            .find(|file| file.path == Path::new(entry))
            .ok_or_else(|| TemplateError::NotFound(entry.to_string()))?;
        self.render_file(file, bound)
    }

    fn check_variables(&self, bound: &TemplateVars) -> Result<(), TemplateError> {
        match self
            .manifest
            .variables
            .iter()
            .find(|name| bound.get(name).is_none())
        {
            Some(name) => Err(TemplateError::MissingVariable {
                template: self.manifest.name.clone(),
                name: name.clone(),
            }),
            None => Ok(()),
        }
    }

    fn render_file(
        &self,
        file: &TemplateFile,
        bound: &TemplateVars,
    ) -> Result<RenderedFile, TemplateError> {
        let origin = format!("{}/{}", self.manifest.name, file.path.display());
        let raw_path = file
            .path
            .to_str()
            .ok_or_else(|| TemplateError::NotUtf8(origin.clone()))?;

        let path = PathBuf::from(substitute(raw_path, bound));
        ensure_relative(&path)?;
        let contents = substitute(&file.contents, bound);

        debug!("rendered {origin} -> {}", path.display());
        Ok(RenderedFile { path, contents })
    }
}

// Substituted values must never escape the output directory
fn ensure_relative(path: &Path) -> Result<(), TemplateError> {
    let safe = path.components().all(|c| matches!(c, Component::Normal(_)));
    if safe && path.components().next().is_some() {
        Ok(())
    } else {
        Err(TemplateError::UnsafePath(path.display().to_string()))
    }
}

/// Generates the main source file of an editor extension package
pub fn generate(package_name: &str, class_name: Option<&str>) -> Result<SourceText, TemplateError> {
    let package = PackageName::parse(package_name)?;
    let bound = TemplateVars::for_package(&package, class_name, None)?;
    catalog::builtin(templates::ATOM_PACKAGE)?.render_entry(&bound)
}
