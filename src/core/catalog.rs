//! Catalog module - Built-in and on-disk templates
//!
//! Built-in templates are embedded from `templates/<name>/` at compile time.
//! A templates directory from the settings is merged on top; a disk template
//! replaces the built-in one with the same name.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use include_dir::{Dir, DirEntry, include_dir};
use log::{debug, info};

use crate::core::config::{MANIFEST_FILE, Settings};
use crate::core::template::{Template, TemplateError, TemplateFile, TemplateManifest, TemplateOrigin};

static BUILTIN_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Loads one embedded template by name
pub fn builtin(name: &str) -> Result<Template, TemplateError> {
    let dir = BUILTIN_TEMPLATES
        .get_dir(name)
        .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
    load_embedded(dir)
}

/// Names of all embedded templates
pub fn builtin_names() -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_TEMPLATES
        .dirs()
        .map(|dir| dir.path().display().to_string())
        .collect();
    names.sort();
    names
}

fn load_embedded(dir: &Dir<'_>) -> Result<Template, TemplateError> {
    let name = dir.path().display().to_string();
    let manifest_file = dir
        .get_file(dir.path().join(MANIFEST_FILE))
        .ok_or_else(|| TemplateError::InvalidManifest {
            template: name.clone(),
            reason: format!("missing {MANIFEST_FILE}"),
        })?;
    let manifest_text = manifest_file
        .contents_utf8()
        .ok_or_else(|| TemplateError::NotUtf8(manifest_file.path().display().to_string()))?;
    let manifest = parse_manifest(manifest_text, &name)?;

    let mut files = Vec::new();
    collect_embedded(dir, dir.path(), &mut files)?;
    Template::new(manifest, TemplateOrigin::Builtin, files)
}

fn collect_embedded(dir: &Dir<'_>, root: &Path, files: &mut Vec<TemplateFile>) -> Result<(), TemplateError> {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => collect_embedded(sub, root, files)?,
            DirEntry::File(file) => {
                // Embedded paths are relative to `templates/`
                let relative = file
                    .path()
                    .strip_prefix(root)
                    .map_err(|_| TemplateError::UnsafePath(file.path().display().to_string()))?;
                if relative == Path::new(MANIFEST_FILE) {
                    continue;
                }
                let contents = file
                    .contents_utf8()
                    .ok_or_else(|| TemplateError::NotUtf8(file.path().display().to_string()))?;
                files.push(TemplateFile {
                    path: relative.to_path_buf(),
                    contents: contents.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn parse_manifest(content: &str, dir_name: &str) -> Result<TemplateManifest, TemplateError> {
    let manifest = TemplateManifest::parse(content, dir_name)?;
    if manifest.name != dir_name {
        return Err(TemplateError::InvalidManifest {
            template: dir_name.to_string(),
            reason: format!("manifest name '{}' does not match directory", manifest.name),
        });
    }
    Ok(manifest)
}

/// Loads a template from `<root>/<name>/`
pub fn load_from_disk(template_dir: &Path) -> Result<Template> {
    let name = template_dir
        .file_name()
        .and_then(|n| n.to_str())
        .context(format!("Invalid template directory: {}", template_dir.display()))?
        .to_string();

    let manifest_path = template_dir.join(MANIFEST_FILE);
    let manifest_text = std::fs::read_to_string(&manifest_path)
        .context(format!("Failed to read {}", manifest_path.display()))?;
    let manifest = parse_manifest(&manifest_text, &name)?;

    let mut files = Vec::new();
    collect_disk(template_dir, template_dir, &mut files)?;

    Ok(Template::new(
        manifest,
        TemplateOrigin::Disk(template_dir.to_path_buf()),
        files,
    )?)
}

fn collect_disk(dir: &Path, root: &Path, files: &mut Vec<TemplateFile>) -> Result<()> {
    let entries = std::fs::read_dir(dir).context(format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_disk(&path, root, files)?;
            continue;
        }

        let relative = path.strip_prefix(root)?.to_path_buf();
        if relative == Path::new(MANIFEST_FILE) {
            continue;
        }
        let contents = std::fs::read_to_string(&path)
            .context(format!("Failed to read template file: {}", path.display()))?;
        files.push(TemplateFile { path: relative, contents });
    }
    Ok(())
}

/// Available templates by name
#[derive(Debug, Default)]
pub struct Catalog {
    templates: BTreeMap<String, Template>,
}

impl Catalog {
    /// Built-in templates merged with the settings' templates directory
    pub fn load(settings: &Settings) -> Result<Self> {
        let mut catalog = Self::builtin()?;
        if let Some(dir) = &settings.templates_dir {
            catalog.merge_dir(dir)?;
        }
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self> {
        let mut catalog = Self::default();
        for name in builtin_names() {
            let template = builtin(&name).context(format!("Built-in template '{name}' is broken"))?;
            catalog.templates.insert(name, template);
        }
        Ok(catalog)
    }

    /// Adds every `<dir>/<name>/template.toml` template found in `dir`
    pub fn merge_dir(&mut self, dir: &Path) -> Result<()> {
        let entries =
            std::fs::read_dir(dir).context(format!("Failed to read templates directory: {}", dir.display()))?;

        let mut candidates: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.join(MANIFEST_FILE).is_file() {
                candidates.push(path);
            } else {
                debug!("skipping {} (no {MANIFEST_FILE})", path.display());
            }
        }
        candidates.sort();

        for path in candidates {
            let template = load_from_disk(&path)?;
            let name = template.name().to_string();
            if self.templates.insert(name.clone(), template).is_some() {
                info!("template '{name}' overridden by {}", path.display());
            }
        }
        Ok(())
    }

    pub fn list(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }

    pub fn get(&self, name: &str) -> Result<&Template, TemplateError> {
        self.templates
            .get(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::templates;

    #[test]
    fn embeds_both_builtin_templates() {
        assert_eq!(
            builtin_names(),
            vec![templates::ATOM_PACKAGE.to_string(), templates::BASH_BUILTIN.to_string()]
        );
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn builtin_files_exclude_manifest() {
        let template = builtin(templates::ATOM_PACKAGE).unwrap();
        assert!(template.files().iter().all(|f| f.path != Path::new(MANIFEST_FILE)));
        assert!(
            template
                .files()
                .iter()
                .any(|f| f.path == Path::new("lib/%packageName%.js"))
        );
    }

    #[test]
    fn unknown_template_is_not_found() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(catalog.get("cobol-app"), Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn disk_template_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join(templates::BASH_BUILTIN);
        std::fs::create_dir_all(custom.join("src")).unwrap();
        std::fs::write(
            custom.join(MANIFEST_FILE),
            "name = \"bash-builtin\"\ndescription = \"custom builtin\"\n",
        )
        .unwrap();
        std::fs::write(custom.join("src/%identName%.c"), "int %identName%;\n").unwrap();
        std::fs::create_dir_all(dir.path().join("notes")).unwrap();

        let settings = Settings {
            templates_dir: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };
        let catalog = Catalog::load(&settings).unwrap();
        let template = catalog.get(templates::BASH_BUILTIN).unwrap();

        assert_eq!(template.manifest.description, "custom builtin");
        assert_eq!(template.origin, TemplateOrigin::Disk(custom.clone()));
        assert_eq!(template.files().len(), 1);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn rejects_manifest_name_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("alpha");
        std::fs::create_dir_all(&custom).unwrap();
        std::fs::write(custom.join(MANIFEST_FILE), "name = \"beta\"\ndescription = \"\"\n").unwrap();

        assert!(load_from_disk(&custom).is_err());
    }
}
