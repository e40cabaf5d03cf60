//! Configuration module - Constants and user settings
//!
//! Settings come from `--config <path>` or `./stencil.toml`. A missing file
//! means defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

/// Default settings file name, looked up in the current directory
pub const SETTINGS_FILE: &str = "stencil.toml";

/// Template manifest file name inside each template directory
pub const MANIFEST_FILE: &str = "template.toml";

/// Template variable names
pub mod vars {
    /// Package name as typed by the user (`my-ext`)
    pub const PACKAGE_NAME: &str = "packageName";

    /// Main class name (`MyExt`)
    pub const CLASS_NAME: &str = "PluginClassname";

    /// Package name as a C/JS identifier (`my_ext`)
    pub const IDENT_NAME: &str = "identName";

    /// Pretty JSON of the extension configuration schema
    pub const CONFIG_SCHEMA: &str = "configSchema";

    /// Author from settings
    pub const AUTHOR: &str = "author";

    /// Author as a JSON string literal, quotes included
    pub const AUTHOR_JSON: &str = "authorJson";
}

/// Built-in template names
pub mod templates {
    /// Editor extension package
    pub const ATOM_PACKAGE: &str = "atom-package";

    /// Loadable bash builtin
    pub const BASH_BUILTIN: &str = "bash-builtin";
}

/// User settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Substituted for `%author%`
    pub author: Option<String>,

    /// Extra templates; override built-ins with the same name
    pub templates_dir: Option<PathBuf>,

    /// Where `template new` creates packages when `--output` is not given
    pub output_dir: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from an explicit path, or from `./stencil.toml` if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = PathBuf::from(SETTINGS_FILE);
                if default.exists() {
                    Self::from_file(&default)
                } else {
                    debug!("no {SETTINGS_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read settings: {}", path.display()))?;
        let mut settings = Self::parse(&content)
            .context(format!("Failed to parse settings: {}", path.display()))?;

        // Relative directories are relative to the settings file
        if let Some(base) = path.parent() {
            settings.templates_dir = settings.templates_dir.map(|dir| base.join(dir));
            settings.output_dir = settings.output_dir.map(|dir| base.join(dir));
        }

        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn parses_all_fields() {
        let settings = Settings::parse(
            "author = \"Ada\"\ntemplates_dir = \"tpl\"\noutput_dir = \"out\"\n",
        )
        .unwrap();
        assert_eq!(settings.author.as_deref(), Some("Ada"));
        assert_eq!(settings.templates_dir, Some(PathBuf::from("tpl")));
        assert_eq!(settings.output_dir(), PathBuf::from("out"));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Settings::parse("colour = \"red\"\n").is_err());
    }

    #[test]
    fn resolves_directories_against_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "templates_dir = \"tpl\"\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.templates_dir, Some(dir.path().join("tpl")));
        assert_eq!(settings.output_dir, None);
    }
}
