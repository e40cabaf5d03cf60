//! Names module - Package, command and configuration key identifiers
//!
//! Commands are namespaced as `<package>:<verb>` and configuration keys as
//! `<package>.<option>`.

use std::fmt;

use thiserror::Error;

/// Identifier validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("package name must not be empty")]
    EmptyPackage,

    #[error("package name is invalid: {0} (expected lowercase letters, digits and single hyphens)")]
    InvalidPackage(String),

    #[error("command verb is invalid: {0}")]
    InvalidVerb(String),

    #[error("option name is invalid: {0}")]
    InvalidOption(String),

    #[error("malformed command name: {0} (expected <package>:<verb>)")]
    MalformedCommand(String),

    #[error("malformed configuration key: {0} (expected <package>.<option>)")]
    MalformedKey(String),
}

/// Validated package name, the namespace for every contribution of one extension
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageName(String);

impl PackageName {
    pub fn parse(value: &str) -> Result<Self, NameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(NameError::EmptyPackage);
        }
        if !is_valid_package(value) {
            return Err(NameError::InvalidPackage(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds `<package>:<verb>`
    pub fn command(&self, verb: &str) -> Result<CommandName, NameError> {
        if !is_valid_segment(verb) {
            return Err(NameError::InvalidVerb(verb.to_string()));
        }
        Ok(CommandName {
            package: self.clone(),
            verb: verb.to_string(),
        })
    }

    /// Builds `<package>.<option>`
    pub fn config_key(&self, option: &str) -> Result<ConfigKey, NameError> {
        if !is_valid_segment(option) {
            return Err(NameError::InvalidOption(option.to_string()));
        }
        Ok(ConfigKey {
            package: self.clone(),
            option: option.to_string(),
        })
    }

    /// PascalCase form used as the default class name (`my-ext` -> `MyExt`)
    pub fn to_class_name(&self) -> String {
        self.0
            .split('-')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect()
    }

    /// Identifier form usable in C and JS sources (`my-ext` -> `my_ext`)
    pub fn to_ident(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully-qualified command name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandName {
    package: PackageName,
    verb: String,
}

impl CommandName {
    pub fn parse(value: &str) -> Result<Self, NameError> {
        let (package, verb) = value
            .split_once(':')
            .ok_or_else(|| NameError::MalformedCommand(value.to_string()))?;
        PackageName::parse(package)
            .and_then(|package| package.command(verb))
            .map_err(|_| NameError::MalformedCommand(value.to_string()))
    }

    pub fn package(&self) -> &PackageName {
        &self.package
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.verb)
    }
}

/// Fully-qualified configuration key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigKey {
    package: PackageName,
    option: String,
}

impl ConfigKey {
    pub fn parse(value: &str) -> Result<Self, NameError> {
        let (package, option) = value
            .split_once('.')
            .ok_or_else(|| NameError::MalformedKey(value.to_string()))?;
        PackageName::parse(package)
            .and_then(|package| package.config_key(option))
            .map_err(|_| NameError::MalformedKey(value.to_string()))
    }

    pub fn package(&self) -> &PackageName {
        &self.package
    }

    pub fn option(&self) -> &str {
        &self.option
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.option)
    }
}

fn is_valid_package(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }

    let mut prev_hyphen = false;
    for c in chars {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            prev_hyphen = false;
            continue;
        }
        if c == '-' && !prev_hyphen {
            prev_hyphen = true;
            continue;
        }
        return false;
    }
    !prev_hyphen
}

// Verbs and option names allow mixed case (`showWelcomeOnActivation`)
fn is_valid_segment(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
