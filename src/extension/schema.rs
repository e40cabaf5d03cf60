//! Schema module - Declarative configuration schema of an extension
//!
//! The schema is what the host renders as a settings surface and what it
//! validates user-supplied values against. Declaration order is preserved.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Option value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Boolean,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("boolean"),
        }
    }
}

/// Configuration value as stored by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
}

impl ConfigValue {
    pub fn option_type(&self) -> OptionType {
        match self {
            Self::Bool(_) => OptionType::Boolean,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Descriptor of one option
///
/// The option type is read off the default value, so a descriptor can never
/// disagree with its own default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub default: ConfigValue,
    pub title: String,
    pub description: String,
}

impl OptionDescriptor {
    pub fn boolean(default: bool, title: &str, description: &str) -> Self {
        Self {
            default: ConfigValue::Bool(default),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn kind(&self) -> OptionType {
        self.default.option_type()
    }
}

impl Serialize for OptionDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut descriptor = serializer.serialize_struct("OptionDescriptor", 4)?;
        descriptor.serialize_field("type", &self.kind())?;
        descriptor.serialize_field("default", &self.default)?;
        descriptor.serialize_field("title", &self.title)?;
        descriptor.serialize_field("description", &self.description)?;
        descriptor.end()
    }
}

/// Schema declaration and validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("option declared twice: {0}")]
    DuplicateOption(String),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option '{option}' expects a {expected} value, got {got}")]
    TypeMismatch {
        option: String,
        expected: OptionType,
        got: String,
    },
}

/// Ordered option-name to descriptor mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSchema {
    options: Vec<(String, OptionDescriptor)>,
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares one option, rejecting duplicates
    pub fn declare(
        &mut self,
        name: &str,
        descriptor: OptionDescriptor,
    ) -> Result<&mut Self, SchemaError> {
        if self.get(name).is_some() {
            return Err(SchemaError::DuplicateOption(name.to_string()));
        }
        self.options.push((name.to_string(), descriptor));
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options
            .iter()
            .find(|(option, _)| option == name)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionDescriptor)> {
        self.options
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn names(&self) -> Vec<&str> {
        self.options.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Checks a typed value against the declared option
    pub fn validate(&self, option: &str, value: &ConfigValue) -> Result<(), SchemaError> {
        let descriptor = self
            .get(option)
            .ok_or_else(|| SchemaError::UnknownOption(option.to_string()))?;
        if value.option_type() != descriptor.kind() {
            return Err(SchemaError::TypeMismatch {
                option: option.to_string(),
                expected: descriptor.kind(),
                got: value.to_string(),
            });
        }
        Ok(())
    }

    /// Coerces a user-supplied value into the declared type
    ///
    /// Booleans are accepted as JSON booleans or as the strings `true`/`false`
    /// (trimmed, any case).
    pub fn coerce(&self, option: &str, raw: &Value) -> Result<ConfigValue, SchemaError> {
        let descriptor = self
            .get(option)
            .ok_or_else(|| SchemaError::UnknownOption(option.to_string()))?;

        match descriptor.kind() {
            OptionType::Boolean => match raw {
                Value::Bool(value) => Ok(ConfigValue::Bool(*value)),
                Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                    "true" => Ok(ConfigValue::Bool(true)),
                    "false" => Ok(ConfigValue::Bool(false)),
                    _ => Err(type_mismatch(option, descriptor.kind(), raw)),
                },
                _ => Err(type_mismatch(option, descriptor.kind(), raw)),
            },
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// One table per option, in declaration order
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

fn type_mismatch(option: &str, expected: OptionType, raw: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        option: option.to_string(),
        expected,
        got: raw.to_string(),
    }
}

// Emitted as a map in declaration order, the shape editors expect for `configSchema`
impl Serialize for ConfigSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.options.len()))?;
        for (name, descriptor) in &self.options {
            map.serialize_entry(name, descriptor)?;
        }
        map.end()
    }
}
