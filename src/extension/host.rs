//! Host module - Interfaces an extension consumes from its host
//!
//! The host owns the command registry, the configuration store and the
//! tutorial collaborator. Extensions only receive handles to them. Everything
//! runs on the host's single event loop, so handles are `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::extension::names::{CommandName, ConfigKey, PackageName};
use crate::extension::schema::{ConfigSchema, ConfigValue, SchemaError};

/// Zero-argument command callback
pub type CommandAction = Box<dyn Fn() -> Result<(), HostError>>;

pub type RegistryHandle = Rc<RefCell<dyn CommandRegistry>>;
pub type ConfigHandle = Rc<RefCell<dyn ConfigStore>>;
pub type TutorialHandle = Rc<RefCell<dyn TutorialHook>>;

/// Errors surfaced by host APIs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("command already registered: {0}")]
    DuplicateCommand(CommandName),

    #[error("command not registered: {0}")]
    UnknownCommand(CommandName),

    #[error("configuration schema already declared for package: {0}")]
    DuplicateSchema(PackageName),

    #[error("invalid configuration write to {key}: {source}")]
    InvalidConfig {
        key: ConfigKey,
        #[source]
        source: SchemaError,
    },

    #[error("host resource busy: {0}")]
    Busy(&'static str),
}

/// Command registry interface
pub trait CommandRegistry {
    /// Registers a command; names must be unique across the registry
    fn register_command(
        &mut self,
        name: CommandName,
        action: CommandAction,
    ) -> Result<(), HostError>;

    fn unregister_command(&mut self, name: &CommandName) -> Result<(), HostError>;

    fn contains(&self, name: &CommandName) -> bool;
}

/// Configuration store interface
pub trait ConfigStore {
    /// Declares the schema of one package namespace
    fn declare_schema(
        &mut self,
        package: &PackageName,
        schema: ConfigSchema,
    ) -> Result<(), HostError>;

    fn set(&mut self, key: &ConfigKey, value: ConfigValue) -> Result<(), HostError>;

    /// Current value, falling back to the declared default
    fn get(&self, key: &ConfigKey) -> Option<ConfigValue>;
}

/// Tutorial / welcome-dialog collaborator
pub trait TutorialHook {
    /// One-time wiring to the configuration key the tutorial observes
    fn configure(&mut self, config_key: &ConfigKey) -> Result<(), HostError>;
}

/// Handles injected into an extension at construction
#[derive(Clone)]
pub struct HostContext {
    pub commands: RegistryHandle,
    pub config: ConfigHandle,
    pub tutorial: TutorialHandle,
}

impl HostContext {
    pub fn new(commands: RegistryHandle, config: ConfigHandle, tutorial: TutorialHandle) -> Self {
        Self {
            commands,
            config,
            tutorial,
        }
    }
}
