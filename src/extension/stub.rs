//! Stub module - The scaffolded extension and its lifecycle contract
//!
//! On construction the stub contributes one command (`<package>:run-tutorial`)
//! whose action turns `<package>.showWelcomeOnActivation` back on, and wires
//! the tutorial collaborator to that key. Teardown removes the command again.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extension::host::{CommandAction, HostContext, HostError};
use crate::extension::names::{CommandName, ConfigKey, NameError, PackageName};
use crate::extension::schema::{ConfigSchema, ConfigValue, OptionDescriptor, SchemaError};

/// Verb of the only command the stub registers
pub const RUN_TUTORIAL_VERB: &str = "run-tutorial";

/// Option re-enabling the welcome tutorial on next activation
pub const SHOW_WELCOME_OPTION: &str = "showWelcomeOnActivation";

/// Option toggling the package's global keymaps
pub const GLOBAL_KEYMAPS_OPTION: &str = "enable-global-keymaps";

/// Lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("malformed configuration schema: {0}")]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Name(#[from] NameError),

    #[error("extension already destroyed: {0}")]
    AlreadyDestroyed(PackageName),
}

/// Contract a host drives: construct once, serialize any number of times,
/// destroy at most once
pub trait Lifecycle: Sized {
    type State: Serialize + DeserializeOwned + Default;

    fn construct(
        host: HostContext,
        package: PackageName,
        source: PathBuf,
        state: Option<Self::State>,
    ) -> Result<Self, LifecycleError>;

    fn serialize(&self) -> Self::State;

    fn destroy(&mut self) -> Result<(), LifecycleError>;
}

/// State persisted across editor restarts (no fields yet)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistableState {}

impl PersistableState {
    pub fn is_empty(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubStatus {
    Constructed,
    Destroyed,
}

/// Configuration schema declared by every scaffolded extension
pub fn config_schema() -> Result<ConfigSchema, SchemaError> {
    let mut schema = ConfigSchema::new();
    schema
        .declare(
            SHOW_WELCOME_OPTION,
            OptionDescriptor::boolean(
                true,
                "Show Welcome Tutorial",
                "Checking this will activate the welcome dialog one more time",
            ),
        )?
        .declare(
            GLOBAL_KEYMAPS_OPTION,
            OptionDescriptor::boolean(
                true,
                "Enable Global Keymaps",
                "Deselecting this will disable only some of the keymaps provided by this \
                 package. Only the ones associated with this package's modal dialog will remain.",
            ),
        )?;
    Ok(schema)
}

pub struct ExtensionStub {
    package: PackageName,
    source: PathBuf,
    host: HostContext,
    commands: Vec<CommandName>,
    status: StubStatus,
}

impl ExtensionStub {
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    /// Identity the host uses for bookkeeping (the extension's entry file)
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Commands this instance contributed and still owns
    pub fn commands(&self) -> &[CommandName] {
        &self.commands
    }

    pub fn status(&self) -> StubStatus {
        self.status
    }

    pub fn welcome_key(&self) -> Result<ConfigKey, NameError> {
        self.package.config_key(SHOW_WELCOME_OPTION)
    }

    fn register_run_tutorial(
        host: &HostContext,
        name: &CommandName,
        welcome: &ConfigKey,
    ) -> Result<(), HostError> {
        let config = Rc::clone(&host.config);
        let key = welcome.clone();
        let action: CommandAction = Box::new(move || {
            let mut store = config
                .try_borrow_mut()
                .map_err(|_| HostError::Busy("configuration store"))?;
            store.set(&key, ConfigValue::Bool(true))
        });

        host.commands
            .try_borrow_mut()
            .map_err(|_| HostError::Busy("command registry"))?
            .register_command(name.clone(), action)
    }

    fn unregister_all(&mut self) -> Result<(), HostError> {
        let mut registry = self
            .host
            .commands
            .try_borrow_mut()
            .map_err(|_| HostError::Busy("command registry"))?;

        // Commands that could not be removed stay owned so a retry can remove them
        let mut first_error = None;
        self.commands
            .retain(|name| match registry.unregister_command(name) {
                Ok(()) | Err(HostError::UnknownCommand(_)) => false,
                Err(err) => {
                    warn!("failed to unregister {name}: {err}");
                    first_error.get_or_insert(err);
                    true
                }
            });
        first_error.map_or(Ok(()), Err)
    }
}

impl Lifecycle for ExtensionStub {
    type State = PersistableState;

    fn construct(
        host: HostContext,
        package: PackageName,
        source: PathBuf,
        state: Option<PersistableState>,
    ) -> Result<Self, LifecycleError> {
        if state.is_some() {
            debug!("{package}: restoring persisted state (empty)");
        }

        let schema = config_schema()?;
        host.config
            .try_borrow_mut()
            .map_err(|_| HostError::Busy("configuration store"))?
            .declare_schema(&package, schema)?;

        let command = package.command(RUN_TUTORIAL_VERB)?;
        let welcome = package.config_key(SHOW_WELCOME_OPTION)?;
        Self::register_run_tutorial(&host, &command, &welcome)?;

        let mut stub = Self {
            package,
            source,
            host,
            commands: vec![command],
            status: StubStatus::Constructed,
        };

        let configured = stub
            .host
            .tutorial
            .try_borrow_mut()
            .map_err(|_| HostError::Busy("tutorial"))
            .and_then(|mut tutorial| tutorial.configure(&welcome));

        if let Err(err) = configured {
            // Leave the registry as it was before construction
            if let Err(cleanup) = stub.unregister_all() {
                warn!("{}: rollback after failed construction: {cleanup}", stub.package);
            }
            return Err(err.into());
        }

        info!(
            "{}: constructed ({} command(s) registered)",
            stub.package,
            stub.commands.len()
        );
        Ok(stub)
    }

    fn serialize(&self) -> PersistableState {
        PersistableState::default()
    }

    fn destroy(&mut self) -> Result<(), LifecycleError> {
        if self.status == StubStatus::Destroyed {
            return Err(LifecycleError::AlreadyDestroyed(self.package.clone()));
        }
        self.unregister_all()?;
        self.status = StubStatus::Destroyed;
        info!("{}: destroyed", self.package);
        Ok(())
    }
}
