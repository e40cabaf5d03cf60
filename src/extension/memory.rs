//! In-memory host implementations
//!
//! Used by `stencil run` to drive an extension through its lifecycle and by
//! the tests as substitutes for a real editor host.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use log::debug;

use crate::extension::host::{
    CommandAction, CommandRegistry, ConfigStore, HostContext, HostError, TutorialHook,
};
use crate::extension::names::{CommandName, ConfigKey, PackageName};
use crate::extension::schema::{ConfigSchema, ConfigValue};
use crate::extension::stub::{ExtensionStub, Lifecycle, LifecycleError, PersistableState};

#[derive(Default)]
pub struct InMemoryCommandRegistry {
    commands: BTreeMap<CommandName, CommandAction>,
}

impl InMemoryCommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches a command synchronously
    pub fn invoke(&self, name: &CommandName) -> Result<(), HostError> {
        let action = self
            .commands
            .get(name)
            .ok_or_else(|| HostError::UnknownCommand(name.clone()))?;
        debug!("dispatching {name}");
        action()
    }

    pub fn command_names(&self) -> Vec<String> {
        self.commands.keys().map(ToString::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandRegistry for InMemoryCommandRegistry {
    fn register_command(
        &mut self,
        name: CommandName,
        action: CommandAction,
    ) -> Result<(), HostError> {
        if self.commands.contains_key(&name) {
            return Err(HostError::DuplicateCommand(name));
        }
        debug!("registered {name}");
        self.commands.insert(name, action);
        Ok(())
    }

    fn unregister_command(&mut self, name: &CommandName) -> Result<(), HostError> {
        self.commands
            .remove(name)
            .map(|_| debug!("unregistered {name}"))
            .ok_or_else(|| HostError::UnknownCommand(name.clone()))
    }

    fn contains(&self, name: &CommandName) -> bool {
        self.commands.contains_key(name)
    }
}

/// Configuration store validating writes against declared schemas
///
/// Keys of packages that never declared a schema are stored unchecked.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    schemas: BTreeMap<PackageName, ConfigSchema>,
    values: BTreeMap<ConfigKey, ConfigValue>,
    writes: usize,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(&self, package: &PackageName) -> Option<&ConfigSchema> {
        self.schemas.get(package)
    }

    /// Number of successful `set` calls
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn declare_schema(
        &mut self,
        package: &PackageName,
        schema: ConfigSchema,
    ) -> Result<(), HostError> {
        match self.schemas.get(package) {
            // Reloading the same package declares the same schema again
            Some(existing) if *existing == schema => Ok(()),
            Some(_) => Err(HostError::DuplicateSchema(package.clone())),
            None => {
                self.schemas.insert(package.clone(), schema);
                Ok(())
            }
        }
    }

    fn set(&mut self, key: &ConfigKey, value: ConfigValue) -> Result<(), HostError> {
        if let Some(schema) = self.schemas.get(key.package()) {
            schema
                .validate(key.option(), &value)
                .map_err(|source| HostError::InvalidConfig {
                    key: key.clone(),
                    source,
                })?;
        }
        self.values.insert(key.clone(), value);
        self.writes += 1;
        Ok(())
    }

    fn get(&self, key: &ConfigKey) -> Option<ConfigValue> {
        self.values.get(key).copied().or_else(|| {
            self.schemas
                .get(key.package())
                .and_then(|schema| schema.get(key.option()))
                .map(|descriptor| descriptor.default)
        })
    }
}

/// Tutorial collaborator recording the keys it was wired to
#[derive(Debug, Default)]
pub struct RecordingTutorial {
    keys: Vec<ConfigKey>,
}

impl RecordingTutorial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configured_keys(&self) -> Vec<String> {
        self.keys.iter().map(ToString::to_string).collect()
    }
}

impl TutorialHook for RecordingTutorial {
    fn configure(&mut self, config_key: &ConfigKey) -> Result<(), HostError> {
        self.keys.push(config_key.clone());
        Ok(())
    }
}

/// Host assembled from the in-memory implementations
#[derive(Clone, Default)]
pub struct MemoryHost {
    pub commands: Rc<RefCell<InMemoryCommandRegistry>>,
    pub config: Rc<RefCell<InMemoryConfigStore>>,
    pub tutorial: Rc<RefCell<RecordingTutorial>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> HostContext {
        HostContext::new(
            self.commands.clone(),
            self.config.clone(),
            self.tutorial.clone(),
        )
    }
}

/// What one construct / invoke / serialize / destroy pass observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleReport {
    /// Commands registered after construction
    pub commands: Vec<String>,
    /// Keys the tutorial was wired to
    pub tutorial_keys: Vec<String>,
    pub welcome_key: ConfigKey,
    /// Welcome flag before the commands ran
    pub welcome_before: Option<ConfigValue>,
    /// Welcome flag after every command ran once
    pub welcome_after: Option<ConfigValue>,
    pub state: PersistableState,
    /// Commands still registered once the extension is destroyed
    pub commands_after_destroy: usize,
    pub writes: usize,
}

/// Drives one extension through its whole lifecycle on a fresh in-memory host
///
/// `welcome` presets the welcome flag before any command is invoked.
pub fn run_lifecycle(
    package: &PackageName,
    welcome: Option<bool>,
) -> Result<LifecycleReport, LifecycleError> {
    let host = MemoryHost::new();
    let source = PathBuf::from("lib").join(format!("{package}.js"));
    let mut stub = ExtensionStub::construct(host.context(), package.clone(), source, None)?;

    let commands = host.commands.borrow().command_names();
    let tutorial_keys = host.tutorial.borrow().configured_keys();

    let welcome_key = stub.welcome_key()?;
    if let Some(value) = welcome {
        host.config
            .borrow_mut()
            .set(&welcome_key, ConfigValue::Bool(value))?;
    }
    let welcome_before = host.config.borrow().get(&welcome_key);

    for name in stub.commands() {
        debug!("invoking {name}");
        host.commands.borrow().invoke(name)?;
    }
    let welcome_after = host.config.borrow().get(&welcome_key);

    let state = stub.serialize();
    stub.destroy()?;
    debug!("lifecycle of {package} completed");

    let commands_after_destroy = host.commands.borrow().len();
    let writes = host.config.borrow().write_count();
    Ok(LifecycleReport {
        commands,
        tutorial_keys,
        welcome_key,
        welcome_before,
        welcome_after,
        state,
        commands_after_destroy,
        writes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::schema::{OptionDescriptor, SchemaError};

    fn package() -> PackageName {
        PackageName::parse("demo").unwrap()
    }

    fn schema() -> ConfigSchema {
        let mut schema = ConfigSchema::new();
        schema
            .declare("flag", OptionDescriptor::boolean(false, "Flag", ""))
            .unwrap();
        schema
    }

    #[test]
    fn rejects_duplicate_registration() {
        let mut registry = InMemoryCommandRegistry::new();
        let name = package().command("go").unwrap();
        registry
            .register_command(name.clone(), Box::new(|| Ok(())))
            .unwrap();
        let err = registry
            .register_command(name.clone(), Box::new(|| Ok(())))
            .expect_err("duplicate must fail");
        assert_eq!(err, HostError::DuplicateCommand(name));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invoking_unknown_command_fails() {
        let registry = InMemoryCommandRegistry::new();
        let name = package().command("missing").unwrap();
        assert_eq!(
            registry.invoke(&name),
            Err(HostError::UnknownCommand(name.clone()))
        );
    }

    #[test]
    fn get_falls_back_to_schema_default() {
        let mut store = InMemoryConfigStore::new();
        store.declare_schema(&package(), schema()).unwrap();
        let key = package().config_key("flag").unwrap();

        assert_eq!(store.get(&key), Some(ConfigValue::Bool(false)));
        store.set(&key, ConfigValue::Bool(true)).unwrap();
        assert_eq!(store.get(&key), Some(ConfigValue::Bool(true)));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn rejects_writes_to_undeclared_options() {
        let mut store = InMemoryConfigStore::new();
        store.declare_schema(&package(), schema()).unwrap();
        let key = package().config_key("other").unwrap();

        let err = store
            .set(&key, ConfigValue::Bool(true))
            .expect_err("unknown option must fail");
        assert_eq!(
            err,
            HostError::InvalidConfig {
                key,
                source: SchemaError::UnknownOption("other".to_string()),
            }
        );
    }

    #[test]
    fn conflicting_schema_is_rejected() {
        let mut store = InMemoryConfigStore::new();
        store.declare_schema(&package(), schema()).unwrap();
        store.declare_schema(&package(), schema()).unwrap();

        let err = store
            .declare_schema(&package(), ConfigSchema::new())
            .expect_err("different schema must fail");
        assert_eq!(err, HostError::DuplicateSchema(package()));
    }

    #[test]
    fn lifecycle_run_reports_each_phase() {
        let report = run_lifecycle(&package(), None).unwrap();
        assert_eq!(report.commands, vec!["demo:run-tutorial"]);
        assert_eq!(report.tutorial_keys, vec!["demo.showWelcomeOnActivation"]);
        assert_eq!(report.welcome_key.to_string(), "demo.showWelcomeOnActivation");
        assert_eq!(report.welcome_before, Some(ConfigValue::Bool(true)));
        assert_eq!(report.welcome_after, Some(ConfigValue::Bool(true)));
        assert!(report.state.is_empty());
        assert_eq!(report.commands_after_destroy, 0);
        assert_eq!(report.writes, 1);
    }

    #[test]
    fn lifecycle_run_turns_welcome_back_on() {
        let report = run_lifecycle(&package(), Some(false)).unwrap();
        assert_eq!(report.welcome_before, Some(ConfigValue::Bool(false)));
        assert_eq!(report.welcome_after, Some(ConfigValue::Bool(true)));
        assert_eq!(report.writes, 2);
    }

    #[test]
    fn memory_host_context_shares_handles() {
        let host = MemoryHost::new();
        let name = package().command("go").unwrap();
        host.context()
            .commands
            .borrow_mut()
            .register_command(name.clone(), Box::new(|| Ok(())))
            .unwrap();
        assert!(host.commands.borrow().contains(&name));
    }
}
