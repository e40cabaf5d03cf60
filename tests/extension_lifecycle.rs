use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use stencil::extension::memory::{InMemoryCommandRegistry, InMemoryConfigStore, RecordingTutorial};
use stencil::extension::stub::{GLOBAL_KEYMAPS_OPTION, SHOW_WELCOME_OPTION};
use stencil::extension::{
    CommandName, ConfigKey, ConfigStore, ConfigValue, ExtensionStub, HostContext, HostError,
    Lifecycle, LifecycleError, PackageName, StubStatus,
};

struct Host {
    commands: Rc<RefCell<InMemoryCommandRegistry>>,
    config: Rc<RefCell<InMemoryConfigStore>>,
    tutorial: Rc<RefCell<RecordingTutorial>>,
}

fn host() -> Host {
    Host {
        commands: Rc::new(RefCell::new(InMemoryCommandRegistry::new())),
        config: Rc::new(RefCell::new(InMemoryConfigStore::new())),
        tutorial: Rc::new(RefCell::new(RecordingTutorial::new())),
    }
}

fn construct(host: &Host, package: &str) -> Result<ExtensionStub, LifecycleError> {
    let context = HostContext::new(
        host.commands.clone(),
        host.config.clone(),
        host.tutorial.clone(),
    );
    ExtensionStub::construct(
        context,
        PackageName::parse(package).expect("valid package"),
        PathBuf::from(format!("lib/{package}.js")),
        None,
    )
}

#[test]
fn my_ext_end_to_end() {
    let host = host();
    let mut stub = construct(&host, "my-ext").expect("construction");

    assert_eq!(
        host.commands.borrow().command_names(),
        vec!["my-ext:run-tutorial"]
    );

    let key = ConfigKey::parse("my-ext.showWelcomeOnActivation").expect("key");
    host.config
        .borrow_mut()
        .set(&key, ConfigValue::Bool(false))
        .expect("user dismisses tutorial");

    let command = CommandName::parse("my-ext:run-tutorial").expect("command");
    host.commands.borrow().invoke(&command).expect("invoke");
    assert_eq!(host.config.borrow().get(&key), Some(ConfigValue::Bool(true)));

    assert!(stub.serialize().is_empty());
    stub.destroy().expect("destroy");
    assert_eq!(stub.status(), StubStatus::Destroyed);
    assert!(host.commands.borrow().is_empty());
}

#[test]
fn host_sees_declared_schema_with_true_defaults() {
    let host = host();
    let _stub = construct(&host, "my-ext").expect("construction");

    let package = PackageName::parse("my-ext").unwrap();
    let store = host.config.borrow();
    let schema = store.schema(&package).expect("schema declared");
    assert_eq!(schema.names(), vec![SHOW_WELCOME_OPTION, GLOBAL_KEYMAPS_OPTION]);

    let keymaps = package.config_key(GLOBAL_KEYMAPS_OPTION).unwrap();
    assert_eq!(store.get(&keymaps), Some(ConfigValue::Bool(true)));
}

#[test]
fn independent_packages_share_one_host() {
    let host = host();
    let _a = construct(&host, "alpha").expect("alpha");
    let _b = construct(&host, "beta").expect("beta");

    assert_eq!(
        host.commands.borrow().command_names(),
        vec!["alpha:run-tutorial", "beta:run-tutorial"]
    );
    assert_eq!(host.tutorial.borrow().configured_keys().len(), 2);
}

#[test]
fn command_action_reports_busy_store_instead_of_panicking() {
    let host = host();
    let _stub = construct(&host, "my-ext").expect("construction");
    let command = CommandName::parse("my-ext:run-tutorial").unwrap();

    let _held = host.config.borrow();
    let err = host
        .commands
        .borrow()
        .invoke(&command)
        .expect_err("store is borrowed");
    assert_eq!(err, HostError::Busy("configuration store"));
}

#[test]
fn lifecycle_report_for_hyphenated_package() {
    let package = PackageName::parse("my-ext").expect("valid package");
    let report = stencil::extension::memory::run_lifecycle(&package, Some(false)).expect("run");

    assert_eq!(report.commands, vec!["my-ext:run-tutorial"]);
    assert_eq!(report.tutorial_keys, vec!["my-ext.showWelcomeOnActivation"]);
    assert_eq!(report.welcome_before, Some(ConfigValue::Bool(false)));
    assert_eq!(report.welcome_after, Some(ConfigValue::Bool(true)));
    assert_eq!(report.commands_after_destroy, 0);
    assert_eq!(serde_json::to_string(&report.state).unwrap(), "{}");
}
