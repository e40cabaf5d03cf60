//! Extension module - Contract of the scaffolded editor extension
//!
//! An extension never owns the host registries. It receives handles to them
//! through [`host::HostContext`] and only contributes entries.

pub mod host;
pub mod memory;
pub mod names;
pub mod schema;
pub mod stub;

pub use host::{CommandRegistry, ConfigStore, HostContext, HostError, TutorialHook};
pub use names::{CommandName, ConfigKey, NameError, PackageName};
pub use schema::{ConfigSchema, ConfigValue, OptionDescriptor, OptionType, SchemaError};
pub use stub::{ExtensionStub, Lifecycle, LifecycleError, PersistableState, StubStatus};
