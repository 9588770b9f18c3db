//! Traits implemented by ledger modules.

use std::fmt::Debug;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::common::{ModuleError, ModulePrefix};
use crate::storage::WorkingSet;

mod hooks;
mod spec;

pub use hooks::SlotHooks;
pub use spec::{Context, DefaultContext, Spec};

/// Returned by a successful [`Module::call`]. Results are reported through events.
#[derive(Default, Debug)]
pub struct CallResponse {}

/// A state machine living under its own storage prefix.
///
/// The module is set up once by [`Module::genesis`], after which every state
/// change goes through [`Module::call`]. A call that returns an error must be
/// reverted by the caller, together with any event it emitted.
pub trait Module {
    /// Execution context.
    type Context: Context;

    /// Genesis configuration.
    type Config;

    /// The messages accepted by [`Module::call`].
    type CallMessage: Debug + BorshSerialize + BorshDeserialize;

    /// The events emitted into the working set.
    type Event: Debug + BorshSerialize + BorshDeserialize;

    /// Writes the initial state.
    fn genesis(
        &self,
        _config: &Self::Config,
        _working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<(), ModuleError> {
        Ok(())
    }

    /// Handles `message` sent by `context.sender()`.
    fn call(
        &self,
        message: Self::CallMessage,
        context: &Self::Context,
        working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<CallResponse, ModuleError>;
}

/// Exposes the [JSON Schema](https://json-schema.org/) of [`Module::CallMessage`]
/// for CLIs and documentation.
pub trait ModuleCallJsonSchema: Module {
    /// The schema, pretty printed.
    fn json_schema() -> String;
}

/// Identity of a module instance.
pub trait ModuleInfo {
    /// Execution context.
    type Context: Context;

    /// The module address, derived from its prefix.
    fn address(&self) -> &<Self::Context as Spec>::Address;

    /// The prefix every state item of the module lives under.
    fn prefix(&self) -> ModulePrefix;
}

/// One-time initialization, implemented for every [`Module`].
pub trait Genesis {
    /// Execution context.
    type Context: Context;

    /// Genesis configuration.
    type Config;

    /// Writes the initial state.
    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<(), ModuleError>;
}

impl<T: Module> Genesis for T {
    type Context = <T as Module>::Context;
    type Config = <T as Module>::Config;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<(), ModuleError> {
        <T as Module>::genesis(self, config, working_set)
    }
}
