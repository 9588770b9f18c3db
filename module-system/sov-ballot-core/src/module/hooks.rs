use crate::module::{Context, Spec};
use crate::storage::WorkingSet;

/// Hooks that execute at the beginning of every slot, before any transaction
/// or query of that slot sees the state.
pub trait SlotHooks {
    /// Execution context.
    type Context: Context;

    /// Runs with the timestamp (in seconds) of the ledger clock for the slot
    /// and returns the slot time the state carries afterwards.
    fn begin_slot_hook(
        &self,
        timestamp: u64,
        working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> anyhow::Result<u64>;
}
