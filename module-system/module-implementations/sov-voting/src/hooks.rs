use sov_ballot_core::{Context, SlotHooks, Spec, WorkingSet};
use tracing::warn;

use crate::Voting;

impl<C: Context> SlotHooks for Voting<C> {
    type Context = C;

    fn begin_slot_hook(
        &self,
        timestamp: u64,
        working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> anyhow::Result<u64> {
        let current = self.chain_time.get(working_set).unwrap_or_default();

        if timestamp > current {
            self.chain_time.set(&timestamp, working_set);
            return Ok(timestamp);
        }
        if timestamp < current {
            warn!(timestamp, current, "Ignoring timestamp older than the chain time");
        }
        Ok(current)
    }
}

impl<C: Context> Voting<C> {
    /// The chain time every temporal check compares against.
    pub(crate) fn now(&self, working_set: &mut WorkingSet<C::Storage>) -> u64 {
        self.chain_time.get(working_set).unwrap_or_default()
    }
}
