use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sov_ballot_core::{
    Context, DefaultContext, MemoryStorage, Module, ModuleError, SlotHooks, Spec, Storage,
    WorkingSet,
};
use sov_voting::Voting;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::receipt::{CallReceipt, EventSubscriber};

type StorageOf<M> = <<M as Module>::Context as Spec>::Storage;
type AddressOf<M> = <<M as Module>::Context as Spec>::Address;

/// A ledger running the voting module.
pub type VotingLedger<C = DefaultContext> = Ledger<Voting<C>>;

struct LedgerState<S> {
    storage: S,
    committed_calls: u64,
}

/// Applies call messages of a single module one at a time and serves queries
/// against the committed state.
///
/// The slot time handed to the module never decreases, even when the clock
/// steps back or the work done at a later time was never committed.
pub struct Ledger<M: Module> {
    module: M,
    state: RwLock<LedgerState<StorageOf<M>>>,
    clock: Box<dyn Clock>,
    latest_slot_time: AtomicU64,
    subscribers: RwLock<Vec<Box<dyn EventSubscriber<M::Event>>>>,
}

impl<M> Ledger<M>
where
    M: Module + SlotHooks<Context = <M as Module>::Context>,
{
    /// Runs the module genesis on `storage` and commits the result.
    pub fn genesis<Cl>(
        module: M,
        config: &M::Config,
        storage: StorageOf<M>,
        clock: Cl,
    ) -> anyhow::Result<Self>
    where
        Cl: Clock + 'static,
    {
        let mut working_set = WorkingSet::new(storage.clone());
        module.begin_slot_hook(clock.now(), &mut working_set)?;
        <M as Module>::genesis(&module, config, &mut working_set)?;

        let mut checkpoint = working_set.checkpoint();
        storage.commit(checkpoint.freeze());
        info!("Genesis committed");

        Ok(Self::open(module, storage, clock))
    }

    /// Wraps a storage that already went through genesis.
    pub fn open<Cl>(module: M, storage: StorageOf<M>, clock: Cl) -> Self
    where
        Cl: Clock + 'static,
    {
        Self {
            module,
            state: RwLock::new(LedgerState {
                storage,
                committed_calls: 0,
            }),
            clock: Box::new(clock),
            latest_slot_time: AtomicU64::new(0),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// The module driven by this ledger.
    pub fn module(&self) -> &M {
        &self.module
    }

    /// Registers a subscriber for the events of every call committed from now on.
    pub fn subscribe<S>(&self, subscriber: S)
    where
        S: EventSubscriber<M::Event> + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(subscriber));
    }

    /// Commits the slot hook for the current clock reading and returns the
    /// resulting slot time.
    pub fn begin_slot(&self) -> Result<u64, ModuleError> {
        let state = self.write_state();
        self.commit_slot(&state.storage)
    }

    /// Applies `message` on behalf of `sender`.
    ///
    /// Either every write and event of the call is committed, or none is. The
    /// slot hook is committed on its own beforehand, so a rejected call still
    /// records the slot time it ran at.
    pub fn apply(
        &self,
        sender: AddressOf<M>,
        message: M::CallMessage,
    ) -> Result<CallReceipt<M::Event>, ModuleError> {
        let mut state = self.write_state();
        let timestamp = self.commit_slot(&state.storage)?;
        let context = <<M as Module>::Context as Context>::new(sender);

        debug!(?message, sender = %context.sender(), timestamp, "Applying call");
        let mut working_set = WorkingSet::new(state.storage.clone());
        match self.execute(message, &context, &mut working_set) {
            Ok(events) => {
                let mut checkpoint = working_set.checkpoint();
                state.storage.commit(checkpoint.freeze());

                let sequence = state.committed_calls;
                state.committed_calls += 1;
                info!(sequence, events = events.len(), "Call committed");

                self.notify(sequence, &events);
                Ok(CallReceipt {
                    sequence,
                    timestamp,
                    events,
                })
            }
            Err(err) => {
                working_set.revert();
                warn!(error = %err, sender = %context.sender(), "Call reverted");
                Err(err)
            }
        }
    }

    /// Evaluates `f` against a snapshot of the committed state. Nothing `f`
    /// writes is persisted.
    pub fn query<R, F>(&self, f: F) -> anyhow::Result<R>
    where
        F: FnOnce(&M, &mut WorkingSet<StorageOf<M>>) -> R,
    {
        let state = self.read_state();
        let mut working_set = WorkingSet::new(state.storage.clone());
        self.run_slot_hook(&mut working_set)?;
        Ok(f(&self.module, &mut working_set))
    }

    fn commit_slot(&self, storage: &StorageOf<M>) -> Result<u64, ModuleError> {
        let mut working_set = WorkingSet::new(storage.clone());
        let slot_time = self.run_slot_hook(&mut working_set)?;
        let mut checkpoint = working_set.checkpoint();
        storage.commit(checkpoint.freeze());
        Ok(slot_time)
    }

    fn run_slot_hook(&self, working_set: &mut WorkingSet<StorageOf<M>>) -> anyhow::Result<u64> {
        let now = self.clock.now();
        let timestamp = now.max(self.latest_slot_time.load(Ordering::SeqCst));
        if timestamp > now {
            debug!(now, timestamp, "Clock is behind the latest slot time");
        }

        let slot_time = self.module.begin_slot_hook(timestamp, working_set)?;
        self.latest_slot_time.fetch_max(slot_time, Ordering::SeqCst);
        Ok(slot_time)
    }

    fn execute(
        &self,
        message: M::CallMessage,
        context: &<M as Module>::Context,
        working_set: &mut WorkingSet<StorageOf<M>>,
    ) -> Result<Vec<M::Event>, ModuleError> {
        self.module.call(message, context, working_set)?;

        working_set
            .take_events()
            .iter()
            .map(|event| {
                event.decode::<M::Event>().map_err(|err| {
                    ModuleError::from(
                        anyhow::Error::new(err)
                            .context(format!("Malformed event {}", event.key())),
                    )
                })
            })
            .collect()
    }

    fn notify(&self, sequence: u64, events: &[M::Event]) {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for event in events {
            for subscriber in subscribers.iter() {
                subscriber.on_event(sequence, event);
            }
        }
    }

}

impl<M: Module> Ledger<M> {
    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState<StorageOf<M>>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState<StorageOf<M>>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M> Ledger<M>
where
    M: Module,
    M::Context: Spec<Storage = MemoryStorage>,
{
    /// A copy of the committed state. Writes to it never reach the ledger.
    pub fn snapshot(&self) -> MemoryStorage {
        self.read_state().storage.snapshot()
    }

    /// Writes the committed state to `path`.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        self.read_state().storage.save_to(path)
    }
}

impl<M: Module> fmt::Debug for Ledger<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self
            .subscribers
            .read()
            .map(|subscribers| subscribers.len())
            .unwrap_or_default();
        f.debug_struct("Ledger")
            .field("subscribers", &subscribers)
            .finish_non_exhaustive()
    }
}
