#![allow(dead_code)]

use sov_ballot_core::utils::generate_address;
use sov_ballot_core::{
    Context, DefaultContext, Event, Genesis, MemoryStorage, Module, ModuleError, SlotHooks, Spec,
    Storage, WorkingSet,
};
use sov_voting::{CallMessage, Voting, VotingConfig, VotingError, VotingEvent};

pub type C = DefaultContext;
pub type Address = <C as Spec>::Address;

/// Runs the voting module against committed storage, one working set per call,
/// the same way the ledger does.
pub struct TestVoting {
    pub module: Voting<C>,
    pub storage: MemoryStorage,
    pub admin: Address,
    now: u64,
}

impl TestVoting {
    pub fn new(minimum_voting_power: u64, can_voters_add_candidates: bool) -> Self {
        let admin = generate_address::<C>("admin");
        Self::with_config(VotingConfig {
            admin,
            minimum_voting_power,
            can_voters_add_candidates,
            candidates: vec![],
            voting_power: vec![],
        })
    }

    pub fn with_config(config: VotingConfig<C>) -> Self {
        let module = Voting::<C>::default();
        let storage = MemoryStorage::new();

        let mut working_set = WorkingSet::new(storage.clone());
        Genesis::genesis(&module, &config, &mut working_set).unwrap();
        let mut checkpoint = working_set.checkpoint();
        storage.commit(checkpoint.freeze());

        Self {
            module,
            storage,
            admin: config.admin,
            now: 1_000,
        }
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn advance(&mut self, seconds: u64) {
        self.now += seconds;
    }

    pub fn call(
        &self,
        sender: &Address,
        msg: CallMessage<C>,
    ) -> Result<Vec<VotingEvent<C>>, ModuleError> {
        let mut working_set = WorkingSet::new(self.storage.clone());
        self.module
            .begin_slot_hook(self.now, &mut working_set)
            .map_err(ModuleError::from)?;

        match self.module.call(msg, &C::new(*sender), &mut working_set) {
            Ok(_) => {
                let events = working_set.take_events();
                let mut checkpoint = working_set.checkpoint();
                self.storage.commit(checkpoint.freeze());
                Ok(events.iter().map(decode).collect())
            }
            Err(err) => {
                let mut checkpoint = working_set.revert();
                self.storage.commit(checkpoint.freeze());
                Err(err)
            }
        }
    }

    pub fn admin_call(&self, msg: CallMessage<C>) -> Vec<VotingEvent<C>> {
        let admin = self.admin;
        self.call(&admin, msg).unwrap()
    }

    pub fn query<R>(&self, f: impl FnOnce(&Voting<C>, &mut WorkingSet<MemoryStorage>) -> R) -> R {
        let mut working_set = WorkingSet::new(self.storage.clone());
        self.module
            .begin_slot_hook(self.now, &mut working_set)
            .unwrap();
        f(&self.module, &mut working_set)
    }

    pub fn add_candidate(&self, name: &str) {
        self.admin_call(CallMessage::AddCandidate {
            name: name.to_owned(),
            description: format!("{name} description"),
        });
    }

    pub fn assign_power(&self, voter: &Address, power: u64) {
        self.admin_call(CallMessage::AssignVotingPower {
            voter: *voter,
            power,
        });
    }

    pub fn start(&self, duration_seconds: u64) {
        self.admin_call(CallMessage::StartVoting { duration_seconds });
    }

    pub fn vote(
        &self,
        voter: &Address,
        candidate_id: u64,
    ) -> Result<Vec<VotingEvent<C>>, ModuleError> {
        self.call(voter, CallMessage::Vote { candidate_id })
    }

    pub fn revoke(&self, voter: &Address) -> Result<Vec<VotingEvent<C>>, ModuleError> {
        self.call(voter, CallMessage::RevokeVote)
    }

    pub fn results(&self) -> (u64, Vec<u64>) {
        let results = self.query(|voting, ws| voting.voting_results(ws));
        (results.total_votes, results.vote_counts)
    }
}

fn decode(event: &Event) -> VotingEvent<C> {
    event.decode().unwrap()
}

pub fn user(seed: &str) -> Address {
    generate_address::<C>(seed)
}

pub fn voting_error(err: &ModuleError) -> VotingError<Address> {
    err.downcast_ref::<VotingError<Address>>()
        .cloned()
        .unwrap_or_else(|| panic!("expected a voting error, got: {err}"))
}

pub fn expect_err(result: Result<Vec<VotingEvent<C>>, ModuleError>) -> VotingError<Address> {
    voting_error(&result.unwrap_err())
}
