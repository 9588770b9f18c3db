#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
mod call;
mod error;
mod event;
mod genesis;
mod hooks;
mod query;
mod types;


pub use call::CallMessage;
pub use error::VotingError;
pub use event::VotingEvent;
pub use genesis::{CandidateConfig, VoterPowerConfig, VotingConfig};
pub use query::*;
pub use types::Candidate;
use sov_ballot_core::{
    CallResponse, Context, Module, ModuleCallJsonSchema, ModuleError, ModuleInfo, ModulePrefix,
    Prefix, StateMap, StateValue, StateVec, WorkingSet,
};
use types::VoterRecord;

const MODULE_NAME: &str = "Voting";

/// The voting ledger module.
///
/// All state lives in the working set under the module's prefixes, so one
/// `Voting` value can serve any number of independent storages.
#[derive(Clone, Debug)]
pub struct Voting<C: Context> {
    /// Address of the module.
    pub address: C::Address,

    /// The identity allowed to run admin operations. Set once at genesis.
    pub(crate) admin: StateValue<C::Address>,

    /// Minimum power a voter needs to cast a vote. Set once at genesis.
    pub(crate) minimum_voting_power: StateValue<u64>,

    /// Whether anyone may add candidates. Set once at genesis.
    pub(crate) can_voters_add_candidates: StateValue<bool>,

    pub(crate) candidates: StateVec<Candidate>,

    pub(crate) voters: StateMap<C::Address, VoterRecord>,

    pub(crate) voting_started: StateValue<bool>,

    /// Only meaningful while `voting_started` is set.
    pub(crate) voting_end_time: StateValue<u64>,

    pub(crate) emergency_stop: StateValue<bool>,

    /// Latest timestamp received from the slot hook. Never decreases.
    pub(crate) chain_time: StateValue<u64>,
}

fn storage_prefix(storage_name: &'static str) -> Prefix {
    ModulePrefix::new_storage(module_path!(), MODULE_NAME, storage_name).into()
}

impl<C: Context> Default for Voting<C> {
    fn default() -> Self {
        let module_prefix = ModulePrefix::new_module(module_path!(), MODULE_NAME);
        let address_bytes: [u8; 32] = module_prefix.hash::<C::Hasher>().into();

        Self {
            address: C::Address::from(address_bytes),
            admin: StateValue::new(storage_prefix("admin")),
            minimum_voting_power: StateValue::new(storage_prefix("minimum_voting_power")),
            can_voters_add_candidates: StateValue::new(storage_prefix(
                "can_voters_add_candidates",
            )),
            candidates: StateVec::new(storage_prefix("candidates")),
            voters: StateMap::new(storage_prefix("voters")),
            voting_started: StateValue::new(storage_prefix("voting_started")),
            voting_end_time: StateValue::new(storage_prefix("voting_end_time")),
            emergency_stop: StateValue::new(storage_prefix("emergency_stop")),
            chain_time: StateValue::new(storage_prefix("chain_time")),
        }
    }
}

impl<C: Context> ModuleInfo for Voting<C> {
    type Context = C;

    fn address(&self) -> &C::Address {
        &self.address
    }

    fn prefix(&self) -> ModulePrefix {
        ModulePrefix::new_module(module_path!(), MODULE_NAME)
    }
}

impl<C: Context> Module for Voting<C> {
    type Context = C;

    type Config = VotingConfig<C>;

    type CallMessage = CallMessage<C>;

    type Event = VotingEvent<C>;

    fn genesis(
        &self,
        config: &Self::Config,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<(), ModuleError> {
        Ok(self.init_module(config, working_set)?)
    }

    fn call(
        &self,
        msg: Self::CallMessage,
        context: &Self::Context,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse, ModuleError> {
        match msg {
            CallMessage::AddCandidate { name, description } => {
                Ok(self.add_candidate(name, description, context, working_set)?)
            }

            CallMessage::AssignVotingPower { voter, power } => {
                Ok(self.assign_voting_power(voter, power, context, working_set)?)
            }

            CallMessage::SetVoterBlacklist { voter, blacklisted } => {
                Ok(self.set_voter_blacklist(voter, blacklisted, context, working_set)?)
            }

            CallMessage::StartVoting { duration_seconds } => {
                Ok(self.start_voting(duration_seconds, context, working_set)?)
            }

            CallMessage::ToggleEmergencyStop => {
                Ok(self.toggle_emergency_stop(context, working_set)?)
            }

            CallMessage::ResetVotingState => Ok(self.reset_voting_state(context, working_set)?),

            CallMessage::Vote { candidate_id } => {
                Ok(self.vote(candidate_id, context, working_set)?)
            }

            CallMessage::RevokeVote => Ok(self.revoke_vote(context, working_set)?),
        }
    }
}

impl<C: Context> ModuleCallJsonSchema for Voting<C> {
    fn json_schema() -> String {
        let schema = schemars::gen::SchemaGenerator::default()
            .into_root_schema_for::<CallMessage<C>>();
        serde_json::to_string_pretty(&schema).unwrap_or_default()
    }
}
