use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use sov_ballot_core::{Context, Module, WorkingSet};
use tracing::info;

use crate::types::Candidate;
use crate::Voting;

/// A candidate registered at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Voting power granted at genesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "C::Address: serde::Serialize + serde::de::DeserializeOwned")]
pub struct VoterPowerConfig<C: Context> {
    /// The voter.
    pub voter: C::Address,
    /// The granted power.
    pub power: u64,
}

/// Initial configuration for the `sov-voting` module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "C::Address: serde::Serialize + serde::de::DeserializeOwned")]
pub struct VotingConfig<C: Context> {
    /// The only identity allowed to run admin operations.
    pub admin: C::Address,
    /// Minimum voting power required to cast a vote.
    #[serde(default)]
    pub minimum_voting_power: u64,
    /// When set, anyone may add candidates before a round starts.
    #[serde(default)]
    pub can_voters_add_candidates: bool,
    /// Candidates registered before any call runs, in id order.
    #[serde(default)]
    pub candidates: Vec<CandidateConfig>,
    /// Voting power granted before any call runs.
    #[serde(default)]
    pub voting_power: Vec<VoterPowerConfig<C>>,
}

impl<C: Context> Voting<C> {
    pub(crate) fn init_module(
        &self,
        config: &<Self as Module>::Config,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<()> {
        if self.admin.get(working_set).is_some() {
            bail!("Voting module is already initialized");
        }

        self.admin.set(&config.admin, working_set);
        self.minimum_voting_power
            .set(&config.minimum_voting_power, working_set);
        self.can_voters_add_candidates
            .set(&config.can_voters_add_candidates, working_set);
        self.voting_started.set(&false, working_set);
        self.emergency_stop.set(&false, working_set);

        for candidate in &config.candidates {
            let id = self.candidates.len(working_set);
            self.candidates.push(
                &Candidate::new(id, candidate.name.clone(), candidate.description.clone()),
                working_set,
            );
        }

        for grant in &config.voting_power {
            let mut record = self.voters.get(&grant.voter, working_set).unwrap_or_default();
            record.voting_power = grant.power;
            self.voters.set(&grant.voter, &record, working_set);
        }

        info!(
            admin = %config.admin,
            minimum_voting_power = config.minimum_voting_power,
            can_voters_add_candidates = config.can_voters_add_candidates,
            candidates = config.candidates.len(),
            "Voting module initialized"
        );
        Ok(())
    }
}
