//! Read-only views of the voting state.

use sov_ballot_core::{Context, WorkingSet};

use crate::types::Candidate;
use crate::{Voting, VotingError};

/// Voting information of a single address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct VoterInfo {
    /// Whether a vote is currently counted.
    pub has_voted: bool,
    /// The backed candidate. Zero when `has_voted` is false.
    pub voted_candidate_id: u64,
    /// Current voting power.
    pub voting_power: u64,
    /// Whether the voter is blacklisted.
    pub is_blacklisted: bool,
}

/// Live tallies of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct VotingResults {
    /// Sum of `vote_counts`.
    pub total_votes: u64,
    /// Tally of every candidate, indexed by id.
    pub vote_counts: Vec<u64>,
}

/// Snapshot of the round flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct RoundStatus {
    /// Set by `StartVoting`, cleared by `ResetVotingState`.
    pub voting_started: bool,
    /// End of the current or last round, when one was started.
    pub voting_end_time: Option<u64>,
    /// Whether the emergency stop is active.
    pub emergency_stop: bool,
    /// Seconds left in the round, zero when no round is running.
    pub remaining_time: u64,
    /// Chain time the snapshot was taken at.
    pub now: u64,
}

/// Configuration fixed at genesis.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(bound = "C::Address: serde::Serialize + serde::de::DeserializeOwned")]
pub struct VotingConfigResponse<C: Context> {
    /// The admin identity.
    pub admin: C::Address,
    /// Minimum voting power required to vote.
    pub minimum_voting_power: u64,
    /// Whether anyone may add candidates.
    pub can_voters_add_candidates: bool,
}

impl<C: Context> Voting<C> {
    /// Returns the candidate with the given id.
    pub fn candidate(
        &self,
        id: u64,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<Candidate, VotingError<C::Address>> {
        self.candidates
            .get(id, working_set)
            .ok_or(VotingError::InvalidCandidateId(id))
    }

    /// Returns the number of registered candidates.
    pub fn candidates_count(&self, working_set: &mut WorkingSet<C::Storage>) -> u64 {
        self.candidates.len(working_set)
    }

    /// Returns every candidate in id order.
    pub fn candidates(&self, working_set: &mut WorkingSet<C::Storage>) -> Vec<Candidate> {
        self.candidates.iter(working_set).collect()
    }

    /// Returns the voting information of `voter`. Unknown addresses get the defaults.
    pub fn voter_info(
        &self,
        voter: &C::Address,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> VoterInfo {
        let record = self.voters.get(voter, working_set).unwrap_or_default();
        VoterInfo {
            has_voted: record.has_voted,
            voted_candidate_id: record.voted_candidate_id,
            voting_power: record.voting_power,
            is_blacklisted: record.is_blacklisted,
        }
    }

    /// Seconds until the round ends, or zero when no round is running.
    pub fn remaining_time(&self, working_set: &mut WorkingSet<C::Storage>) -> u64 {
        if !self.voting_started.get(working_set).unwrap_or_default() {
            return 0;
        }
        let end_time = self.voting_end_time.get(working_set).unwrap_or_default();
        end_time.saturating_sub(self.now(working_set))
    }

    /// Returns the live tallies.
    pub fn voting_results(&self, working_set: &mut WorkingSet<C::Storage>) -> VotingResults {
        let vote_counts: Vec<u64> = self
            .candidates
            .iter(working_set)
            .map(|candidate| candidate.vote_count)
            .collect();
        let total_votes = vote_counts
            .iter()
            .fold(0u64, |total, count| total.saturating_add(*count));

        VotingResults {
            total_votes,
            vote_counts,
        }
    }

    /// Returns the round flags and the time left.
    pub fn round_status(&self, working_set: &mut WorkingSet<C::Storage>) -> RoundStatus {
        RoundStatus {
            voting_started: self.voting_started.get(working_set).unwrap_or_default(),
            voting_end_time: self.voting_end_time.get(working_set),
            emergency_stop: self.emergency_stop.get(working_set).unwrap_or_default(),
            remaining_time: self.remaining_time(working_set),
            now: self.now(working_set),
        }
    }

    /// Returns the configuration set at genesis.
    pub fn voting_config(
        &self,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> anyhow::Result<VotingConfigResponse<C>> {
        Ok(VotingConfigResponse {
            admin: self.admin.get_or_err(working_set)?,
            minimum_voting_power: self.minimum_voting_power.get(working_set).unwrap_or_default(),
            can_voters_add_candidates: self
                .can_voters_add_candidates
                .get(working_set)
                .unwrap_or_default(),
        })
    }

    /// Returns the candidate with the highest tally. Ties go to the lowest id.
    pub fn leading_candidate(
        &self,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Option<Candidate> {
        self.candidates
            .iter(working_set)
            .reduce(|best, candidate| {
                if candidate.vote_count > best.vote_count {
                    candidate
                } else {
                    best
                }
            })
    }
}
