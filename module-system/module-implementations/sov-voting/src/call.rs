use anyhow::{ensure, Result};
use sov_ballot_core::{CallResponse, Context, WorkingSet};
use tracing::{debug, info};

use crate::event::VotingEvent;
use crate::types::Candidate;
use crate::{Voting, VotingError};

/// The call messages accepted by the `sov-voting` module.
#[derive(
    borsh::BorshDeserialize,
    borsh::BorshSerialize,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
    Debug,
    PartialEq,
    Clone,
)]
#[serde(bound = "C::Address: serde::Serialize + serde::de::DeserializeOwned")]
#[schemars(bound = "C::Address: ::schemars::JsonSchema", rename = "CallMessage")]
pub enum CallMessage<C: Context> {
    /// Appends a candidate. Allowed for the admin, or for anyone when voters may add candidates.
    AddCandidate {
        /// Display name.
        name: String,
        /// Free-form description.
        description: String,
    },
    /// Replaces the voting power of a voter. Admin only.
    AssignVotingPower {
        /// The voter.
        voter: C::Address,
        /// The new power.
        power: u64,
    },
    /// Sets or clears the blacklist flag of a voter. Admin only.
    SetVoterBlacklist {
        /// The voter.
        voter: C::Address,
        /// The new flag.
        blacklisted: bool,
    },
    /// Opens a round lasting `duration_seconds` from the current chain time. Admin only.
    StartVoting {
        /// Length of the round.
        duration_seconds: u64,
    },
    /// Flips the emergency stop. Admin only.
    ToggleEmergencyStop,
    /// Clears the round flags once no round is running. Admin only.
    ResetVotingState,
    /// Counts the sender's voting power for a candidate.
    Vote {
        /// The chosen candidate.
        candidate_id: u64,
    },
    /// Withdraws the sender's vote.
    RevokeVote,
}

impl<C: Context> Voting<C> {
    pub(crate) fn add_candidate(
        &self,
        name: String,
        description: String,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        let sender = context.sender();
        let may_add = self.is_admin(sender, working_set)?
            || self
                .can_voters_add_candidates
                .get(working_set)
                .unwrap_or_default();
        ensure!(may_add, VotingError::NotAuthorized(sender.clone()));
        ensure!(
            !self.voting_started.get(working_set).unwrap_or_default(),
            VotingError::<C::Address>::VotingAlreadyStarted
        );

        let id = self.candidates.len(working_set);
        let candidate = Candidate::new(id, name.clone(), description);
        self.candidates.push(&candidate, working_set);

        info!(id, %name, added_by = %sender, "Candidate added");
        self.emit(
            VotingEvent::CandidateAdded {
                id,
                name,
                added_by: sender.clone(),
            },
            working_set,
        );
        Ok(CallResponse::default())
    }

    pub(crate) fn assign_voting_power(
        &self,
        voter: C::Address,
        power: u64,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.exit_if_not_admin(context, working_set)?;

        let mut record = self.voters.get(&voter, working_set).unwrap_or_default();
        ensure!(!record.has_voted, VotingError::VotingPowerLocked(voter));

        record.voting_power = power;
        self.voters.set(&voter, &record, working_set);

        debug!(%voter, power, "Voting power assigned");
        self.emit(VotingEvent::VotingPowerAssigned { voter, power }, working_set);
        Ok(CallResponse::default())
    }

    pub(crate) fn set_voter_blacklist(
        &self,
        voter: C::Address,
        blacklisted: bool,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.exit_if_not_admin(context, working_set)?;

        let mut record = self.voters.get(&voter, working_set).unwrap_or_default();
        record.is_blacklisted = blacklisted;
        self.voters.set(&voter, &record, working_set);

        debug!(%voter, blacklisted, "Blacklist updated");
        self.emit(
            VotingEvent::VoterBlacklistUpdated { voter, blacklisted },
            working_set,
        );
        Ok(CallResponse::default())
    }

    pub(crate) fn start_voting(
        &self,
        duration_seconds: u64,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.exit_if_not_admin(context, working_set)?;
        ensure!(
            self.remaining_time(working_set) == 0,
            VotingError::<C::Address>::VotingAlreadyStarted
        );
        ensure!(
            duration_seconds > 0,
            VotingError::<C::Address>::InvalidDuration(duration_seconds)
        );

        let now = self.now(working_set);
        let end_time = now
            .checked_add(duration_seconds)
            .ok_or(VotingError::<C::Address>::InvalidDuration(duration_seconds))?;

        self.voting_started.set(&true, working_set);
        self.voting_end_time.set(&end_time, working_set);

        info!(now, end_time, "Voting started");
        self.emit(VotingEvent::VotingStarted { end_time }, working_set);
        Ok(CallResponse::default())
    }

    pub(crate) fn toggle_emergency_stop(
        &self,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.exit_if_not_admin(context, working_set)?;

        let stopped = !self.emergency_stop.get(working_set).unwrap_or_default();
        self.emergency_stop.set(&stopped, working_set);

        info!(stopped, "Emergency stop toggled");
        self.emit(VotingEvent::EmergencyStopToggled { stopped }, working_set);
        Ok(CallResponse::default())
    }

    pub(crate) fn reset_voting_state(
        &self,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        self.exit_if_not_admin(context, working_set)?;
        ensure!(
            self.remaining_time(working_set) == 0,
            VotingError::<C::Address>::VotingAlreadyStarted
        );

        self.voting_started.set(&false, working_set);
        self.voting_end_time.delete(working_set);

        info!("Voting state reset");
        self.emit(VotingEvent::VotingReset, working_set);
        Ok(CallResponse::default())
    }

    pub(crate) fn vote(
        &self,
        candidate_id: u64,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        let voter = context.sender();
        self.exit_if_halted(working_set)?;

        let mut record = self.voters.get(voter, working_set).unwrap_or_default();
        ensure!(
            !record.is_blacklisted,
            VotingError::VoterIsBlacklisted(voter.clone())
        );
        ensure!(!record.has_voted, VotingError::AlreadyVoted(voter.clone()));

        let mut candidate = self
            .candidates
            .get(candidate_id, working_set)
            .ok_or(VotingError::<C::Address>::InvalidCandidateId(candidate_id))?;

        let minimum = self.minimum_voting_power.get(working_set).unwrap_or_default();
        let power = record.voting_power;
        ensure!(
            power > 0 && power >= minimum,
            VotingError::<C::Address>::InsufficientVotingPower { power, minimum }
        );

        candidate.vote_count = candidate
            .vote_count
            .checked_add(power)
            .ok_or_else(|| anyhow::anyhow!("Vote count overflow for candidate {candidate_id}"))?;
        self.candidates.set(candidate_id, &candidate, working_set)?;

        record.has_voted = true;
        record.voted_candidate_id = candidate_id;
        record.counted_power = power;
        self.voters.set(voter, &record, working_set);

        info!(%voter, candidate_id, power, "Vote casted");
        self.emit(
            VotingEvent::VoteCasted {
                voter: voter.clone(),
                candidate_id,
                voting_power: power,
            },
            working_set,
        );
        Ok(CallResponse::default())
    }

    pub(crate) fn revoke_vote(
        &self,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<CallResponse> {
        let voter = context.sender();
        self.exit_if_halted(working_set)?;

        let mut record = self.voters.get(voter, working_set).unwrap_or_default();
        ensure!(record.has_voted, VotingError::NoVoteToRevoke(voter.clone()));

        let candidate_id = record.voted_candidate_id;
        let mut candidate = self.candidates.get_or_err(candidate_id, working_set)?;
        candidate.vote_count = candidate
            .vote_count
            .checked_sub(record.counted_power)
            .ok_or_else(|| anyhow::anyhow!("Vote count underflow for candidate {candidate_id}"))?;
        self.candidates.set(candidate_id, &candidate, working_set)?;

        record.has_voted = false;
        record.voted_candidate_id = 0;
        record.counted_power = 0;
        self.voters.set(voter, &record, working_set);

        info!(%voter, candidate_id, "Vote revoked");
        self.emit(
            VotingEvent::VoteRevoked {
                voter: voter.clone(),
                candidate_id,
            },
            working_set,
        );
        Ok(CallResponse::default())
    }

    fn is_admin(
        &self,
        sender: &C::Address,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<bool> {
        let admin = self.admin.get_or_err(working_set)?;
        Ok(&admin == sender)
    }

    fn exit_if_not_admin(
        &self,
        context: &C,
        working_set: &mut WorkingSet<C::Storage>,
    ) -> Result<()> {
        ensure!(
            self.is_admin(context.sender(), working_set)?,
            VotingError::NotAuthorized(context.sender().clone())
        );
        Ok(())
    }

    /// Emergency stop first, then the round window.
    fn exit_if_halted(&self, working_set: &mut WorkingSet<C::Storage>) -> Result<()> {
        ensure!(
            !self.emergency_stop.get(working_set).unwrap_or_default(),
            VotingError::<C::Address>::EmergencyStopActive
        );
        ensure!(
            self.remaining_time(working_set) > 0,
            VotingError::<C::Address>::VotingNotActive
        );
        Ok(())
    }

    fn emit(&self, event: VotingEvent<C>, working_set: &mut WorkingSet<C::Storage>) {
        working_set.add_event(event.key(), &event);
    }
}
