use sov_ballot_core::Context;

/// Notifications emitted by the voting module, in the order the state changed.
#[derive(borsh::BorshDeserialize, borsh::BorshSerialize, serde::Serialize, serde::Deserialize)]
#[derive(Debug, PartialEq, Clone)]
#[serde(bound = "C::Address: serde::Serialize + serde::de::DeserializeOwned")]
pub enum VotingEvent<C: Context> {
    /// A candidate was appended to the registry.
    CandidateAdded {
        /// Id of the new candidate.
        id: u64,
        /// Name of the new candidate.
        name: String,
        /// Sender of the call.
        added_by: C::Address,
    },
    /// The admin set the voting power of a voter.
    VotingPowerAssigned {
        /// The voter.
        voter: C::Address,
        /// The new power, replacing the previous one.
        power: u64,
    },
    /// The admin changed the blacklist flag of a voter.
    VoterBlacklistUpdated {
        /// The voter.
        voter: C::Address,
        /// The new flag.
        blacklisted: bool,
    },
    /// A round was opened.
    VotingStarted {
        /// Chain time at which the round ends.
        end_time: u64,
    },
    /// The emergency stop changed.
    EmergencyStopToggled {
        /// The new value of the flag.
        stopped: bool,
    },
    /// The round flags were cleared.
    VotingReset,
    /// A vote was counted.
    VoteCasted {
        /// The voter.
        voter: C::Address,
        /// The chosen candidate.
        candidate_id: u64,
        /// Power added to the candidate.
        voting_power: u64,
    },
    /// A vote was withdrawn.
    VoteRevoked {
        /// The voter.
        voter: C::Address,
        /// The candidate the vote was taken from.
        candidate_id: u64,
    },
}

impl<C: Context> VotingEvent<C> {
    /// The tag under which the event is stored in the working set.
    pub fn key(&self) -> &'static str {
        match self {
            Self::CandidateAdded { .. } => "CandidateAdded",
            Self::VotingPowerAssigned { .. } => "VotingPowerAssigned",
            Self::VoterBlacklistUpdated { .. } => "VoterBlacklistUpdated",
            Self::VotingStarted { .. } => "VotingStarted",
            Self::EmergencyStopToggled { .. } => "EmergencyStopToggled",
            Self::VotingReset => "VotingReset",
            Self::VoteCasted { .. } => "VoteCasted",
            Self::VoteRevoked { .. } => "VoteRevoked",
        }
    }
}
