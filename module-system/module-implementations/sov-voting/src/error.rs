use thiserror::Error;

/// Rejections of the voting module. Every failed precondition has its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VotingError<Address> {
    /// The sender is not allowed to perform the operation.
    #[error("Sender {0} is not authorized to perform this action")]
    NotAuthorized(Address),
    /// A round is in progress, or the round was started and not reset yet.
    #[error("Voting has already started")]
    VotingAlreadyStarted,
    /// No round is running: it was never started, or it is over.
    #[error("Voting is not active")]
    VotingNotActive,
    /// The admin halted voting.
    #[error("Emergency stop is active")]
    EmergencyStopActive,
    /// The voter is blacklisted.
    #[error("Voter {0} is blacklisted")]
    VoterIsBlacklisted(Address),
    /// The voter already has a counted vote.
    #[error("Voter {0} has already voted")]
    AlreadyVoted(Address),
    /// The voter has no vote to revoke.
    #[error("Voter {0} has no vote to revoke")]
    NoVoteToRevoke(Address),
    /// No candidate exists with this id.
    #[error("Invalid candidate id {0}")]
    InvalidCandidateId(u64),
    /// The voter's power is zero or below the configured minimum.
    #[error("Voting power {power} is below the required minimum {minimum}")]
    InsufficientVotingPower {
        /// Power of the voter.
        power: u64,
        /// Minimum configured at genesis.
        minimum: u64,
    },
    /// The power of a voter cannot change while their vote is counted.
    #[error("Voting power of {0} is locked by a counted vote")]
    VotingPowerLocked(Address),
    /// Zero duration, or an end time that does not fit in a `u64`.
    #[error("Invalid voting duration {0}")]
    InvalidDuration(u64),
}
