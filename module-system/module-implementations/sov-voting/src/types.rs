use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// A registered candidate. Candidates are never removed, and only their
/// `vote_count` changes after creation.
#[derive(
    BorshDeserialize,
    BorshSerialize,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    Debug,
    Clone,
    PartialEq,
    Eq,
)]
pub struct Candidate {
    /// Zero-based position in the registry.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Sum of the voting power of the voters currently backing this candidate.
    pub vote_count: u64,
}

impl Candidate {
    pub(crate) fn new(id: u64, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
            vote_count: 0,
        }
    }
}

/// Per-voter accounting. A missing record reads as the default value.
#[derive(BorshDeserialize, BorshSerialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct VoterRecord {
    pub(crate) voting_power: u64,
    pub(crate) has_voted: bool,
    pub(crate) voted_candidate_id: u64,
    /// Power added to the tally by the current vote. Zero while `has_voted` is false.
    pub(crate) counted_power: u64,
    pub(crate) is_blacklisted: bool,
}
