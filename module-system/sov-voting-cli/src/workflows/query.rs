//! Workflows that read the voting state

use std::io::Write;

use sov_ballot_core::{MemoryStorage, WorkingSet};
use sov_voting::Voting;

use super::state::StateArgs;
use crate::{Address, Ctx};

/// Arguments of the `query` workflow
#[derive(Debug, Clone, clap::Args)]
pub struct QueryArgs {
    #[clap(flatten)]
    #[allow(missing_docs)]
    pub state: StateArgs,
    #[clap(subcommand)]
    #[allow(missing_docs)]
    pub query: Query,
}

/// The available queries
#[derive(Debug, Clone, clap::Subcommand)]
pub enum Query {
    /// Tallies of every candidate
    Results,
    /// Every registered candidate
    Candidates,
    /// A single candidate
    Candidate {
        /// Candidate id
        id: u64,
    },
    /// Voting information of an address
    Voter {
        /// The voter
        address: Address,
    },
    /// Seconds left in the current round
    RemainingTime,
    /// Round flags and chain time
    Status,
    /// Configuration set at genesis
    Config,
    /// Candidate with the highest tally
    Leader,
}

impl Query {
    fn evaluate(
        self,
        voting: &Voting<Ctx>,
        working_set: &mut WorkingSet<MemoryStorage>,
    ) -> Result<serde_json::Value, anyhow::Error> {
        let value = match self {
            Query::Results => serde_json::to_value(voting.voting_results(working_set))?,
            Query::Candidates => serde_json::to_value(voting.candidates(working_set))?,
            Query::Candidate { id } => serde_json::to_value(voting.candidate(id, working_set)?)?,
            Query::Voter { address } => {
                serde_json::to_value(voting.voter_info(&address, working_set))?
            }
            Query::RemainingTime => serde_json::to_value(voting.remaining_time(working_set))?,
            Query::Status => serde_json::to_value(voting.round_status(working_set))?,
            Query::Config => serde_json::to_value(voting.voting_config(working_set)?)?,
            Query::Leader => serde_json::to_value(voting.leading_candidate(working_set))?,
        };
        Ok(value)
    }
}

impl QueryArgs {
    /// Runs the query against the state file. Only the slot time is written back.
    pub fn run(self, out: &mut impl Write) -> Result<(), anyhow::Error> {
        let ledger = self.state.open()?;
        ledger.begin_slot()?;
        self.state.save(&ledger)?;
        let query = self.query;
        let value = ledger.query(|voting, working_set| query.evaluate(voting, working_set))??;

        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        Ok(())
    }
}
