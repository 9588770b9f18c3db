//! Workflows that create or change the state file

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use serde::Serialize;
use sov_ballot_core::{MemoryStorage, ModuleInfo};
use sov_voting::{CallMessage, Voting};
use sov_voting_ledger::{load_genesis, Clock, ManualClock, SystemClock, VotingLedger};
use tracing::info;

use crate::{Address, Ctx};

/// Location of the state and the clock reading to run with
#[derive(Debug, Clone, clap::Args)]
pub struct StateArgs {
    /// Path of the state file
    #[clap(long)]
    pub state: PathBuf,
    /// Seconds since the unix epoch. Defaults to the system time
    #[clap(long)]
    pub timestamp: Option<u64>,
}

impl StateArgs {
    fn clock(&self) -> ManualClock {
        ManualClock::new(self.timestamp.unwrap_or_else(|| SystemClock.now()))
    }

    /// Opens the ledger stored in the state file.
    pub fn open(&self) -> Result<VotingLedger<Ctx>, anyhow::Error> {
        let storage = MemoryStorage::load_from(&self.state)?;
        Ok(VotingLedger::open(Voting::default(), storage, self.clock()))
    }

    /// Writes the committed state of `ledger` back to the state file.
    pub fn save(&self, ledger: &VotingLedger<Ctx>) -> Result<(), anyhow::Error> {
        ledger.save_to(&self.state)
    }
}

/// Arguments of the `init` workflow
#[derive(Debug, Clone, clap::Args)]
pub struct InitArgs {
    /// The TOML genesis config
    #[clap(long)]
    pub genesis: PathBuf,
    #[clap(flatten)]
    #[allow(missing_docs)]
    pub state: StateArgs,
}

#[derive(Serialize)]
struct InitOutput<'a> {
    module_address: &'a Address,
    state: &'a PathBuf,
}

impl InitArgs {
    /// Runs genesis and writes a fresh state file. An existing file is never overwritten.
    pub fn run(self, out: &mut impl Write) -> Result<(), anyhow::Error> {
        if self.state.state.exists() {
            anyhow::bail!("State file {} already exists", self.state.state.display());
        }

        let config = load_genesis::<Ctx, _>(&self.genesis)?;
        let ledger = VotingLedger::genesis(
            Voting::default(),
            &config,
            MemoryStorage::new(),
            self.state.clock(),
        )?;
        self.state.save(&ledger)?;
        info!(state = %self.state.state.display(), "Initialized voting ledger");

        let output = InitOutput {
            module_address: ledger.module().address(),
            state: &self.state.state,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        Ok(())
    }
}

/// Arguments of the `call` workflow
#[derive(Debug, Clone, clap::Args)]
pub struct CallArgs {
    #[clap(flatten)]
    #[allow(missing_docs)]
    pub state: StateArgs,
    /// Address the call is sent from
    #[clap(long)]
    pub sender: Address,
    /// The call message as JSON, for example {"Vote":{"candidate_id":0}}
    pub message: String,
}

impl CallArgs {
    /// Applies the call and saves the state. A rejected call only changes
    /// the file when it ran at a later slot time than the one stored.
    pub fn run(self, out: &mut impl Write) -> Result<(), anyhow::Error> {
        let message: CallMessage<Ctx> =
            serde_json::from_str(&self.message).context("Malformed call message")?;

        let ledger = self.state.open()?;
        let result = ledger.apply(self.sender, message);
        self.state.save(&ledger)?;
        let receipt = result.context("Call rejected")?;

        writeln!(out, "{}", serde_json::to_string_pretty(&receipt)?)?;
        Ok(())
    }
}
