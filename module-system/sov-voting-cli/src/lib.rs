#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

use std::io::Write;

pub use clap;
use sov_ballot_core::utils::generate_address;
use sov_ballot_core::{DefaultContext, ModuleCallJsonSchema, Spec};
use sov_voting::Voting;

pub mod workflows;

use workflows::query::QueryArgs;
use workflows::state::{CallArgs, InitArgs};

/// Context used by the CLI.
pub type Ctx = DefaultContext;

/// Address type used by the CLI.
pub type Address = <Ctx as Spec>::Address;

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
/// Manage a voting ledger stored in a local state file
pub struct App {
    #[clap(subcommand)]
    /// The workflow to run
    pub workflow: Workflows,
}

#[derive(clap::Subcommand)]
/// Top level workflows
pub enum Workflows {
    /// Create a new state file from a TOML genesis config
    Init(InitArgs),
    /// Apply one call message to the state
    Call(CallArgs),
    /// Read the state
    Query(QueryArgs),
    /// Print the JSON schema of the call messages
    Schema,
    /// Derive a deterministic address from a seed string
    Address {
        /// Any string, hashed into the address
        seed: String,
    },
}

impl Workflows {
    /// Runs the workflow, writing its JSON output to `out`.
    pub fn run(self, out: &mut impl Write) -> Result<(), anyhow::Error> {
        match self {
            Workflows::Init(args) => args.run(out),
            Workflows::Call(args) => args.run(out),
            Workflows::Query(args) => args.run(out),
            Workflows::Schema => {
                writeln!(out, "{}", <Voting<Ctx> as ModuleCallJsonSchema>::json_schema())?;
                Ok(())
            }
            Workflows::Address { seed } => {
                writeln!(out, "{}", generate_address::<Ctx>(&seed))?;
                Ok(())
            }
        }
    }
}
