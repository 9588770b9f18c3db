use anyhow::Context;
use sov_voting_cli::clap::Parser;
use sov_voting_cli::App;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), anyhow::Error> {
    // Logs go to stderr, stdout is reserved for JSON output.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Unable to set global default subscriber")?;

    let invocation = App::parse();
    let stdout = std::io::stdout();
    invocation.workflow.run(&mut stdout.lock())
}
