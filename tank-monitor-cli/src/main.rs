mod check;
mod config;
mod output;
mod replay;
mod run;

use clap::{Parser, Subcommand};

/// Tool to check tank configurations and replay probe inputs through the tank monitor.
#[derive(Parser)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a tank configuration and show the resolved tanks
    Check(check::Cli),

    /// Feed recorded input frames through the monitor and print level changes
    Run(run::Cli),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check(cli) => cli.run(),
        Command::Run(cli) => cli.run().await,
    }
}
