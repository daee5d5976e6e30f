#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;

use cli::config::{BackfillConfig, CliArgs, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    cli::telemetry::init_logging();

    match args.command {
        Command::Backfill(backfill) => {
            let config = BackfillConfig::try_from(backfill)?;
            cli::backfill::run(config).await
        }
        Command::Encode(encode) => cli::encode::run(&encode),
    }
}
