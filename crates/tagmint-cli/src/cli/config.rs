use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::{Args, Parser, Subcommand};
use tagmint::OwnerScope;

/// Command-line surface of the `tagmint` binary.
///
/// All per-run settings live on the subcommands and are parsed from CLI
/// arguments or environment variables, so the tool works interactively
/// and from a scheduled job with a `.env` file alike.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tagmint",
    version,
    about = "Inventory identifier maintenance: backfill catalog exports and render label geometry"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Assign identifiers to records in an inventory export that lack one.
    Backfill(BackfillArgs),

    /// Print the label stripe geometry for a piece of text.
    Encode(EncodeArgs),
}

/// Inputs for a backfill run.
#[derive(Args, Debug, Clone)]
pub struct BackfillArgs {
    /// Path to the inventory export to repair.
    ///
    /// The file is a JSON object with an `items` array; each item carries
    /// at least an `id` and optionally the `identifier` assigned earlier.
    /// The file is rewritten in place after the run.
    ///
    /// Environment variable: `INVENTORY_FILE`
    #[arg(long, env = "INVENTORY_FILE")]
    pub file: PathBuf,

    /// Owner scope the exported records belong to.
    ///
    /// Identifiers are unique per scope and each scope numbers its days
    /// independently. Every record in the file is treated as belonging to
    /// this one scope.
    ///
    /// Environment variable: `OWNER_SCOPE`
    #[arg(long, env = "OWNER_SCOPE")]
    pub owner: String,

    /// Pause between records, in milliseconds.
    ///
    /// Keeps a large backlog from monopolizing the store. The pause is
    /// skipped after the final record.
    ///
    /// Environment variable: `RECORD_DELAY_MS`
    #[arg(long, env = "RECORD_DELAY_MS", default_value_t = 100)]
    pub delay_ms: u64,

    /// Allocate and report, but leave the file untouched.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// Inputs for the encode command.
#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// Text to render, typically an identifier such as `INV-20241118-00001`.
    ///
    /// Characters without a pattern of their own render as the filler
    /// pair, exactly as they would on a printed label.
    pub text: String,
}

/// Validated backfill inputs.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    pub file: PathBuf,
    pub owner: OwnerScope,
    pub delay: Duration,
    pub dry_run: bool,
}

impl TryFrom<BackfillArgs> for BackfillConfig {
    type Error = anyhow::Error;

    fn try_from(args: BackfillArgs) -> Result<Self, Self::Error> {
        if args.owner.trim().is_empty() {
            bail!("OWNER_SCOPE must not be empty");
        }

        Ok(Self {
            file: args.file,
            owner: OwnerScope::new(args.owner),
            delay: Duration::from_millis(args.delay_ms),
            dry_run: args.dry_run,
        })
    }
}
