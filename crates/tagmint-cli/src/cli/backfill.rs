use tagmint::{
    BackfillRunner, MemoryStore, OptimisticAllocator, RecordStore, TokioSleep, UtcClock,
};
use tracing::{info, warn};

use crate::cli::config::BackfillConfig;
use crate::cli::inventory::InventoryFile;

/// Assigns identifiers to every record in the export that lacks one.
///
/// The file is mirrored into an in-memory store, the runner walks the
/// backlog against today's date partition, and the updated export is
/// written back in place. `--dry-run` performs the same walk but leaves
/// the file untouched.
pub async fn run(config: BackfillConfig) -> anyhow::Result<()> {
    let mut inventory = InventoryFile::load(&config.file)?;
    let store = MemoryStore::new();
    inventory.seed(&store, &config.owner);

    let missing = store.count_missing(&config.owner).await?;
    if missing == 0 {
        info!("every record already has an identifier");
        return Ok(());
    }
    info!(missing, owner = %config.owner, "records lack an identifier");

    let allocator = OptimisticAllocator::new(UtcClock, store.clone());
    let runner = BackfillRunner::new(allocator, store.clone()).with_delay(config.delay);
    let report = runner.run::<TokioSleep>(&config.owner).await?;

    for (record, identifier) in inventory.absorb(&store, &config.owner) {
        info!(%record, %identifier, "assigned");
    }
    for failure in &report.failures {
        warn!(%failure, "record left without an identifier");
    }
    info!(
        updated = report.updated,
        processed = report.processed,
        "backfill finished"
    );

    if config.dry_run {
        info!(path = %config.file.display(), "dry run, file left untouched");
    } else {
        inventory.save(&config.file)?;
        info!(path = %config.file.display(), "inventory file rewritten");
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} record(s) could not be assigned an identifier",
            report.failures.len(),
            report.processed
        );
    }
    Ok(())
}
