use core::fmt;
use core::time::Duration;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, IdentifierAllocator, OwnerScope, RecordId, RecordStore, Result, SleepProvider};

/// Default pause between records during a backfill run.
pub const RECORD_DELAY: Duration = Duration::from_millis(100);

/// Walks an owner's identifier-less records and assigns each one a
/// freshly allocated identifier.
///
/// Records are processed strictly one at a time in the store's listing
/// order, oldest first, with a pause between records so a large backlog
/// does not monopolize the store. One record's failure does not stop
/// the run; it is recorded in the [`BackfillReport`] and the walk moves
/// on.
pub struct BackfillRunner<A, R>
where
    A: IdentifierAllocator,
    R: RecordStore,
{
    allocator: A,
    records: R,
    delay: Duration,
}

impl<A, R> BackfillRunner<A, R>
where
    A: IdentifierAllocator,
    R: RecordStore,
{
    /// Creates a runner assigning identifiers from `allocator` to the
    /// records in `records`, paced at [`RECORD_DELAY`].
    pub fn new(allocator: A, records: R) -> Self {
        Self {
            allocator,
            records,
            delay: RECORD_DELAY,
        }
    }

    /// Overrides the pause between records. [`Duration::ZERO`] disables
    /// pacing entirely.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Backfills every record of `owner` that is currently missing an
    /// identifier and reports what happened.
    ///
    /// Only the initial listing is load-bearing: if it cannot be
    /// fetched, the run aborts with the store error. From then on each
    /// record is allocated and assigned independently, failures are
    /// collected rather than propagated, and the next record is
    /// attempted after the configured pause. A record that gains an
    /// identifier between the listing and its turn simply fails its
    /// assignment and is reported like any other failure.
    ///
    /// No pause follows the final record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] when the missing-record
    /// listing itself fails. Per-record errors never surface here; they
    /// are in [`BackfillReport::failures`].
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub async fn run<P>(&self, owner: &OwnerScope) -> Result<BackfillReport>
    where
        P: SleepProvider,
    {
        let missing = self.records.records_missing_identifier(owner).await?;
        let total = missing.len();
        let mut report = BackfillReport::new(total);

        for (index, record) in missing.into_iter().enumerate() {
            match self.assign_one::<P>(owner, &record).await {
                Ok(()) => report.updated += 1,
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(%record, %error, "record kept its missing identifier");
                    report.failures.push(RecordFailure { record, error });
                }
            }
            if index + 1 < total && !self.delay.is_zero() {
                P::sleep_for(self.delay).await;
            }
        }

        Ok(report)
    }

    async fn assign_one<P>(&self, owner: &OwnerScope, record: &RecordId) -> Result<()>
    where
        P: SleepProvider,
    {
        let identifier = self.allocator.allocate::<P>(owner).await?;
        self.records
            .assign_identifier(owner, record, &identifier)
            .await?;
        Ok(())
    }
}

/// Outcome of one [`BackfillRunner::run`].
#[derive(Debug)]
pub struct BackfillReport {
    /// How many identifier-less records the initial listing found.
    pub processed: usize,
    /// How many of them now carry an identifier.
    pub updated: usize,
    /// The records that could not be updated, in processing order.
    pub failures: Vec<RecordFailure>,
}

impl BackfillReport {
    fn new(processed: usize) -> Self {
        Self {
            processed,
            updated: 0,
            failures: Vec::new(),
        }
    }

    /// Whether every processed record was updated.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A single record the backfill could not update, with the error that
/// stopped it.
#[derive(Debug)]
pub struct RecordFailure {
    pub record: RecordId,
    pub error: Error,
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.record, self.error)
    }
}
