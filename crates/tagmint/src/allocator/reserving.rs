#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    DateSource, Error, Identifier, IdentifierAllocator, MAX_SEQUENCE, OwnerScope, Result,
    Sequence, SequenceStore, SleepProvider, StoreError,
};

/// An allocator for stores that can claim sequences atomically.
///
/// A single [`SequenceStore::reserve_sequence`] round-trip replaces the
/// read-check-retry loop: the store hands back a number no other caller
/// can receive, so there is no race window, no confirmation query, and no
/// backoff. This is the preferred strategy wherever the backing store
/// offers an atomic increment.
///
/// Emits exactly the same identifier text as [`OptimisticAllocator`] for
/// a given (owner, date, sequence), so the two can back the same data
/// set interchangeably.
///
/// ## See Also
/// - [`OptimisticAllocator`]
///
/// [`OptimisticAllocator`]: crate::allocator::OptimisticAllocator
pub struct ReservingAllocator<T, S>
where
    T: DateSource,
    S: SequenceStore,
{
    clock: T,
    store: S,
}

impl<T, S> ReservingAllocator<T, S>
where
    T: DateSource,
    S: SequenceStore,
{
    /// Creates an allocator minting under `clock`'s current date against
    /// `store`.
    pub fn new(clock: T, store: S) -> Self {
        Self { clock, store }
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    async fn reserve(&self, owner: &OwnerScope) -> Result<Identifier> {
        let date = self.clock.today();
        let raw = self.store.reserve_sequence(owner, date).await?;

        let Ok(sequence) = Sequence::new(raw) else {
            if raw > MAX_SEQUENCE {
                return Err(Error::AllocationExhausted {
                    owner: owner.clone(),
                    date,
                    attempts: 1,
                });
            }
            // Zero breaks the reservation contract; surface it as a
            // store fault rather than minting a reserved value.
            return Err(StoreError::new(format!(
                "sequence reservation returned {raw} for {owner} on {date}"
            ))
            .into());
        };

        Ok(Identifier::new(date, sequence))
    }
}

impl<T, S> IdentifierAllocator for ReservingAllocator<T, S>
where
    T: DateSource,
    S: SequenceStore,
{
    fn allocate<P>(&self, owner: &OwnerScope) -> impl Future<Output = Result<Identifier>> + Send
    where
        P: SleepProvider,
    {
        self.reserve(owner)
    }
}
