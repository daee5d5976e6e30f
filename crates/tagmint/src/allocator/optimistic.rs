#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    BACKOFF_STEP, DatePartition, DateSource, Error, Identifier, IdentifierAllocator,
    IdentifierStore, MAX_ATTEMPTS, OwnerScope, Result, Sequence, SleepProvider,
};

/// A detect-and-retry allocator for stores limited to plain queries.
///
/// Each attempt reads the day's maximum under the owner, composes the
/// next candidate, and confirms the candidate is still unclaimed before
/// handing it out. A concurrent creator shows up at the confirmation
/// step: the allocator then backs off ([`BACKOFF_STEP`] times the attempt
/// number), bumps past the contested value, and tries again, up to
/// [`MAX_ATTEMPTS`].
///
/// Uniqueness is probabilistic under concurrent writers because the
/// confirm-then-persist window stays open. Prefer [`ReservingAllocator`]
/// when the store can claim sequences atomically; both emit identical
/// identifier text.
///
/// ## See Also
/// - [`ReservingAllocator`]
///
/// [`ReservingAllocator`]: crate::allocator::ReservingAllocator
pub struct OptimisticAllocator<T, S>
where
    T: DateSource,
    S: IdentifierStore,
{
    clock: T,
    store: S,
}

impl<T, S> OptimisticAllocator<T, S>
where
    T: DateSource,
    S: IdentifierStore,
{
    /// Creates an allocator minting under `clock`'s current date against
    /// `store`.
    ///
    /// # Example
    ///
    /// ```
    /// use tagmint::{MemoryStore, OptimisticAllocator, UtcClock};
    ///
    /// let store = MemoryStore::new();
    /// let allocator = OptimisticAllocator::new(UtcClock, store.clone());
    /// ```
    pub fn new(clock: T, store: S) -> Self {
        Self { clock, store }
    }

    /// One compose-and-check round.
    ///
    /// `Ok(Some(id))` claims the round's candidate; `Ok(None)` means the
    /// candidate was taken by a concurrent creator and has been parked in
    /// `candidate` so the next round resumes past it.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, candidate))
    )]
    async fn try_allocate(
        &self,
        owner: &OwnerScope,
        date: DatePartition,
        attempt: u32,
        candidate: &mut Option<Sequence>,
    ) -> Result<Option<Identifier>> {
        let next = match candidate.take() {
            // A previous round lost its race; skip past the contested
            // value without re-reading the maximum.
            Some(lost) => lost.next(),
            None => {
                let prefix = Identifier::day_prefix(date);
                match self
                    .store
                    .max_identifier_with_prefix(owner, &prefix)
                    .await?
                {
                    Some(max) => {
                        let parsed: Identifier =
                            max.parse().map_err(|source| Error::MalformedIdentifier {
                                value: max.clone(),
                                source,
                            })?;
                        parsed.sequence().next()
                    }
                    None => Some(Sequence::FIRST),
                }
            }
        };

        let Some(sequence) = next else {
            return Err(Error::AllocationExhausted {
                owner: owner.clone(),
                date,
                attempts: attempt,
            });
        };

        let id = Identifier::new(date, sequence);
        debug_assert!(
            id.to_string().parse::<Identifier>().is_ok(),
            "composed identifier failed re-validation: {id}"
        );

        if self.store.identifier_exists(owner, &id).await? {
            #[cfg(feature = "tracing")]
            tracing::debug!(%owner, %id, attempt, "identifier already claimed, advancing candidate");
            *candidate = Some(sequence);
            return Ok(None);
        }

        Ok(Some(id))
    }
}

impl<T, S> IdentifierAllocator for OptimisticAllocator<T, S>
where
    T: DateSource,
    S: IdentifierStore,
{
    fn allocate<P>(&self, owner: &OwnerScope) -> impl Future<Output = Result<Identifier>> + Send
    where
        P: SleepProvider,
    {
        async move {
            let date = self.clock.today();
            let mut candidate: Option<Sequence> = None;
            let mut last_store_err: Option<Error> = None;

            for attempt in 1..=MAX_ATTEMPTS {
                match self.try_allocate(owner, date, attempt, &mut candidate).await {
                    Ok(Some(id)) => return Ok(id),
                    Ok(None) => last_store_err = None,
                    Err(
                        err @ (Error::MalformedIdentifier { .. }
                        | Error::AllocationExhausted { .. }),
                    ) => return Err(err),
                    // Store failures burn the same attempt budget as lost
                    // races.
                    Err(err) => last_store_err = Some(err),
                }

                if attempt < MAX_ATTEMPTS {
                    P::sleep_for(BACKOFF_STEP * attempt).await;
                }
            }

            Err(last_store_err.unwrap_or_else(|| Error::AllocationExhausted {
                owner: owner.clone(),
                date,
                attempts: MAX_ATTEMPTS,
            }))
        }
    }
}
