use crate::{Identifier, OwnerScope, Result, SleepProvider};
use pin_project_lite::pin_project;
use smol::Timer;
use std::{
    pin::Pin,
    task::{Context, Poll},
};

/// Extension trait for allocating identifiers on the
/// [`smol`](https://docs.rs/smol) async runtime.
///
/// This trait provides a convenience method for using a [`SleepProvider`]
/// backed by the `smol` runtime, allowing you to call `.allocate()` without
/// needing to specify the backoff sleep strategy manually.
pub trait IdentifierAllocatorSmolExt {
    /// Returns a future that resolves to a freshly allocated identifier,
    /// backing off between contended attempts with the [`SmolSleep`]
    /// provider.
    ///
    /// Internally delegates to [`IdentifierAllocator::allocate`] with
    /// [`SmolSleep`] as the sleep strategy.
    ///
    /// # Errors
    ///
    /// This future may return an error if the underlying allocator does.
    ///
    /// [`IdentifierAllocator::allocate`]:
    ///     crate::IdentifierAllocator::allocate
    fn allocate(&self, owner: &OwnerScope) -> impl Future<Output = Result<Identifier>>
    where
        Self: crate::IdentifierAllocator;
}

impl<A> IdentifierAllocatorSmolExt for A
where
    A: crate::IdentifierAllocator,
{
    fn allocate(&self, owner: &OwnerScope) -> impl Future<Output = Result<Identifier>> {
        <Self as crate::IdentifierAllocator>::allocate::<SmolSleep>(self, owner)
    }
}

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for use in async applications built on Smol.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    type Sleep = SmolSleepFuture;

    fn sleep_for(dur: std::time::Duration) -> Self::Sleep {
        SmolSleepFuture {
            timer: Timer::after(dur),
        }
    }
}

pin_project! {
    /// Internal future returned by [`SmolSleep::sleep_for`].
    ///
    /// This type wraps a [`smol::Timer`] and implements [`Future`] with `Output
    /// = ()`, discarding the timer's `Instant` result.
    ///
    /// You should not construct or use this type directly. It is only used
    /// internally by the [`SleepProvider`] implementation for the Smol runtime.
    #[must_use = "futures do nothing unless you `.await` or poll them"]
    pub struct SmolSleepFuture {
        #[pin]
        timer: Timer,
    }
}

impl Future for SmolSleepFuture {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.project().timer.poll(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, OwnerScope, RecordId, ReservingAllocator, Result, UtcClock};
    use std::collections::HashSet;

    const NUM_TASKS: usize = 16;
    const IDS_PER_TASK: usize = 64;

    #[test]
    fn concurrent_reservations_stay_unique_smol() {
        smol::block_on(allocate_many()).unwrap();
    }

    async fn allocate_many() -> Result<()> {
        let store = MemoryStore::new();
        let tasks: Vec<smol::Task<Result<Vec<Identifier>>>> = (0..NUM_TASKS)
            .map(|_| {
                let store = store.clone();
                smol::spawn(async move {
                    let allocator = ReservingAllocator::new(UtcClock, store);
                    let owner = OwnerScope::new("warehouse-7");
                    let mut ids = Vec::with_capacity(IDS_PER_TASK);
                    for _ in 0..IDS_PER_TASK {
                        // This uses the convenience method - no explicit
                        // SleepProvider type!
                        let id = allocator.allocate(&owner).await?;
                        ids.push(id);
                    }
                    Ok(ids)
                })
            })
            .collect();

        let mut seen = HashSet::with_capacity(NUM_TASKS * IDS_PER_TASK);
        for task in tasks {
            for id in task.await? {
                assert!(seen.insert(id), "Duplicate identifier found: {:?}", id);
            }
        }
        assert_eq!(seen.len(), NUM_TASKS * IDS_PER_TASK);

        Ok(())
    }

    #[test]
    fn backfill_paces_with_the_smol_timer() {
        smol::block_on(async {
            let store = MemoryStore::new();
            let owner = OwnerScope::new("warehouse-7");
            store.insert_record(&owner, RecordId::new("rec-1"));
            store.insert_record(&owner, RecordId::new("rec-2"));

            let allocator = ReservingAllocator::new(UtcClock, store.clone());
            let runner = crate::BackfillRunner::new(allocator, store.clone())
                .with_delay(core::time::Duration::from_millis(1));
            let report = runner.run::<SmolSleep>(&owner).await.unwrap();

            assert_eq!(report.updated, 2);
            assert!(report.is_success());
            assert!(
                store
                    .identifier_of(&owner, &RecordId::new("rec-2"))
                    .is_some()
            );
        });
    }
}
