use crate::{Identifier, OwnerScope, Result, SleepProvider};
use core::pin::Pin;

/// Extension trait for allocating identifiers on the
/// [`tokio`](https://docs.rs/tokio) async runtime.
///
/// This trait provides a convenience method for using a [`SleepProvider`]
/// backed by the `tokio` runtime, allowing you to call `.allocate()` without
/// specifying the backoff sleep strategy manually.
pub trait IdentifierAllocatorTokioExt {
    /// Returns a future that resolves to a freshly allocated identifier,
    /// backing off between contended attempts with the [`TokioSleep`]
    /// provider.
    ///
    /// Internally delegates to [`IdentifierAllocator::allocate`] with
    /// [`TokioSleep`] as the sleep strategy.
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

impl<A> IdentifierAllocatorTokioExt for A
where
    A: crate::IdentifierAllocator,
{
    fn allocate(&self, owner: &OwnerScope) -> impl Future<Output = Result<Identifier>> {
        <Self as crate::IdentifierAllocator>::allocate::<TokioSleep>(self, owner)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    type Sleep = tokio::time::Sleep;

    fn sleep_for(dur: core::time::Duration) -> Self::Sleep {
        tokio::time::sleep(dur)
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy skips timer-based backoff by yielding to the scheduler
/// immediately, which shortens contended allocations when only a handful of
/// writers compete.
///
/// However, it comes at the cost of more frequent rescheduling: under real
/// contention the losing side re-queries the store as fast as the scheduler
/// lets it, so a timer-based sleep (e.g., [`TokioSleep`]) is usually the
/// better default against a shared store.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    /// Tokio's `yield_now()` returns a private future type, so we must use a
    /// boxed `dyn Future` to abstract over it.
    type Sleep = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn sleep_for(_dur: core::time::Duration) -> Self::Sleep {
        Box::pin(tokio::task::yield_now())
    }
}
