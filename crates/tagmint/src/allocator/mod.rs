mod optimistic;
mod reserving;
#[cfg(test)]
mod tests;

pub use crate::allocator::optimistic::*;
pub use crate::allocator::reserving::*;

use core::time::Duration;

use crate::{Identifier, OwnerScope, Result, SleepProvider};

/// Number of compose-and-check rounds before allocation gives up.
pub const MAX_ATTEMPTS: u32 = 5;

/// Base backoff between allocation attempts; attempt `n` sleeps `n`
/// times this before the next round.
pub const BACKOFF_STEP: Duration = Duration::from_millis(100);

/// Strategy seam for producing new inventory identifiers.
///
/// Both shipped strategies emit the same `INV-YYYYMMDD-NNNNN` text for a
/// given (owner, date, sequence); they differ only in how the sequence is
/// claimed against the store. Callers such as [`BackfillRunner`] are
/// generic over this trait, so swapping strategies never touches the
/// records being labeled.
///
/// ## See Also
/// - [`OptimisticAllocator`] for stores limited to plain queries
/// - [`ReservingAllocator`] for stores with an atomic increment
///
/// [`BackfillRunner`]: crate::BackfillRunner
pub trait IdentifierAllocator: Send + Sync {
    /// Allocates the next free identifier for `owner`, dated today.
    ///
    /// # Errors
    ///
    /// - [`Error::AllocationExhausted`] when no unique value can be
    ///   claimed within the attempt budget, or the day's sequence space
    ///   is spent.
    /// - [`Error::StoreUnavailable`] when the store keeps failing for the
    ///   whole attempt budget.
    /// - [`Error::MalformedIdentifier`] when the store returns corrupt
    ///   identifier text for today's partition.
    ///
    /// [`Error::AllocationExhausted`]: crate::Error::AllocationExhausted
    /// [`Error::StoreUnavailable`]: crate::Error::StoreUnavailable
    /// [`Error::MalformedIdentifier`]: crate::Error::MalformedIdentifier
    fn allocate<P>(&self, owner: &OwnerScope) -> impl Future<Output = Result<Identifier>> + Send
    where
        P: SleepProvider;
}
