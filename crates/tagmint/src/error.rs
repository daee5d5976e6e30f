use crate::{DatePartition, IdentifierError, OwnerScope, StoreError};

/// Result alias used across the engine.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All failure modes the engine surfaces to callers.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// No unique identifier could be claimed within the retry budget, or
    /// the day's sequence space is spent.
    ///
    /// Hard failure: item creation must not proceed without an
    /// identifier, and callers must not invent a fallback label.
    #[error("identifier allocation exhausted for {owner} on {date} after {attempts} attempt(s)")]
    AllocationExhausted {
        owner: OwnerScope,
        date: DatePartition,
        attempts: u32,
    },

    /// The backing store could not be queried within the retry budget.
    ///
    /// Retryable at a higher level once the store recovers.
    #[error("identifier store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// A stored identifier failed structural validation.
    ///
    /// Points at store corruption or a writer outside this engine. Never
    /// skipped over: an ignored maximum would restart the day's sequence
    /// and mint duplicates.
    #[error("malformed identifier {value:?}: {source}")]
    MalformedIdentifier {
        value: String,
        source: IdentifierError,
    },
}
