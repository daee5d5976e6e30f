use crate::{DatePartition, Identifier, OwnerScope, RecordId};

/// Error returned by store implementations at the engine boundary.
///
/// The engine treats the store as a black box: any failed query surfaces
/// as a context line plus whatever driver error caused it.
#[derive(Debug, thiserror::Error)]
#[error("{context}")]
pub struct StoreError {
    context: String,
    #[source]
    source: Option<Box<dyn core::error::Error + Send + Sync>>,
}

impl StoreError {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: None,
        }
    }

    pub fn with_source(
        context: impl Into<String>,
        source: impl core::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Identifier lookups the allocator performs against the backing store.
///
/// Implementations are handles: cheap to clone and share across tasks.
/// The store is the source of truth; the engine never caches query
/// results, so reads must reflect every write that has completed.
pub trait IdentifierStore: Send + Sync {
    /// Returns the lexicographically greatest identifier text assigned
    /// under `owner` that starts with `prefix`, if any.
    ///
    /// Identifier text is fixed-width, so lexicographic order is also
    /// numeric order within a day; see [`Identifier::day_prefix`] for the
    /// prefix shape.
    fn max_identifier_with_prefix(
        &self,
        owner: &OwnerScope,
        prefix: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Returns whether `identifier` is already assigned under `owner`.
    fn identifier_exists(
        &self,
        owner: &OwnerScope,
        identifier: &Identifier,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Optional capability for stores with an atomic increment-and-fetch.
///
/// `reserve_sequence` must return a value strictly greater than every
/// sequence previously stored or reserved for the same (owner, date)
/// pair, starting at 1 on a fresh partition. Reservations may leave gaps
/// when a caller crashes before persisting; they must never repeat.
pub trait SequenceStore: Send + Sync {
    fn reserve_sequence(
        &self,
        owner: &OwnerScope,
        date: DatePartition,
    ) -> impl Future<Output = Result<u32, StoreError>> + Send;
}

/// Record surface the backfill runner works against.
pub trait RecordStore: Send + Sync {
    /// Returns the ids of records with no identifier yet, oldest first.
    fn records_missing_identifier(
        &self,
        owner: &OwnerScope,
    ) -> impl Future<Output = Result<Vec<RecordId>, StoreError>> + Send;

    /// Writes `identifier` onto `record`.
    ///
    /// Once this resolves, the value must be visible to
    /// [`IdentifierStore`] queries, or the next allocation could hand the
    /// same identifier out again.
    fn assign_identifier(
        &self,
        owner: &OwnerScope,
        record: &RecordId,
        identifier: &Identifier,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns how many records still lack an identifier.
    ///
    /// The default implementation lists and counts; stores with a cheap
    /// count query should override it.
    fn count_missing(
        &self,
        owner: &OwnerScope,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send {
        async move { Ok(self.records_missing_identifier(owner).await?.len()) }
    }
}
