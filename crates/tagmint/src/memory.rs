use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    DatePartition, Identifier, IdentifierStore, OwnerScope, RecordId, RecordStore, SequenceStore,
    StoreError,
};

/// An in-process store backing the engine's tests and the maintenance
/// CLI.
///
/// This is a reference implementation of the store contracts, not a
/// persistence layer: everything lives behind one lock and vanishes on
/// drop. Handles are cheap to clone and share the same state, so one
/// store can serve an allocator and a backfill runner at the same time.
///
/// Identifier text is stored raw. That allows seeding corrupt values to
/// exercise the engine's corruption handling, the same way a real store
/// can hold rows written by older software.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    /// Records in creation order, per owner.
    records: HashMap<OwnerScope, Vec<Record>>,
    /// High-water marks handed out via reservation, per (owner, date).
    reserved: HashMap<(OwnerScope, DatePartition), u32>,
}

struct Record {
    id: RecordId,
    identifier: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an identifier-less record to `owner`'s creation order.
    pub fn insert_record(&self, owner: &OwnerScope, record: RecordId) {
        let mut state = self.inner.lock();
        state.records.entry(owner.clone()).or_default().push(Record {
            id: record,
            identifier: None,
        });
    }

    /// Appends a record that already carries identifier text, as seeded
    /// or imported data would.
    pub fn insert_record_with_identifier(
        &self,
        owner: &OwnerScope,
        record: RecordId,
        identifier: &str,
    ) {
        let mut state = self.inner.lock();
        state.records.entry(owner.clone()).or_default().push(Record {
            id: record,
            identifier: Some(identifier.to_owned()),
        });
    }

    /// Returns the identifier text currently assigned to `record`, if
    /// any.
    pub fn identifier_of(&self, owner: &OwnerScope, record: &RecordId) -> Option<String> {
        let state = self.inner.lock();
        state
            .records
            .get(owner)?
            .iter()
            .find(|r| r.id == *record)
            .and_then(|r| r.identifier.clone())
    }
}

impl IdentifierStore for MemoryStore {
    fn max_identifier_with_prefix(
        &self,
        owner: &OwnerScope,
        prefix: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        let max = {
            let state = self.inner.lock();
            state
                .records
                .get(owner)
                .into_iter()
                .flatten()
                .filter_map(|record| record.identifier.as_deref())
                .filter(|text| text.starts_with(prefix))
                .max()
                .map(str::to_owned)
        };
        async move { Ok(max) }
    }

    fn identifier_exists(
        &self,
        owner: &OwnerScope,
        identifier: &Identifier,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        let needle = identifier.to_string();
        let exists = {
            let state = self.inner.lock();
            state
                .records
                .get(owner)
                .into_iter()
                .flatten()
                .any(|record| record.identifier.as_deref() == Some(needle.as_str()))
        };
        async move { Ok(exists) }
    }
}

impl SequenceStore for MemoryStore {
    fn reserve_sequence(
        &self,
        owner: &OwnerScope,
        date: DatePartition,
    ) -> impl Future<Output = Result<u32, StoreError>> + Send {
        let prefix = Identifier::day_prefix(date);
        let next = {
            let mut state = self.inner.lock();

            // Data inserted without a reservation (seeds, imports) still
            // raises the floor, so reservations can never collide with
            // it.
            let assigned_floor = state
                .records
                .get(owner)
                .into_iter()
                .flatten()
                .filter_map(|record| record.identifier.as_deref())
                .filter(|text| text.starts_with(&prefix))
                .filter_map(|text| text.parse::<Identifier>().ok())
                .map(|id| id.sequence().value())
                .max()
                .unwrap_or(0);

            let counter = state
                .reserved
                .entry((owner.clone(), date))
                .or_insert(0);
            *counter = (*counter).max(assigned_floor) + 1;
            *counter
        };
        async move { Ok(next) }
    }
}

impl RecordStore for MemoryStore {
    fn records_missing_identifier(
        &self,
        owner: &OwnerScope,
    ) -> impl Future<Output = Result<Vec<RecordId>, StoreError>> + Send {
        let pending = {
            let state = self.inner.lock();
            state
                .records
                .get(owner)
                .into_iter()
                .flatten()
                .filter(|record| record.identifier.is_none())
                .map(|record| record.id.clone())
                .collect::<Vec<_>>()
        };
        async move { Ok(pending) }
    }

    fn assign_identifier(
        &self,
        owner: &OwnerScope,
        record: &RecordId,
        identifier: &Identifier,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        let result = {
            let mut state = self.inner.lock();
            match state
                .records
                .get_mut(owner)
                .and_then(|records| records.iter_mut().find(|r| r.id == *record))
            {
                Some(found) => {
                    found.identifier = Some(identifier.to_string());
                    Ok(())
                }
                None => Err(StoreError::new(format!(
                    "unknown record {record} for owner {owner}"
                ))),
            }
        };
        async move { result }
    }

    fn count_missing(
        &self,
        owner: &OwnerScope,
    ) -> impl Future<Output = Result<usize, StoreError>> + Send {
        let count = {
            let state = self.inner.lock();
            state
                .records
                .get(owner)
                .into_iter()
                .flatten()
                .filter(|record| record.identifier.is_none())
                .count()
        };
        async move { Ok(count) }
    }
}
