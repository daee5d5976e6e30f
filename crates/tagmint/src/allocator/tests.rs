use core::future::Ready;
use core::sync::atomic::{AtomicU32, Ordering};
use core::time::Duration;
use std::sync::Arc;

use futures::executor::block_on;
use parking_lot::Mutex;

use crate::{
    DatePartition, DateSource, Error, Identifier, IdentifierAllocator, IdentifierStore,
    MAX_ATTEMPTS, MemoryStore, OptimisticAllocator, OwnerScope, RecordId, ReservingAllocator,
    Result, SleepProvider, StoreError, encode_symbol, total_width,
};

/// Resolves immediately so retry loops run without wall-clock delay.
struct NoSleep;
impl SleepProvider for NoSleep {
    type Sleep = Ready<()>;

    fn sleep_for(_dur: Duration) -> Self::Sleep {
        core::future::ready(())
    }
}

/// A settable calendar shared between the test and the allocator under
/// test.
#[derive(Clone)]
struct MockDate {
    current: Arc<Mutex<DatePartition>>,
}

impl MockDate {
    fn fixed(year: u16, month: u8, day: u8) -> Self {
        let date = DatePartition::new(year, month, day).unwrap();
        Self {
            current: Arc::new(Mutex::new(date)),
        }
    }

    fn set(&self, year: u16, month: u8, day: u8) {
        *self.current.lock() = DatePartition::new(year, month, day).unwrap();
    }
}

impl DateSource for MockDate {
    fn today(&self) -> DatePartition {
        *self.current.lock()
    }
}

/// Fails the first `failures` identifier queries, then behaves like the
/// wrapped store.
#[derive(Clone)]
struct FlakyStore {
    inner: MemoryStore,
    failures: Arc<AtomicU32>,
}

impl FlakyStore {
    fn new(inner: MemoryStore, failures: u32) -> Self {
        Self {
            inner,
            failures: Arc::new(AtomicU32::new(failures)),
        }
    }

    fn take_failure(&self) -> bool {
        self.failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl IdentifierStore for FlakyStore {
    fn max_identifier_with_prefix(
        &self,
        owner: &OwnerScope,
        prefix: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        let outage = self.take_failure();
        async move {
            if outage {
                return Err(StoreError::new("injected outage"));
            }
            self.inner.max_identifier_with_prefix(owner, prefix).await
        }
    }

    fn identifier_exists(
        &self,
        owner: &OwnerScope,
        identifier: &Identifier,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        let outage = self.take_failure();
        async move {
            if outage {
                return Err(StoreError::new("injected outage"));
            }
            self.inner.identifier_exists(owner, identifier).await
        }
    }
}

/// Reports the next `rival_claims` candidates as already taken, as if
/// concurrent allocators kept winning the confirmation race.
#[derive(Clone)]
struct RaceStore {
    inner: MemoryStore,
    rival_claims: Arc<AtomicU32>,
    max_queries: Arc<AtomicU32>,
}

impl RaceStore {
    fn new(inner: MemoryStore, rival_claims: u32) -> Self {
        Self {
            inner,
            rival_claims: Arc::new(AtomicU32::new(rival_claims)),
            max_queries: Arc::new(AtomicU32::new(0)),
        }
    }

    fn lose_race(&self) -> bool {
        self.rival_claims
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl IdentifierStore for RaceStore {
    fn max_identifier_with_prefix(
        &self,
        owner: &OwnerScope,
        prefix: &str,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        self.max_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.max_identifier_with_prefix(owner, prefix)
    }

    fn identifier_exists(
        &self,
        owner: &OwnerScope,
        identifier: &Identifier,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        let lost = self.lose_race();
        async move {
            if lost {
                return Ok(true);
            }
            self.inner.identifier_exists(owner, identifier).await
        }
    }
}

fn owner() -> OwnerScope {
    OwnerScope::new("warehouse-7")
}

fn seed_assigned(store: &MemoryStore, owner: &OwnerScope, record: &str, identifier: &str) {
    store.insert_record_with_identifier(owner, RecordId::new(record), identifier);
}

fn allocate<A>(allocator: &A, owner: &OwnerScope) -> Result<Identifier>
where
    A: IdentifierAllocator,
{
    block_on(allocator.allocate::<NoSleep>(owner))
}

fn run_sequential_mint<A>(allocator: &A, store: &MemoryStore, owner: &OwnerScope)
where
    A: IdentifierAllocator,
{
    let first = allocate(allocator, owner).unwrap();
    assert_eq!(first.to_string(), "INV-20241118-00001");
    seed_assigned(store, owner, "rec-1", &first.to_string());

    let second = allocate(allocator, owner).unwrap();
    assert_eq!(second.to_string(), "INV-20241118-00002");
}

fn run_day_rollover<A>(clock: &MockDate, allocator: &A, store: &MemoryStore, owner: &OwnerScope)
where
    A: IdentifierAllocator,
{
    let first = allocate(allocator, owner).unwrap();
    seed_assigned(store, owner, "rec-1", &first.to_string());
    assert_eq!(first.to_string(), "INV-20241118-00001");

    clock.set(2024, 11, 19);
    let rolled = allocate(allocator, owner).unwrap();
    assert_eq!(rolled.to_string(), "INV-20241119-00001");
}

fn run_capacity_exhaustion<A>(allocator: &A, owner: &OwnerScope)
where
    A: IdentifierAllocator,
{
    let err = allocate(allocator, owner).unwrap_err();
    assert!(
        matches!(err, Error::AllocationExhausted { .. }),
        "expected exhaustion, got {err}"
    );
    assert_eq!(
        err.to_string(),
        "identifier allocation exhausted for warehouse-7 on 20241118 after 1 attempt(s)"
    );
}

#[test]
fn optimistic_mints_sequentially_and_restarts_each_day() {
    let clock = MockDate::fixed(2024, 11, 18);
    let store = MemoryStore::new();
    let allocator = OptimisticAllocator::new(clock.clone(), store.clone());

    run_sequential_mint(&allocator, &store, &owner());
    run_day_rollover(&clock, &allocator, &store, &OwnerScope::new("warehouse-8"));
}

#[test]
fn reserving_mints_sequentially_and_restarts_each_day() {
    let clock = MockDate::fixed(2024, 11, 18);
    let store = MemoryStore::new();
    let allocator = ReservingAllocator::new(clock.clone(), store.clone());

    run_sequential_mint(&allocator, &store, &owner());
    run_day_rollover(&clock, &allocator, &store, &OwnerScope::new("warehouse-8"));
}

#[test]
fn optimistic_fails_when_the_day_is_full() {
    let store = MemoryStore::new();
    let owner = owner();
    seed_assigned(&store, &owner, "rec-1", "INV-20241118-99999");

    let allocator = OptimisticAllocator::new(MockDate::fixed(2024, 11, 18), store);
    run_capacity_exhaustion(&allocator, &owner);
}

#[test]
fn reserving_fails_when_the_day_is_full() {
    let store = MemoryStore::new();
    let owner = owner();
    seed_assigned(&store, &owner, "rec-1", "INV-20241118-99999");

    let allocator = ReservingAllocator::new(MockDate::fixed(2024, 11, 18), store);
    run_capacity_exhaustion(&allocator, &owner);
}

#[test]
fn lost_races_advance_the_candidate_without_requerying() {
    let store = MemoryStore::new();
    let owner = owner();
    seed_assigned(&store, &owner, "rec-1", "INV-20241118-00003");

    let race = RaceStore::new(store, 2);
    let max_queries = race.max_queries.clone();
    let allocator = OptimisticAllocator::new(MockDate::fixed(2024, 11, 18), race);

    // Rivals take 00004 and 00005 out from under us; the third attempt
    // lands on 00006 without going back to the max query.
    let id = allocate(&allocator, &owner).unwrap();
    assert_eq!(id.to_string(), "INV-20241118-00006");
    assert_eq!(max_queries.load(Ordering::SeqCst), 1);
}

#[test]
fn unbroken_contention_exhausts_the_attempt_budget() {
    let store = MemoryStore::new();
    let owner = owner();
    seed_assigned(&store, &owner, "rec-1", "INV-20241118-00003");

    let race = RaceStore::new(store, MAX_ATTEMPTS);
    let allocator = OptimisticAllocator::new(MockDate::fixed(2024, 11, 18), race);

    let err = allocate(&allocator, &owner).unwrap_err();
    assert!(
        matches!(
            err,
            Error::AllocationExhausted {
                attempts: MAX_ATTEMPTS,
                ..
            }
        ),
        "expected exhaustion after {MAX_ATTEMPTS} attempts, got {err}"
    );
}

#[test]
fn transient_outages_share_the_attempt_budget() {
    let store = FlakyStore::new(MemoryStore::new(), MAX_ATTEMPTS - 1);
    let allocator = OptimisticAllocator::new(MockDate::fixed(2024, 11, 18), store);

    let id = allocate(&allocator, &owner()).unwrap();
    assert_eq!(id.to_string(), "INV-20241118-00001");
}

#[test]
fn a_persistent_outage_surfaces_the_store_error() {
    let store = FlakyStore::new(MemoryStore::new(), MAX_ATTEMPTS);
    let allocator = OptimisticAllocator::new(MockDate::fixed(2024, 11, 18), store);

    let err = allocate(&allocator, &owner()).unwrap_err();
    assert!(
        matches!(err, Error::StoreUnavailable(_)),
        "expected a store error, got {err}"
    );
}

#[test]
fn corrupt_stored_text_aborts_without_minting() {
    let store = MemoryStore::new();
    let owner = owner();
    seed_assigned(&store, &owner, "rec-1", "INV-20241118-BOGUS");

    let allocator = OptimisticAllocator::new(MockDate::fixed(2024, 11, 18), store);
    match allocate(&allocator, &owner) {
        Err(Error::MalformedIdentifier { value, .. }) => {
            assert_eq!(value, "INV-20241118-BOGUS");
        }
        other => panic!("expected a malformed-identifier error, got {other:?}"),
    }
}

#[test]
fn both_strategies_mint_identical_text() {
    let owner = owner();

    let optimistic_store = MemoryStore::new();
    seed_assigned(&optimistic_store, &owner, "rec-1", "INV-20241118-00001");
    seed_assigned(&optimistic_store, &owner, "rec-2", "INV-20241118-00002");
    let optimistic =
        OptimisticAllocator::new(MockDate::fixed(2024, 11, 18), optimistic_store);

    let reserving_store = MemoryStore::new();
    seed_assigned(&reserving_store, &owner, "rec-1", "INV-20241118-00001");
    seed_assigned(&reserving_store, &owner, "rec-2", "INV-20241118-00002");
    let reserving = ReservingAllocator::new(MockDate::fixed(2024, 11, 18), reserving_store);

    let a = allocate(&optimistic, &owner).unwrap();
    let b = allocate(&reserving, &owner).unwrap();
    assert_eq!(a.to_string(), b.to_string());
    assert_eq!(a.to_string(), "INV-20241118-00003");
}

#[test]
fn minted_identifiers_render_as_printable_stripes() {
    let store = MemoryStore::new();
    let owner = OwnerScope::new("u1");
    let allocator = OptimisticAllocator::new(MockDate::fixed(2024, 11, 18), store.clone());

    let first = allocate(&allocator, &owner).unwrap();
    seed_assigned(&store, &owner, "rec-1", &first.to_string());
    let second = allocate(&allocator, &owner).unwrap();
    assert_eq!(first.to_string(), "INV-20241118-00001");
    assert_eq!(second.to_string(), "INV-20241118-00002");

    let stripes = encode_symbol(&first.to_string());
    assert_eq!(stripes.len(), 18 * 6 + 2);
    assert_eq!(total_width(&stripes), 199);
    let start = stripes.first().unwrap();
    let stop = stripes.last().unwrap();
    assert!(start.is_bar && start.width == 2);
    assert!(stop.is_bar && stop.width == 2);
}
