//! Tests for the sequence allocator.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockable::{DefaultClock, MockClock};

use crate::domain::ports::{MockSequenceStore, SequenceStore, SequenceStoreError};
use crate::domain::sequence::{AllocationError, RecordKind, SequenceAllocator, SequenceValue};

/// In-memory store mirroring the Diesel adapter's behaviour: numeric max,
/// exact-match probes, values recorded by the caller after allocation. Every
/// query yields once so concurrent allocations interleave.
#[derive(Default)]
struct MemoryStore {
    values: StdMutex<HashMap<RecordKind, Vec<String>>>,
}

impl MemoryStore {
    fn record(&self, kind: RecordKind, value: &SequenceValue) {
        self.values
            .lock()
            .expect("store lock")
            .entry(kind)
            .or_default()
            .push(value.as_str().to_owned());
    }
}

#[async_trait]
impl SequenceStore for MemoryStore {
    async fn max_assigned(&self, kind: RecordKind) -> Result<Option<String>, SequenceStoreError> {
        tokio::task::yield_now().await;
        let values = self.values.lock().expect("store lock");
        let max = values
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|raw| raw.parse::<u64>().ok())
            .max();
        Ok(max.map(|v| v.to_string()))
    }

    async fn is_assigned(
        &self,
        kind: RecordKind,
        candidate: &str,
    ) -> Result<bool, SequenceStoreError> {
        tokio::task::yield_now().await;
        let values = self.values.lock().expect("store lock");
        Ok(values
            .get(&kind)
            .is_some_and(|stored| stored.iter().any(|v| v == candidate)))
    }
}

fn allocator_over(store: Arc<dyn SequenceStore>) -> SequenceAllocator {
    SequenceAllocator::new(store, Arc::new(DefaultClock))
}

#[tokio::test]
async fn empty_collection_yields_one() {
    let allocator = allocator_over(Arc::new(MemoryStore::default()));
    let value = allocator.next(RecordKind::Tutor).await.expect("allocates");
    assert_eq!(value.as_str(), "1");
}

#[tokio::test]
async fn sequential_allocations_count_up_from_one() {
    let store = Arc::new(MemoryStore::default());
    let allocator = allocator_over(store.clone());

    let mut issued = Vec::new();
    for _ in 0..5 {
        let value = allocator.next(RecordKind::Consult).await.expect("allocates");
        store.record(RecordKind::Consult, &value);
        issued.push(value.as_str().to_owned());
    }

    assert_eq!(issued, ["1", "2", "3", "4", "5"]);
}

#[tokio::test]
async fn kinds_number_independently() {
    let store = Arc::new(MemoryStore::default());
    let allocator = allocator_over(store.clone());

    let tutor = allocator.next(RecordKind::Tutor).await.expect("allocates");
    store.record(RecordKind::Tutor, &tutor);
    let animal = allocator.next(RecordKind::Animal).await.expect("allocates");

    assert_eq!(tutor.as_str(), "1");
    assert_eq!(animal.as_str(), "1");
}

#[tokio::test]
async fn second_call_differs_even_before_the_row_lands() {
    // The caller inserts the row after allocation; until then the issued
    // floor is all that prevents a repeat.
    let allocator = allocator_over(Arc::new(MemoryStore::default()));

    let first = allocator.next(RecordKind::Animal).await.expect("allocates");
    let second = allocator.next(RecordKind::Animal).await.expect("allocates");

    assert_eq!(first.as_str(), "1");
    assert_eq!(second.as_str(), "2");
}

#[tokio::test]
async fn concurrent_allocations_return_distinct_values() {
    let store = Arc::new(MemoryStore::default());
    let allocator = Arc::new(allocator_over(store.clone()));

    let left = {
        let allocator = allocator.clone();
        tokio::spawn(async move { allocator.next(RecordKind::Tutor).await })
    };
    let right = {
        let allocator = allocator.clone();
        tokio::spawn(async move { allocator.next(RecordKind::Tutor).await })
    };

    let left = left.await.expect("join").expect("allocates");
    let right = right.await.expect("join").expect("allocates");

    assert_ne!(left, right);
}

#[tokio::test]
async fn non_numeric_maximum_resets_the_basis() {
    let mut store = MockSequenceStore::new();
    store
        .expect_max_assigned()
        .return_once(|_| Ok(Some("abc".into())));
    store
        .expect_is_assigned()
        .withf(|_, candidate| candidate == "1")
        .return_once(|_, _| Ok(false));

    let allocator = allocator_over(Arc::new(store));
    let value = allocator.next(RecordKind::Animal).await.expect("allocates");
    assert_eq!(value.as_str(), "1");
}

#[tokio::test]
async fn probing_walks_past_taken_values() {
    let mut store = MockSequenceStore::new();
    store
        .expect_max_assigned()
        .return_once(|_| Ok(Some("5".into())));
    store
        .expect_is_assigned()
        .times(3)
        .returning(|_, candidate| Ok(matches!(candidate, "6" | "7")));

    let allocator = allocator_over(Arc::new(store));
    let value = allocator.next(RecordKind::Tutor).await.expect("allocates");
    assert_eq!(value.as_str(), "8");
}

#[tokio::test]
async fn reset_basis_still_respects_stored_rows() {
    // Parse failure resets the basis, but a stored "1" must not be reissued.
    let mut store = MockSequenceStore::new();
    store
        .expect_max_assigned()
        .return_once(|_| Ok(Some("abc".into())));
    store
        .expect_is_assigned()
        .times(2)
        .returning(|_, candidate| Ok(candidate == "1"));

    let allocator = allocator_over(Arc::new(store));
    let value = allocator.next(RecordKind::Tutor).await.expect("allocates");
    assert_eq!(value.as_str(), "2");
}

#[tokio::test]
async fn probing_is_bounded() {
    let mut store = MockSequenceStore::new();
    store
        .expect_max_assigned()
        .return_once(|_| Ok(Some("1".into())));
    store.expect_is_assigned().times(3).returning(|_, _| Ok(true));

    let allocator = allocator_over(Arc::new(store)).with_probe_limit(3);
    let error = allocator
        .next(RecordKind::Consult)
        .await
        .expect_err("exhausted");

    assert_eq!(
        error,
        AllocationError::Exhausted {
            kind: RecordKind::Consult,
            attempts: 3,
        }
    );
}

#[tokio::test]
async fn storage_failure_surfaces_as_unavailable() {
    let mut store = MockSequenceStore::new();
    store
        .expect_max_assigned()
        .return_once(|_| Err(SequenceStoreError::connection("refused")));

    let allocator = allocator_over(Arc::new(store));
    let error = allocator
        .next(RecordKind::Tutor)
        .await
        .expect_err("unavailable");

    assert!(matches!(
        error,
        AllocationError::Unavailable {
            kind: RecordKind::Tutor,
            ..
        }
    ));
}

#[tokio::test]
async fn clock_fallback_issues_timestamp_digits() {
    let mut store = MockSequenceStore::new();
    store
        .expect_max_assigned()
        .return_once(|_| Err(SequenceStoreError::query("timeout")));

    let mut clock = MockClock::new();
    let instant = Utc
        .timestamp_millis_opt(1_723_456_789_123)
        .single()
        .expect("valid timestamp");
    clock.expect_utc().return_const(instant);

    let allocator = SequenceAllocator::new(Arc::new(store), Arc::new(clock))
        .with_clock_fallback(true);
    let value = allocator.next(RecordKind::Animal).await.expect("fallback");

    assert_eq!(value.as_str(), "789123");
}

#[test]
fn sequence_values_reject_non_digits() {
    assert!(SequenceValue::new("123").is_ok());
    assert!(SequenceValue::new("").is_err());
    assert!(SequenceValue::new("12a").is_err());
    assert!(SequenceValue::new(" 12").is_err());
}
