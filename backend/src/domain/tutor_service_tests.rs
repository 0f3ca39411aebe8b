//! Tests for the tutor service.

use std::sync::{Arc, Mutex as StdMutex};

use crate::domain::ErrorCode;
use crate::domain::ports::{MockSequenceStore, MockTutorRepository, TutorRepositoryError};
use crate::domain::sequence::SequenceAllocator;
use crate::domain::test_fixtures::{empty_allocator, stored_tutor, tutor_draft, tutor_from};
use crate::domain::tutor::{TutorDraft, TutorId, TutorUpdate};
use crate::domain::tutor_service::TutorService;

use mockable::DefaultClock;
use pagination::PageRequest;

fn service(repo: MockTutorRepository) -> TutorService {
    TutorService::new(Arc::new(repo), empty_allocator())
}

#[tokio::test]
async fn create_allocates_the_first_sequence() {
    let mut repo = MockTutorRepository::new();
    repo.expect_find_by_phone()
        .withf(|phone| phone == "11988887777")
        .return_once(|_| Ok(None));
    repo.expect_insert()
        .withf(|_, sequence| sequence.as_str() == "1")
        .return_once(|draft, sequence| Ok(tutor_from(draft, sequence)));

    let created = service(repo).create(tutor_draft()).await.expect("creates");
    assert_eq!(created.sequence.as_ref().map(|s| s.as_str()), Some("1"));
}

#[tokio::test]
async fn cpf_present_switches_the_duplicate_check() {
    let draft = TutorDraft::new(
        "Maria Souza",
        Some("529.982.247-25"),
        None,
        "11988887777",
        None,
    )
    .expect("valid draft");

    let mut repo = MockTutorRepository::new();
    repo.expect_find_by_cpf_and_phone()
        .withf(|cpf, phone| cpf == "52998224725" && phone == "11988887777")
        .return_once(|_, _| Ok(None));
    repo.expect_insert()
        .return_once(|draft, sequence| Ok(tutor_from(draft, sequence)));

    service(repo).create(draft).await.expect("creates");
}

#[tokio::test]
async fn duplicate_tutor_is_a_conflict() {
    let mut repo = MockTutorRepository::new();
    repo.expect_find_by_phone()
        .return_once(|_| Ok(Some(stored_tutor())));

    let error = service(repo)
        .create(tutor_draft())
        .await
        .expect_err("conflict");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn sequence_collision_reallocates_and_retries() {
    let mut repo = MockTutorRepository::new();
    repo.expect_find_by_phone().return_once(|_| Ok(None));
    repo.expect_insert()
        .times(2)
        .returning(|draft, sequence| {
            if sequence.as_str() == "1" {
                Err(TutorRepositoryError::duplicate_sequence("1"))
            } else {
                Ok(tutor_from(draft, sequence))
            }
        });

    let created = service(repo).create(tutor_draft()).await.expect("creates");
    assert_eq!(created.sequence.as_ref().map(|s| s.as_str()), Some("2"));
}

#[tokio::test]
async fn create_gives_up_after_bounded_collisions() {
    let mut repo = MockTutorRepository::new();
    repo.expect_find_by_phone().return_once(|_| Ok(None));
    repo.expect_insert()
        .times(3)
        .returning(|_, sequence| {
            Err(TutorRepositoryError::duplicate_sequence(sequence.as_str()))
        });

    let error = service(repo)
        .create(tutor_draft())
        .await
        .expect_err("exhausted");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn allocation_failure_maps_to_service_unavailable() {
    let mut repo = MockTutorRepository::new();
    repo.expect_find_by_phone().return_once(|_| Ok(None));

    let mut store = MockSequenceStore::new();
    store
        .expect_max_assigned()
        .return_once(|_| Err(crate::domain::ports::SequenceStoreError::connection("down")));

    let service = TutorService::new(
        Arc::new(repo),
        Arc::new(SequenceAllocator::new(
            Arc::new(store),
            Arc::new(DefaultClock),
        )),
    );

    let error = service.create(tutor_draft()).await.expect_err("unavailable");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn back_to_back_creations_number_in_order() {
    let issued = Arc::new(StdMutex::new(Vec::new()));
    let record = issued.clone();

    let mut repo = MockTutorRepository::new();
    repo.expect_find_by_phone().times(3).returning(|_| Ok(None));
    repo.expect_insert().times(3).returning(move |draft, sequence| {
        record
            .lock()
            .expect("issued lock")
            .push(sequence.as_str().to_owned());
        Ok(tutor_from(draft, sequence))
    });

    let service = service(repo);
    for _ in 0..3 {
        service.create(tutor_draft()).await.expect("creates");
    }

    assert_eq!(*issued.lock().expect("issued lock"), ["1", "2", "3"]);
}

#[tokio::test]
async fn fetch_missing_tutor_is_not_found() {
    let mut repo = MockTutorRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(repo)
        .fetch(&TutorId::random())
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn list_wraps_items_in_a_page_envelope() {
    let mut repo = MockTutorRepository::new();
    repo.expect_list_active()
        .return_once(|_| Ok((vec![stored_tutor()], 11)));

    let page = PageRequest::new(1, 10).expect("valid page");
    let envelope = service(repo).list(page).await.expect("lists");
    assert_eq!(envelope.items.len(), 1);
    assert_eq!(envelope.number_of_pages, 2);
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let repo = MockTutorRepository::new();
    let error = service(repo)
        .update(&TutorId::random(), TutorUpdate::default())
        .await
        .expect_err("invalid");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn remove_missing_tutor_is_not_found() {
    let mut repo = MockTutorRepository::new();
    repo.expect_mark_deleted().return_once(|_| Ok(false));

    let error = service(repo)
        .remove(&TutorId::random())
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}
