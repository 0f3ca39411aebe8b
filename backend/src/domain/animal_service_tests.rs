//! Tests for the animal service.

use std::sync::Arc;

use crate::domain::ErrorCode;
use crate::domain::animal::AnimalId;
use crate::domain::animal_service::AnimalService;
use crate::domain::ports::{MockAnimalRepository, MockTutorRepository};
use crate::domain::test_fixtures::{animal_draft, animal_from, empty_allocator, stored_tutor};
use crate::domain::tutor::TutorId;

fn service(animals: MockAnimalRepository, tutors: MockTutorRepository) -> AnimalService {
    AnimalService::new(Arc::new(animals), Arc::new(tutors), empty_allocator())
}

fn tutors_with_known_tutor() -> MockTutorRepository {
    let mut tutors = MockTutorRepository::new();
    tutors
        .expect_find_by_id()
        .returning(|_| Ok(Some(stored_tutor())));
    tutors
}

#[tokio::test]
async fn create_requires_an_existing_tutor() {
    let mut tutors = MockTutorRepository::new();
    tutors.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(MockAnimalRepository::new(), tutors)
        .create(&TutorId::random(), animal_draft())
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn duplicate_animal_is_a_conflict() {
    let mut animals = MockAnimalRepository::new();
    animals.expect_find_duplicate().return_once(|tutor_id, _, _, _| {
        let sequence = crate::domain::SequenceValue::new("4").expect("valid sequence");
        Ok(Some(animal_from(tutor_id, &animal_draft(), &sequence)))
    });

    let error = service(animals, tutors_with_known_tutor())
        .create(&TutorId::random(), animal_draft())
        .await
        .expect_err("conflict");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn create_allocates_from_the_animal_numbering_space() {
    let mut animals = MockAnimalRepository::new();
    animals.expect_find_duplicate().return_once(|_, _, _, _| Ok(None));
    animals
        .expect_insert()
        .withf(|_, draft, sequence| draft.name == "Rex" && sequence.as_str() == "1")
        .return_once(|tutor_id, draft, sequence| Ok(animal_from(tutor_id, draft, sequence)));

    let created = service(animals, tutors_with_known_tutor())
        .create(&TutorId::random(), animal_draft())
        .await
        .expect("creates");
    assert_eq!(created.sequence.as_ref().map(|s| s.as_str()), Some("1"));
}

#[tokio::test]
async fn fetch_by_sequence_canonicalises_the_query() {
    let mut animals = MockAnimalRepository::new();
    animals
        .expect_find_by_sequence()
        .withf(|sequence| sequence == "7")
        .return_once(|_| {
            let sequence = crate::domain::SequenceValue::new("7").expect("valid sequence");
            let draft = animal_draft();
            Ok(Some(animal_from(&TutorId::random(), &draft, &sequence)))
        });

    let found = service(animals, MockTutorRepository::new())
        .fetch_by_sequence("  7 ")
        .await
        .expect("finds");
    assert_eq!(found.sequence.as_ref().map(|s| s.as_str()), Some("7"));
}

#[tokio::test]
async fn blank_sequence_lookup_is_invalid() {
    let error = service(MockAnimalRepository::new(), MockTutorRepository::new())
        .fetch_by_sequence("   ")
        .await
        .expect_err("invalid");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn listing_by_tutor_requires_the_tutor() {
    let mut tutors = MockTutorRepository::new();
    tutors.expect_find_by_id().return_once(|_| Ok(None));

    let error = service(MockAnimalRepository::new(), tutors)
        .list_by_tutor(&TutorId::random())
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn remove_missing_animal_is_not_found() {
    let mut animals = MockAnimalRepository::new();
    animals.expect_mark_deleted().return_once(|_| Ok(false));

    let error = service(animals, MockTutorRepository::new())
        .remove(&AnimalId::random())
        .await
        .expect_err("not found");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn tutor_and_animal_numbering_spaces_are_independent() {
    // A fresh allocator hands "1" to the first animal even after a tutor
    // already took "1" from its own space.
    let allocator = empty_allocator();
    let tutor_sequence = allocator
        .next(crate::domain::RecordKind::Tutor)
        .await
        .expect("allocates");
    assert_eq!(tutor_sequence.as_str(), "1");

    let mut animals = MockAnimalRepository::new();
    animals.expect_find_duplicate().return_once(|_, _, _, _| Ok(None));
    animals
        .expect_insert()
        .withf(|_, _, sequence| sequence.as_str() == "1")
        .return_once(|tutor_id, draft, sequence| Ok(animal_from(tutor_id, draft, sequence)));

    let mut tutors = MockTutorRepository::new();
    tutors
        .expect_find_by_id()
        .returning(|_| Ok(Some(stored_tutor())));

    let service = AnimalService::new(Arc::new(animals), Arc::new(tutors), allocator);
    service
        .create(&TutorId::random(), animal_draft())
        .await
        .expect("creates");
}
