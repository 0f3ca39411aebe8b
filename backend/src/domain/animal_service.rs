//! Animal domain service.

use std::sync::Arc;

use pagination::{PageEnvelope, PageRequest};
use serde_json::json;

use crate::domain::Error;
use crate::domain::animal::{Animal, AnimalDraft, AnimalId};
use crate::domain::normalize::normalize_sequence;
use crate::domain::ports::{AnimalRepository, AnimalRepositoryError, TutorRepository};
use crate::domain::sequence::{RecordKind, SequenceAllocator};
use crate::domain::tutor::TutorId;
use crate::domain::tutor_service::{self, MAX_INSERT_ATTEMPTS};

/// Use-cases over the animal aggregate.
#[derive(Clone)]
pub struct AnimalService {
    animals: Arc<dyn AnimalRepository>,
    tutors: Arc<dyn TutorRepository>,
    allocator: Arc<SequenceAllocator>,
}

impl AnimalService {
    /// Create a new service over the given repositories and allocator.
    pub fn new(
        animals: Arc<dyn AnimalRepository>,
        tutors: Arc<dyn TutorRepository>,
        allocator: Arc<SequenceAllocator>,
    ) -> Self {
        Self {
            animals,
            tutors,
            allocator,
        }
    }

    /// Register an animal under an existing tutor.
    ///
    /// An animal is a duplicate when the same tutor already has one with
    /// the same name, age, and species.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown tutor, `Conflict` for a duplicate animal,
    /// `ServiceUnavailable` when allocation fails or every insert attempt
    /// collides.
    pub async fn create(&self, tutor_id: &TutorId, draft: AnimalDraft) -> Result<Animal, Error> {
        self.require_tutor(tutor_id).await?;

        let duplicate = self
            .animals
            .find_duplicate(tutor_id, &draft.name, &draft.age, &draft.species)
            .await
            .map_err(map_repository_error)?;
        if duplicate.is_some() {
            return Err(
                Error::conflict("animal already registered for this tutor")
                    .with_details(json!({ "code": "animal_exists" })),
            );
        }

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let sequence = self.allocator.next(RecordKind::Animal).await?;
            match self.animals.insert(tutor_id, &draft, &sequence).await {
                Ok(animal) => return Ok(animal),
                Err(AnimalRepositoryError::DuplicateSequence { sequence }) => {
                    tracing::warn!(
                        sequence = %sequence,
                        attempt,
                        "animal sequence collided at insert; re-allocating"
                    );
                }
                Err(error) => return Err(map_repository_error(error)),
            }
        }

        Err(Error::service_unavailable(
            "could not assign a unique animal number",
        ))
    }

    /// Fetch an animal by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no animal has this id.
    pub async fn fetch(&self, id: &AnimalId) -> Result<Animal, Error> {
        self.animals
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("animal does not exist"))
    }

    /// Fetch an animal by its record number.
    ///
    /// The raw value is canonicalised with the sequence normalizer before
    /// the lookup.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an empty sequence, `NotFound` when no animal
    /// carries it.
    pub async fn fetch_by_sequence(&self, raw_sequence: &str) -> Result<Animal, Error> {
        let sequence = normalize_sequence(raw_sequence)
            .ok_or_else(|| Error::invalid_request("sequence must not be empty"))?;
        self.animals
            .find_by_sequence(&sequence)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("animal does not exist"))
    }

    /// One page of animals.
    pub async fn list(&self, page: PageRequest) -> Result<PageEnvelope<Animal>, Error> {
        let (items, total) = self
            .animals
            .list(page)
            .await
            .map_err(map_repository_error)?;
        Ok(PageEnvelope::new(items, total, page))
    }

    /// Every animal registered under a tutor.
    ///
    /// # Errors
    ///
    /// `NotFound` when the tutor does not exist.
    pub async fn list_by_tutor(&self, tutor_id: &TutorId) -> Result<Vec<Animal>, Error> {
        self.require_tutor(tutor_id).await?;
        self.animals
            .list_by_tutor(tutor_id)
            .await
            .map_err(map_repository_error)
    }

    /// Name-or-sequence search over non-deleted animals.
    pub async fn search(&self, query: &str, page: PageRequest) -> Result<Vec<Animal>, Error> {
        self.animals
            .search(query, page)
            .await
            .map_err(map_repository_error)
    }

    /// Soft-delete an animal.
    ///
    /// # Errors
    ///
    /// `NotFound` when no animal has this id.
    pub async fn remove(&self, id: &AnimalId) -> Result<(), Error> {
        let found = self
            .animals
            .mark_deleted(id)
            .await
            .map_err(map_repository_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found("animal does not exist"))
        }
    }

    async fn require_tutor(&self, tutor_id: &TutorId) -> Result<(), Error> {
        let tutor = self
            .tutors
            .find_by_id(tutor_id)
            .await
            .map_err(tutor_service::map_repository_error)?;
        if tutor.is_none() {
            return Err(Error::not_found("tutor does not exist"));
        }
        Ok(())
    }
}

/// Map animal repository failures to domain errors.
fn map_repository_error(error: AnimalRepositoryError) -> Error {
    match error {
        AnimalRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("animal repository unavailable: {message}"))
        }
        AnimalRepositoryError::Query { message } => {
            Error::internal(format!("animal repository error: {message}"))
        }
        AnimalRepositoryError::DuplicateSequence { sequence } => {
            Error::conflict(format!("animal sequence {sequence} is already assigned"))
        }
    }
}
