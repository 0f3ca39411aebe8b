//! Tutor domain service.
//!
//! Owns tutor registration and retrieval. Registration is where the
//! sequence allocator meets the unique index: the service allocates a
//! number, attempts the insert, and re-allocates on a sequence collision a
//! bounded number of times before giving up with a retryable error.

use std::sync::Arc;

use pagination::{PageEnvelope, PageRequest};
use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{TutorRepository, TutorRepositoryError};
use crate::domain::sequence::{RecordKind, SequenceAllocator};
use crate::domain::tutor::{Tutor, TutorDraft, TutorId, TutorUpdate};

/// Bound on insert attempts after sequence collisions.
pub(crate) const MAX_INSERT_ATTEMPTS: u32 = 3;

/// Use-cases over the tutor aggregate.
#[derive(Clone)]
pub struct TutorService {
    tutors: Arc<dyn TutorRepository>,
    allocator: Arc<SequenceAllocator>,
}

impl TutorService {
    /// Create a new service over the given repository and allocator.
    pub fn new(tutors: Arc<dyn TutorRepository>, allocator: Arc<SequenceAllocator>) -> Self {
        Self { tutors, allocator }
    }

    /// Register a new tutor.
    ///
    /// Duplicate detection follows the intake rules: when a CPF is present
    /// the tutor is considered already registered only if CPF *and* phone
    /// match an existing row; without a CPF the phone alone identifies the
    /// tutor.
    ///
    /// # Errors
    ///
    /// `Conflict` for an already-registered tutor, `ServiceUnavailable`
    /// when allocation fails or every insert attempt collides.
    pub async fn create(&self, draft: TutorDraft) -> Result<Tutor, Error> {
        let existing = match &draft.cpf {
            Some(cpf) => {
                self.tutors
                    .find_by_cpf_and_phone(cpf, &draft.phone)
                    .await
                    .map_err(map_repository_error)?
            }
            None => self
                .tutors
                .find_by_phone(&draft.phone)
                .await
                .map_err(map_repository_error)?,
        };
        if existing.is_some() {
            return Err(Error::conflict("tutor already registered")
                .with_details(json!({ "code": "tutor_exists" })));
        }

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let sequence = self.allocator.next(RecordKind::Tutor).await?;
            match self.tutors.insert(&draft, &sequence).await {
                Ok(tutor) => return Ok(tutor),
                Err(TutorRepositoryError::DuplicateSequence { sequence }) => {
                    tracing::warn!(
                        sequence = %sequence,
                        attempt,
                        "tutor sequence collided at insert; re-allocating"
                    );
                }
                Err(error) => return Err(map_repository_error(error)),
            }
        }

        Err(Error::service_unavailable(
            "could not assign a unique tutor number",
        ))
    }

    /// Fetch a tutor by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no tutor has this id.
    pub async fn fetch(&self, id: &TutorId) -> Result<Tutor, Error> {
        self.tutors
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("tutor does not exist"))
    }

    /// One page of non-deleted tutors.
    pub async fn list(&self, page: PageRequest) -> Result<PageEnvelope<Tutor>, Error> {
        let (items, total) = self
            .tutors
            .list_active(page)
            .await
            .map_err(map_repository_error)?;
        Ok(PageEnvelope::new(items, total, page))
    }

    /// Case-insensitive name search.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<Tutor>, Error> {
        self.tutors
            .search_by_name(query)
            .await
            .map_err(map_repository_error)
    }

    /// Phone prefix search, paged.
    pub async fn search_by_phone(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Tutor>, Error> {
        self.tutors
            .search_by_phone(query, page)
            .await
            .map_err(map_repository_error)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an empty update, `NotFound` for an unknown id,
    /// `Conflict` when the new CPF or email is already in use.
    pub async fn update(&self, id: &TutorId, update: TutorUpdate) -> Result<Tutor, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("update carries no fields"));
        }
        self.tutors
            .update(id, &update)
            .await
            .map_err(map_repository_error)
    }

    /// Soft-delete a tutor.
    ///
    /// # Errors
    ///
    /// `NotFound` when no tutor has this id.
    pub async fn remove(&self, id: &TutorId) -> Result<(), Error> {
        let found = self
            .tutors
            .mark_deleted(id)
            .await
            .map_err(map_repository_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found("tutor does not exist"))
        }
    }
}

/// Map tutor repository failures to domain errors.
pub(crate) fn map_repository_error(error: TutorRepositoryError) -> Error {
    match error {
        TutorRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("tutor repository unavailable: {message}"))
        }
        TutorRepositoryError::Query { message } => {
            Error::internal(format!("tutor repository error: {message}"))
        }
        TutorRepositoryError::DuplicateSequence { sequence } => {
            Error::conflict(format!("tutor sequence {sequence} is already assigned"))
        }
        TutorRepositoryError::DuplicateField { field } => {
            Error::conflict(format!("tutor {field} is already in use"))
                .with_details(json!({ "field": field, "code": "field_in_use" }))
        }
        TutorRepositoryError::Missing { .. } => Error::not_found("tutor does not exist"),
    }
}
