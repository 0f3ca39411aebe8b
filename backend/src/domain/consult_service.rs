//! Consult domain service.
//!
//! Booking a consult can register the tutor on the fly: a phone booking
//! from a new tutor creates the tutor row (with its own sequence number)
//! and the consult row (with another) in one use-case.

use std::sync::Arc;

use serde_json::json;

use crate::domain::Error;
use crate::domain::consult::{Consult, ConsultDraft, ConsultId, ConsultUpdate};
use crate::domain::ports::{
    ConsultRepository, ConsultRepositoryError, TutorRepository, TutorRepositoryError,
};
use crate::domain::sequence::{RecordKind, SequenceAllocator};
use crate::domain::tutor::{Tutor, TutorDraft, TutorId};
use crate::domain::tutor_service::{self, MAX_INSERT_ATTEMPTS};

/// Use-cases over the consult aggregate.
#[derive(Clone)]
pub struct ConsultService {
    consults: Arc<dyn ConsultRepository>,
    tutors: Arc<dyn TutorRepository>,
    allocator: Arc<SequenceAllocator>,
}

impl ConsultService {
    /// Create a new service over the given repositories and allocator.
    pub fn new(
        consults: Arc<dyn ConsultRepository>,
        tutors: Arc<dyn TutorRepository>,
        allocator: Arc<SequenceAllocator>,
    ) -> Self {
        Self {
            consults,
            tutors,
            allocator,
        }
    }

    /// Book a consult for a tutor not yet registered.
    ///
    /// Registers the tutor first (name and phone only), then the consult
    /// under the fresh tutor. Each row gets a sequence from its own
    /// numbering space.
    ///
    /// # Errors
    ///
    /// `Conflict` when a tutor with the same phone and name already exists,
    /// `InvalidRequest` for an unusable tutor name, `ServiceUnavailable` on
    /// allocation failure.
    pub async fn create_with_new_tutor(
        &self,
        tutor_name: &str,
        draft: ConsultDraft,
    ) -> Result<Consult, Error> {
        let tutor_name = tutor_name.trim();
        if tutor_name.is_empty() {
            return Err(Error::invalid_request("tutor name must not be empty"));
        }

        let existing = self
            .tutors
            .find_by_phone_and_name(&draft.phone, tutor_name)
            .await
            .map_err(tutor_service::map_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict("tutor already registered")
                .with_details(json!({ "code": "tutor_exists" })));
        }

        let tutor_draft = TutorDraft::new(tutor_name, None, None, &draft.phone, None)
            .map_err(|error| Error::invalid_request(error.to_string()))?;
        let tutor = self.register_tutor(&tutor_draft).await?;

        self.insert_consult(&tutor.id, &draft).await
    }

    /// Book a consult for an already-registered tutor.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown tutor, `ServiceUnavailable` on allocation
    /// failure.
    pub async fn create_for_tutor(
        &self,
        tutor_id: &TutorId,
        draft: ConsultDraft,
    ) -> Result<Consult, Error> {
        let tutor = self
            .tutors
            .find_by_id(tutor_id)
            .await
            .map_err(tutor_service::map_repository_error)?;
        if tutor.is_none() {
            return Err(Error::not_found("tutor does not exist"));
        }

        self.insert_consult(tutor_id, &draft).await
    }

    /// Consults not yet carried out, newest visit date first.
    pub async fn list_open(&self) -> Result<Vec<Consult>, Error> {
        self.consults
            .list_open()
            .await
            .map_err(map_repository_error)
    }

    /// Fetch a consult by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no consult has this id.
    pub async fn fetch(&self, id: &ConsultId) -> Result<Consult, Error> {
        self.consults
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("consult does not exist"))
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an empty update, `NotFound` for an unknown id.
    pub async fn update(&self, id: &ConsultId, update: ConsultUpdate) -> Result<Consult, Error> {
        if update.is_empty() {
            return Err(Error::invalid_request("update carries no fields"));
        }
        self.consults
            .update(id, &update)
            .await
            .map_err(map_repository_error)
    }

    /// Mark a consult as carried out.
    ///
    /// # Errors
    ///
    /// `NotFound` when no consult has this id.
    pub async fn mark_done(&self, id: &ConsultId) -> Result<(), Error> {
        let found = self
            .consults
            .mark_done(id)
            .await
            .map_err(map_repository_error)?;
        if found {
            Ok(())
        } else {
            Err(Error::not_found("consult does not exist"))
        }
    }

    async fn register_tutor(&self, draft: &TutorDraft) -> Result<Tutor, Error> {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let sequence = self.allocator.next(RecordKind::Tutor).await?;
            match self.tutors.insert(draft, &sequence).await {
                Ok(tutor) => return Ok(tutor),
                Err(TutorRepositoryError::DuplicateSequence { sequence }) => {
                    tracing::warn!(
                        sequence = %sequence,
                        attempt,
                        "tutor sequence collided at insert; re-allocating"
                    );
                }
                Err(error) => return Err(tutor_service::map_repository_error(error)),
            }
        }
        Err(Error::service_unavailable(
            "could not assign a unique tutor number",
        ))
    }

    async fn insert_consult(
        &self,
        tutor_id: &TutorId,
        draft: &ConsultDraft,
    ) -> Result<Consult, Error> {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let sequence = self.allocator.next(RecordKind::Consult).await?;
            match self.consults.insert(tutor_id, draft, &sequence).await {
                Ok(consult) => return Ok(consult),
                Err(ConsultRepositoryError::DuplicateSequence { sequence }) => {
                    tracing::warn!(
                        sequence = %sequence,
                        attempt,
                        "consult sequence collided at insert; re-allocating"
                    );
                }
                Err(error) => return Err(map_repository_error(error)),
            }
        }
        Err(Error::service_unavailable(
            "could not assign a unique consult number",
        ))
    }
}

/// Map consult repository failures to domain errors.
fn map_repository_error(error: ConsultRepositoryError) -> Error {
    match error {
        ConsultRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("consult repository unavailable: {message}"))
        }
        ConsultRepositoryError::Query { message } => {
            Error::internal(format!("consult repository error: {message}"))
        }
        ConsultRepositoryError::DuplicateSequence { sequence } => {
            Error::conflict(format!("consult sequence {sequence} is already assigned"))
        }
        ConsultRepositoryError::Missing { .. } => Error::not_found("consult does not exist"),
    }
}
