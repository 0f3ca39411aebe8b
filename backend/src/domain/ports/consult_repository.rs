//! Port for consult persistence.

use async_trait::async_trait;

use crate::domain::consult::{Consult, ConsultDraft, ConsultId, ConsultUpdate};
use crate::domain::sequence::SequenceValue;
use crate::domain::tutor::TutorId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by consult repository adapters.
    pub enum ConsultRepositoryError {
        /// Storage connection could not be established.
        Connection { message: String } =>
            "consult repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "consult repository query failed: {message}",
        /// The sequence unique index rejected the insert; re-allocate and retry.
        DuplicateSequence { sequence: String } =>
            "consult sequence {sequence} is already assigned",
        /// No consult with the given id.
        Missing { id: String } =>
            "consult {id} does not exist",
    }
}

/// Port for consult storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConsultRepository: Send + Sync {
    /// Insert a new consult for a tutor with the allocated sequence.
    async fn insert(
        &self,
        tutor_id: &TutorId,
        draft: &ConsultDraft,
        sequence: &SequenceValue,
    ) -> Result<Consult, ConsultRepositoryError>;

    /// Fetch a consult by primary key.
    async fn find_by_id(&self, id: &ConsultId) -> Result<Option<Consult>, ConsultRepositoryError>;

    /// Consults not yet carried out, newest visit date first.
    async fn list_open(&self) -> Result<Vec<Consult>, ConsultRepositoryError>;

    /// Apply a partial update and return the stored result.
    async fn update(
        &self,
        id: &ConsultId,
        update: &ConsultUpdate,
    ) -> Result<Consult, ConsultRepositoryError>;

    /// Mark a consult as carried out; `false` when no such consult exists.
    async fn mark_done(&self, id: &ConsultId) -> Result<bool, ConsultRepositoryError>;
}
