//! Port for tutor persistence.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::sequence::SequenceValue;
use crate::domain::tutor::{Tutor, TutorDraft, TutorId, TutorUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tutor repository adapters.
    pub enum TutorRepositoryError {
        /// Storage connection could not be established.
        Connection { message: String } =>
            "tutor repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "tutor repository query failed: {message}",
        /// The sequence unique index rejected the insert; re-allocate and retry.
        DuplicateSequence { sequence: String } =>
            "tutor sequence {sequence} is already assigned",
        /// Another unique column (cpf, email) rejected the write.
        DuplicateField { field: String } =>
            "tutor {field} is already in use",
        /// No tutor with the given id.
        Missing { id: String } =>
            "tutor {id} does not exist",
    }
}

/// Port for tutor storage and retrieval.
///
/// Lookups match stored values exactly; callers are expected to pass values
/// already canonicalised by the normalizers. Soft-deleted tutors stay
/// visible to duplicate checks and by-id lookups; only `list_active`
/// filters them out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TutorRepository: Send + Sync {
    /// Insert a new tutor with its allocated sequence number.
    async fn insert(
        &self,
        draft: &TutorDraft,
        sequence: &SequenceValue,
    ) -> Result<Tutor, TutorRepositoryError>;

    /// Fetch a tutor by primary key.
    async fn find_by_id(&self, id: &TutorId) -> Result<Option<Tutor>, TutorRepositoryError>;

    /// Fetch the tutor matching both CPF and phone, if any.
    async fn find_by_cpf_and_phone(
        &self,
        cpf: &str,
        phone: &str,
    ) -> Result<Option<Tutor>, TutorRepositoryError>;

    /// Fetch the first tutor with the given phone, if any.
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Tutor>, TutorRepositoryError>;

    /// Fetch the tutor matching both phone and exact name, if any.
    async fn find_by_phone_and_name(
        &self,
        phone: &str,
        name: &str,
    ) -> Result<Option<Tutor>, TutorRepositoryError>;

    /// One page of non-deleted tutors plus the total non-deleted count.
    async fn list_active(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<Tutor>, u64), TutorRepositoryError>;

    /// Case-insensitive name substring search.
    async fn search_by_name(&self, query: &str) -> Result<Vec<Tutor>, TutorRepositoryError>;

    /// Phone substring search, paged.
    async fn search_by_phone(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Tutor>, TutorRepositoryError>;

    /// Apply a partial update and return the stored result.
    async fn update(
        &self,
        id: &TutorId,
        update: &TutorUpdate,
    ) -> Result<Tutor, TutorRepositoryError>;

    /// Soft-delete a tutor; `false` when no such tutor exists.
    async fn mark_deleted(&self, id: &TutorId) -> Result<bool, TutorRepositoryError>;
}
