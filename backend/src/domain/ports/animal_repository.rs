//! Port for animal persistence.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::animal::{Animal, AnimalDraft, AnimalId};
use crate::domain::sequence::SequenceValue;
use crate::domain::tutor::TutorId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by animal repository adapters.
    pub enum AnimalRepositoryError {
        /// Storage connection could not be established.
        Connection { message: String } =>
            "animal repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "animal repository query failed: {message}",
        /// The sequence unique index rejected the insert; re-allocate and retry.
        DuplicateSequence { sequence: String } =>
            "animal sequence {sequence} is already assigned",
    }
}

/// Port for animal storage and retrieval.
///
/// `search` covers the reception desk's combined lookup: it matches the
/// normalised query against name substrings and sequence prefixes of
/// non-deleted animals only, while the targeted finders also see deleted
/// rows (a deleted animal still owns its sequence).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimalRepository: Send + Sync {
    /// Insert a new animal under its tutor with the allocated sequence.
    async fn insert(
        &self,
        tutor_id: &TutorId,
        draft: &AnimalDraft,
        sequence: &SequenceValue,
    ) -> Result<Animal, AnimalRepositoryError>;

    /// Fetch an animal by primary key.
    async fn find_by_id(&self, id: &AnimalId) -> Result<Option<Animal>, AnimalRepositoryError>;

    /// Fetch an animal by its exact sequence value.
    async fn find_by_sequence(
        &self,
        sequence: &str,
    ) -> Result<Option<Animal>, AnimalRepositoryError>;

    /// Fetch an animal with the same name, age, and species under one tutor.
    async fn find_duplicate(
        &self,
        tutor_id: &TutorId,
        name: &str,
        age: &str,
        species: &str,
    ) -> Result<Option<Animal>, AnimalRepositoryError>;

    /// One page of animals plus the total count.
    async fn list(&self, page: PageRequest) -> Result<(Vec<Animal>, u64), AnimalRepositoryError>;

    /// Every animal registered under the given tutor.
    async fn list_by_tutor(
        &self,
        tutor_id: &TutorId,
    ) -> Result<Vec<Animal>, AnimalRepositoryError>;

    /// Name-or-sequence search over non-deleted animals, paged.
    async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Animal>, AnimalRepositoryError>;

    /// Soft-delete an animal; `false` when no such animal exists.
    async fn mark_deleted(&self, id: &AnimalId) -> Result<bool, AnimalRepositoryError>;
}
