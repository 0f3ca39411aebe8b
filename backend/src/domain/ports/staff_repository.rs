//! Port for staff account persistence.

use async_trait::async_trait;

use crate::domain::staff::{Staff, StaffDraft};

use super::define_port_error;

define_port_error! {
    /// Errors raised by staff repository adapters.
    pub enum StaffRepositoryError {
        /// Storage connection could not be established.
        Connection { message: String } =>
            "staff repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "staff repository query failed: {message}",
        /// A unique column (cpf, email, registration) rejected the write.
        DuplicateField { field: String } =>
            "staff {field} is already in use",
    }
}

/// Port for staff account storage and retrieval.
///
/// Lookups match stored values exactly; callers pass values already
/// canonicalised by the normalizers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Insert a new staff account.
    async fn insert(&self, draft: &StaffDraft) -> Result<Staff, StaffRepositoryError>;

    /// Fetch an account by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, StaffRepositoryError>;

    /// Fetch an account by normalised CPF.
    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Staff>, StaffRepositoryError>;

    /// Fetch an account by canonicalised registration.
    async fn find_by_registration(
        &self,
        registration: &str,
    ) -> Result<Option<Staff>, StaffRepositoryError>;

    /// Case-insensitive name substring search over student accounts.
    async fn search_students(&self, query: &str) -> Result<Vec<Staff>, StaffRepositoryError>;
}
