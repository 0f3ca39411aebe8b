//! Staff domain service: account registration and authentication.

use std::sync::Arc;

use serde_json::json;

use crate::domain::Error;
use crate::domain::normalize::normalize_email;
use crate::domain::ports::{StaffRepository, StaffRepositoryError};
use crate::domain::staff::{Staff, StaffDraft};

/// Use-cases over staff accounts.
#[derive(Clone)]
pub struct StaffService {
    staff: Arc<dyn StaffRepository>,
}

impl StaffService {
    /// Create a new service over the given repository.
    pub fn new(staff: Arc<dyn StaffRepository>) -> Self {
        Self { staff }
    }

    /// Register a staff account.
    ///
    /// CPF, email, and registration are checked for uniqueness before the
    /// insert; the unique indexes remain the backstop for races, surfacing
    /// as the same `Conflict`.
    ///
    /// # Errors
    ///
    /// `Conflict` naming the colliding field.
    pub async fn register(&self, draft: StaffDraft) -> Result<Staff, Error> {
        if self
            .staff
            .find_by_cpf(&draft.cpf)
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Err(field_in_use("cpf"));
        }
        if let Some(email) = &draft.email {
            if self
                .staff
                .find_by_email(email)
                .await
                .map_err(map_repository_error)?
                .is_some()
            {
                return Err(field_in_use("email"));
            }
        }
        if let Some(registration) = &draft.registration {
            if self
                .staff
                .find_by_registration(registration)
                .await
                .map_err(map_repository_error)?
                .is_some()
            {
                return Err(field_in_use("registration"));
            }
        }

        self.staff
            .insert(&draft)
            .await
            .map_err(map_repository_error)
    }

    /// Authenticate a login attempt by email and password.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for an unknown email or a wrong password; the two
    /// cases are indistinguishable on purpose.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Staff, Error> {
        let Some(email) = normalize_email(email) else {
            return Err(invalid_credentials());
        };
        let Some(account) = self
            .staff
            .find_by_email(&email)
            .await
            .map_err(map_repository_error)?
        else {
            return Err(invalid_credentials());
        };
        if !account.password.verify(password) {
            return Err(invalid_credentials());
        }
        Ok(account)
    }

    /// Case-insensitive student name search.
    pub async fn search_students(&self, query: &str) -> Result<Vec<Staff>, Error> {
        self.staff
            .search_students(query)
            .await
            .map_err(map_repository_error)
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

fn field_in_use(field: &str) -> Error {
    Error::conflict(format!("staff {field} is already in use"))
        .with_details(json!({ "field": field, "code": "field_in_use" }))
}

/// Map staff repository failures to domain errors.
fn map_repository_error(error: StaffRepositoryError) -> Error {
    match error {
        StaffRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("staff repository unavailable: {message}"))
        }
        StaffRepositoryError::Query { message } => {
            Error::internal(format!("staff repository error: {message}"))
        }
        StaffRepositoryError::DuplicateField { field } => field_in_use(&field),
    }
}
