//! PostgreSQL-backed `StaffRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{StaffRepository, StaffRepositoryError};
use crate::domain::staff::{Staff, StaffDraft, StaffRole};

use super::error_mapping::{DbFailure, classify, field_from_constraint};
use super::models::{NewStaffRow, StaffRow};
use super::pool::{DbPool, PoolError};
use super::schema::staff;

/// Diesel-backed implementation of the `StaffRepository` port.
#[derive(Clone)]
pub struct DieselStaffRepository {
    pool: DbPool,
}

impl DieselStaffRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StaffRepositoryError {
    StaffRepositoryError::connection(error.to_string())
}

fn map_read_error(error: diesel::result::Error) -> StaffRepositoryError {
    match classify(error) {
        DbFailure::Connection(message) => StaffRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => {
            StaffRepositoryError::query("unexpected unique violation on read")
        }
        DbFailure::Query(message) => StaffRepositoryError::query(message),
    }
}

fn map_write_error(error: diesel::result::Error) -> StaffRepositoryError {
    match classify(error) {
        DbFailure::UniqueViolation { constraint } => StaffRepositoryError::duplicate_field(
            field_from_constraint(constraint.as_deref(), "staff"),
        ),
        DbFailure::Connection(message) => StaffRepositoryError::connection(message),
        DbFailure::Query(message) => StaffRepositoryError::query(message),
    }
}

#[async_trait]
impl StaffRepository for DieselStaffRepository {
    async fn insert(&self, draft: &StaffDraft) -> Result<Staff, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewStaffRow {
            id: Uuid::new_v4(),
            role: draft.role.as_str(),
            name: &draft.name,
            cpf: &draft.cpf,
            email: draft.email.as_deref(),
            phone: draft.phone.as_deref(),
            registration: draft.registration.as_deref(),
            password_digest: draft.password.as_str(),
        };

        let stored: StaffRow = diesel::insert_into(staff::table)
            .values(&row)
            .returning(StaffRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_write_error)?;
        stored.try_into()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Staff>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = staff::table
            .filter(staff::email.eq(email))
            .select(StaffRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(Staff::try_from).transpose()
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<Staff>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = staff::table
            .filter(staff::cpf.eq(cpf))
            .select(StaffRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(Staff::try_from).transpose()
    }

    async fn find_by_registration(
        &self,
        registration: &str,
    ) -> Result<Option<Staff>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = staff::table
            .filter(staff::registration.eq(registration))
            .select(StaffRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        row.map(Staff::try_from).transpose()
    }

    async fn search_students(&self, query: &str) -> Result<Vec<Staff>, StaffRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{query}%");
        let rows: Vec<StaffRow> = staff::table
            .filter(staff::role.eq(StaffRole::Student.as_str()))
            .filter(staff::name.ilike(pattern))
            .order(staff::name.asc())
            .select(StaffRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(Staff::try_from).collect()
    }
}
