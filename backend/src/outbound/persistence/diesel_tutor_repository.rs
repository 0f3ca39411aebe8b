//! PostgreSQL-backed `TutorRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{TutorRepository, TutorRepositoryError};
use crate::domain::sequence::SequenceValue;
use crate::domain::tutor::{Tutor, TutorDraft, TutorId, TutorUpdate};

use super::error_mapping::{DbFailure, classify, field_from_constraint, is_sequence_constraint};
use super::models::{NewTutorRow, TutorChangeset, TutorRow};
use super::pool::{DbPool, PoolError};
use super::schema::tutors;

/// Diesel-backed implementation of the `TutorRepository` port.
#[derive(Clone)]
pub struct DieselTutorRepository {
    pool: DbPool,
}

impl DieselTutorRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TutorRepositoryError {
    TutorRepositoryError::connection(error.to_string())
}

fn map_read_error(error: diesel::result::Error) -> TutorRepositoryError {
    match classify(error) {
        DbFailure::Connection(message) => TutorRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => {
            TutorRepositoryError::query("unexpected unique violation on read")
        }
        DbFailure::Query(message) => TutorRepositoryError::query(message),
    }
}

fn map_write_error(error: diesel::result::Error, sequence: &SequenceValue) -> TutorRepositoryError {
    match classify(error) {
        DbFailure::UniqueViolation { constraint } => {
            if is_sequence_constraint(constraint.as_deref()) {
                TutorRepositoryError::duplicate_sequence(sequence.as_str())
            } else {
                TutorRepositoryError::duplicate_field(field_from_constraint(
                    constraint.as_deref(),
                    "tutors",
                ))
            }
        }
        DbFailure::Connection(message) => TutorRepositoryError::connection(message),
        DbFailure::Query(message) => TutorRepositoryError::query(message),
    }
}

fn map_update_error(error: diesel::result::Error, id: &TutorId) -> TutorRepositoryError {
    match error {
        diesel::result::Error::NotFound => TutorRepositoryError::missing(id.to_string()),
        other => match classify(other) {
            DbFailure::UniqueViolation { constraint } => TutorRepositoryError::duplicate_field(
                field_from_constraint(constraint.as_deref(), "tutors"),
            ),
            DbFailure::Connection(message) => TutorRepositoryError::connection(message),
            DbFailure::Query(message) => TutorRepositoryError::query(message),
        },
    }
}

fn changeset<'a>(update: &'a TutorUpdate) -> TutorChangeset<'a> {
    TutorChangeset {
        name: update.name.as_deref(),
        cpf: update.cpf.as_deref(),
        email: update.email.as_deref(),
        phone: update.phone.as_deref(),
        address: update.address.as_deref(),
    }
}

#[async_trait]
impl TutorRepository for DieselTutorRepository {
    async fn insert(
        &self,
        draft: &TutorDraft,
        sequence: &SequenceValue,
    ) -> Result<Tutor, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTutorRow {
            id: Uuid::new_v4(),
            sequence: sequence.as_str(),
            name: &draft.name,
            cpf: draft.cpf.as_deref(),
            email: draft.email.as_deref(),
            phone: &draft.phone,
            address: draft.address.as_deref(),
        };

        let stored: TutorRow = diesel::insert_into(tutors::table)
            .values(&row)
            .returning(TutorRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_write_error(error, sequence))?;
        Ok(stored.into())
    }

    async fn find_by_id(&self, id: &TutorId) -> Result<Option<Tutor>, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tutors::table
            .find(*id.as_uuid())
            .select(TutorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Tutor::from))
    }

    async fn find_by_cpf_and_phone(
        &self,
        cpf: &str,
        phone: &str,
    ) -> Result<Option<Tutor>, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tutors::table
            .filter(tutors::cpf.eq(cpf))
            .filter(tutors::phone.eq(phone))
            .select(TutorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Tutor::from))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Tutor>, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tutors::table
            .filter(tutors::phone.eq(phone))
            .order(tutors::created_at.asc())
            .select(TutorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Tutor::from))
    }

    async fn find_by_phone_and_name(
        &self,
        phone: &str,
        name: &str,
    ) -> Result<Option<Tutor>, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = tutors::table
            .filter(tutors::phone.eq(phone))
            .filter(tutors::name.eq(name))
            .select(TutorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Tutor::from))
    }

    async fn list_active(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<Tutor>, u64), TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = tutors::table
            .filter(tutors::deleted.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read_error)?;

        let rows: Vec<TutorRow> = tutors::table
            .filter(tutors::deleted.eq(false))
            .order(tutors::created_at.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(TutorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        Ok((
            rows.into_iter().map(Tutor::from).collect(),
            u64::try_from(total).unwrap_or(0),
        ))
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Tutor>, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{query}%");
        let rows: Vec<TutorRow> = tutors::table
            .filter(tutors::name.ilike(pattern))
            .order(tutors::name.asc())
            .select(TutorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(Tutor::from).collect())
    }

    async fn search_by_phone(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Tutor>, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = format!("%{query}%");
        let rows: Vec<TutorRow> = tutors::table
            .filter(tutors::phone.like(pattern))
            .order(tutors::created_at.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(TutorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(Tutor::from).collect())
    }

    async fn update(
        &self,
        id: &TutorId,
        update: &TutorUpdate,
    ) -> Result<Tutor, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: TutorRow = diesel::update(tutors::table.find(*id.as_uuid()))
            .set(changeset(update))
            .returning(TutorRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_update_error(error, id))?;
        Ok(stored.into())
    }

    async fn mark_deleted(&self, id: &TutorId) -> Result<bool, TutorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(tutors::table.find(*id.as_uuid()))
            .set(tutors::deleted.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(affected > 0)
    }
}
