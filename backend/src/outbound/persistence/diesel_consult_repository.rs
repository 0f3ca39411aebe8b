//! PostgreSQL-backed `ConsultRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::consult::{Consult, ConsultDraft, ConsultId, ConsultUpdate};
use crate::domain::ports::{ConsultRepository, ConsultRepositoryError};
use crate::domain::sequence::SequenceValue;
use crate::domain::tutor::TutorId;

use super::error_mapping::{DbFailure, classify, is_sequence_constraint};
use super::models::{ConsultChangeset, ConsultRow, NewConsultRow};
use super::pool::{DbPool, PoolError};
use super::schema::consults;

/// Diesel-backed implementation of the `ConsultRepository` port.
#[derive(Clone)]
pub struct DieselConsultRepository {
    pool: DbPool,
}

impl DieselConsultRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ConsultRepositoryError {
    ConsultRepositoryError::connection(error.to_string())
}

fn map_read_error(error: diesel::result::Error) -> ConsultRepositoryError {
    match classify(error) {
        DbFailure::Connection(message) => ConsultRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => {
            ConsultRepositoryError::query("unexpected unique violation on read")
        }
        DbFailure::Query(message) => ConsultRepositoryError::query(message),
    }
}

fn map_write_error(
    error: diesel::result::Error,
    sequence: &SequenceValue,
) -> ConsultRepositoryError {
    match classify(error) {
        DbFailure::UniqueViolation { constraint }
            if is_sequence_constraint(constraint.as_deref()) =>
        {
            ConsultRepositoryError::duplicate_sequence(sequence.as_str())
        }
        DbFailure::UniqueViolation { .. } => {
            ConsultRepositoryError::query("unexpected unique violation on insert")
        }
        DbFailure::Connection(message) => ConsultRepositoryError::connection(message),
        DbFailure::Query(message) => ConsultRepositoryError::query(message),
    }
}

fn changeset<'a>(update: &'a ConsultUpdate) -> ConsultChangeset<'a> {
    ConsultChangeset {
        animal_name: update.animal_name.as_deref(),
        species: update.species.as_deref(),
        phone: update.phone.as_deref(),
        description: update.description.as_deref(),
        date: update.date,
    }
}

#[async_trait]
impl ConsultRepository for DieselConsultRepository {
    async fn insert(
        &self,
        tutor_id: &TutorId,
        draft: &ConsultDraft,
        sequence: &SequenceValue,
    ) -> Result<Consult, ConsultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewConsultRow {
            id: Uuid::new_v4(),
            sequence: sequence.as_str(),
            animal_name: &draft.animal_name,
            species: &draft.species,
            phone: &draft.phone,
            description: draft.description.as_deref(),
            date: draft.date,
            tutor_id: *tutor_id.as_uuid(),
        };

        let stored: ConsultRow = diesel::insert_into(consults::table)
            .values(&row)
            .returning(ConsultRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_write_error(error, sequence))?;
        Ok(stored.into())
    }

    async fn find_by_id(
        &self,
        id: &ConsultId,
    ) -> Result<Option<Consult>, ConsultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = consults::table
            .find(*id.as_uuid())
            .select(ConsultRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Consult::from))
    }

    async fn list_open(&self) -> Result<Vec<Consult>, ConsultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ConsultRow> = consults::table
            .filter(consults::done.eq(false))
            .order(consults::date.desc())
            .select(ConsultRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(Consult::from).collect())
    }

    async fn update(
        &self,
        id: &ConsultId,
        update: &ConsultUpdate,
    ) -> Result<Consult, ConsultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored: ConsultRow = diesel::update(consults::table.find(*id.as_uuid()))
            .set(changeset(update))
            .returning(ConsultRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| match error {
                diesel::result::Error::NotFound => {
                    ConsultRepositoryError::missing(id.to_string())
                }
                other => map_read_error(other),
            })?;
        Ok(stored.into())
    }

    async fn mark_done(&self, id: &ConsultId) -> Result<bool, ConsultRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(consults::table.find(*id.as_uuid()))
            .set(consults::done.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(affected > 0)
    }
}
