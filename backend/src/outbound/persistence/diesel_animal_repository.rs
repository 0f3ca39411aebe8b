//! PostgreSQL-backed `AnimalRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::animal::{Animal, AnimalDraft, AnimalId};
use crate::domain::ports::{AnimalRepository, AnimalRepositoryError};
use crate::domain::sequence::SequenceValue;
use crate::domain::tutor::TutorId;

use super::error_mapping::{DbFailure, classify, is_sequence_constraint};
use super::models::{AnimalRow, NewAnimalRow};
use super::pool::{DbPool, PoolError};
use super::schema::animals;

/// Diesel-backed implementation of the `AnimalRepository` port.
#[derive(Clone)]
pub struct DieselAnimalRepository {
    pool: DbPool,
}

impl DieselAnimalRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AnimalRepositoryError {
    AnimalRepositoryError::connection(error.to_string())
}

fn map_read_error(error: diesel::result::Error) -> AnimalRepositoryError {
    match classify(error) {
        DbFailure::Connection(message) => AnimalRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => {
            AnimalRepositoryError::query("unexpected unique violation on read")
        }
        DbFailure::Query(message) => AnimalRepositoryError::query(message),
    }
}

fn map_write_error(
    error: diesel::result::Error,
    sequence: &SequenceValue,
) -> AnimalRepositoryError {
    match classify(error) {
        DbFailure::UniqueViolation { constraint }
            if is_sequence_constraint(constraint.as_deref()) =>
        {
            AnimalRepositoryError::duplicate_sequence(sequence.as_str())
        }
        DbFailure::UniqueViolation { .. } => {
            AnimalRepositoryError::query("unexpected unique violation on insert")
        }
        DbFailure::Connection(message) => AnimalRepositoryError::connection(message),
        DbFailure::Query(message) => AnimalRepositoryError::query(message),
    }
}

#[async_trait]
impl AnimalRepository for DieselAnimalRepository {
    async fn insert(
        &self,
        tutor_id: &TutorId,
        draft: &AnimalDraft,
        sequence: &SequenceValue,
    ) -> Result<Animal, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAnimalRow {
            id: Uuid::new_v4(),
            sequence: sequence.as_str(),
            name: &draft.name,
            species: &draft.species,
            race: draft.race.as_deref(),
            gender: &draft.gender,
            age: &draft.age,
            coat: draft.coat.as_deref(),
            tutor_id: *tutor_id.as_uuid(),
        };

        let stored: AnimalRow = diesel::insert_into(animals::table)
            .values(&row)
            .returning(AnimalRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_write_error(error, sequence))?;
        Ok(stored.into())
    }

    async fn find_by_id(&self, id: &AnimalId) -> Result<Option<Animal>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = animals::table
            .find(*id.as_uuid())
            .select(AnimalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Animal::from))
    }

    async fn find_by_sequence(
        &self,
        sequence: &str,
    ) -> Result<Option<Animal>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = animals::table
            .filter(animals::sequence.eq(sequence))
            .select(AnimalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Animal::from))
    }

    async fn find_duplicate(
        &self,
        tutor_id: &TutorId,
        name: &str,
        age: &str,
        species: &str,
    ) -> Result<Option<Animal>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = animals::table
            .filter(animals::tutor_id.eq(*tutor_id.as_uuid()))
            .filter(animals::name.eq(name))
            .filter(animals::age.eq(age))
            .filter(animals::species.eq(species))
            .select(AnimalRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Animal::from))
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<Animal>, u64), AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = animals::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_read_error)?;

        let rows: Vec<AnimalRow> = animals::table
            .order(animals::created_at.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(AnimalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        Ok((
            rows.into_iter().map(Animal::from).collect(),
            u64::try_from(total).unwrap_or(0),
        ))
    }

    async fn list_by_tutor(
        &self,
        tutor_id: &TutorId,
    ) -> Result<Vec<Animal>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AnimalRow> = animals::table
            .filter(animals::tutor_id.eq(*tutor_id.as_uuid()))
            .order(animals::created_at.asc())
            .select(AnimalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(Animal::from).collect())
    }

    async fn search(
        &self,
        query: &str,
        page: PageRequest,
    ) -> Result<Vec<Animal>, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let name_pattern = format!("%{query}%");
        let sequence_pattern = format!("{query}%");
        let rows: Vec<AnimalRow> = animals::table
            .filter(animals::deleted.eq(false))
            .filter(
                animals::name
                    .ilike(name_pattern)
                    .or(animals::sequence.ilike(sequence_pattern)),
            )
            .order(animals::created_at.asc())
            .limit(page.limit())
            .offset(page.offset())
            .select(AnimalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(Animal::from).collect())
    }

    async fn mark_deleted(&self, id: &AnimalId) -> Result<bool, AnimalRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::update(animals::table.find(*id.as_uuid()))
            .set(animals::deleted.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(affected > 0)
    }
}
