//! PostgreSQL-backed `SequenceStore` implementation using Diesel ORM.
//!
//! The store reads sequence numbers straight from the entity tables; there
//! is no counter table. The maximum is taken over rows whose sequence is a
//! plain decimal integer, ordered numerically via a cast: `'9'` must sort
//! above `'10'` lexicographically but below it here. Legacy rows holding
//! non-numeric text are invisible to the maximum but still reachable by the
//! exact-match probe.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Nullable};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SequenceStore, SequenceStoreError};
use crate::domain::sequence::RecordKind;

use super::error_mapping::{DbFailure, classify};
use super::pool::{DbPool, PoolError};
use super::schema::{animals, consults, tutors};

/// Filter matching rows whose sequence is a plain decimal integer.
const NUMERIC_SEQUENCE: &str = "sequence ~ '^[0-9]+$'";
/// Numeric aggregate over the filtered sequences.
const MAX_SEQUENCE: &str = "max(sequence::bigint)";

/// Diesel-backed implementation of the `SequenceStore` port.
#[derive(Clone)]
pub struct DieselSequenceStore {
    pool: DbPool,
}

impl DieselSequenceStore {
    /// Create a new store over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SequenceStoreError {
    SequenceStoreError::connection(error.to_string())
}

fn map_read_error(error: diesel::result::Error) -> SequenceStoreError {
    match classify(error) {
        DbFailure::Connection(message) => SequenceStoreError::connection(message),
        DbFailure::UniqueViolation { .. } => {
            SequenceStoreError::query("unexpected unique violation on read")
        }
        DbFailure::Query(message) => SequenceStoreError::query(message),
    }
}

#[async_trait]
impl SequenceStore for DieselSequenceStore {
    async fn max_assigned(&self, kind: RecordKind) -> Result<Option<String>, SequenceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let max: Option<i64> = match kind {
            RecordKind::Tutor => {
                tutors::table
                    .filter(sql::<Bool>(NUMERIC_SEQUENCE))
                    .select(sql::<Nullable<BigInt>>(MAX_SEQUENCE))
                    .first(&mut conn)
                    .await
            }
            RecordKind::Animal => {
                animals::table
                    .filter(sql::<Bool>(NUMERIC_SEQUENCE))
                    .select(sql::<Nullable<BigInt>>(MAX_SEQUENCE))
                    .first(&mut conn)
                    .await
            }
            RecordKind::Consult => {
                consults::table
                    .filter(sql::<Bool>(NUMERIC_SEQUENCE))
                    .select(sql::<Nullable<BigInt>>(MAX_SEQUENCE))
                    .first(&mut conn)
                    .await
            }
        }
        .map_err(map_read_error)?;

        Ok(max.map(|value| value.to_string()))
    }

    async fn is_assigned(
        &self,
        kind: RecordKind,
        candidate: &str,
    ) -> Result<bool, SequenceStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let assigned: bool = match kind {
            RecordKind::Tutor => {
                diesel::select(diesel::dsl::exists(
                    tutors::table.filter(tutors::sequence.eq(candidate)),
                ))
                .get_result(&mut conn)
                .await
            }
            RecordKind::Animal => {
                diesel::select(diesel::dsl::exists(
                    animals::table.filter(animals::sequence.eq(candidate)),
                ))
                .get_result(&mut conn)
                .await
            }
            RecordKind::Consult => {
                diesel::select(diesel::dsl::exists(
                    consults::table.filter(consults::sequence.eq(candidate)),
                ))
                .get_result(&mut conn)
                .await
            }
        }
        .map_err(map_read_error)?;

        Ok(assigned)
    }
}
