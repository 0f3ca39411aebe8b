//! Diesel row structs and their domain conversions.
//!
//! Row types are internal to the persistence layer; adapters convert them to
//! domain aggregates at the boundary. Insert structs borrow from the domain
//! drafts so no field is copied twice.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::animal::{Animal, AnimalId};
use crate::domain::consult::{Consult, ConsultId};
use crate::domain::ports::StaffRepositoryError;
use crate::domain::sequence::SequenceValue;
use crate::domain::staff::{PasswordDigest, Staff, StaffId};
use crate::domain::tutor::{Tutor, TutorId};

use super::schema::{animals, consults, staff, tutors};

/// Stored sequences predate the digits-only invariant; anything that does
/// not validate is treated as absent rather than failing the whole read.
fn sequence_from_row(raw: Option<String>, table: &'static str, id: Uuid) -> Option<SequenceValue> {
    raw.and_then(|value| match SequenceValue::new(value) {
        Ok(sequence) => Some(sequence),
        Err(error) => {
            tracing::warn!(%id, table, %error, "stored sequence is not numeric; exposing as absent");
            None
        }
    })
}

/// One row of `tutors`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tutors, check_for_backend(diesel::pg::Pg))]
pub struct TutorRow {
    pub id: Uuid,
    pub sequence: Option<String>,
    pub name: String,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TutorRow> for Tutor {
    fn from(row: TutorRow) -> Self {
        Self {
            id: TutorId::from_uuid(row.id),
            sequence: sequence_from_row(row.sequence, "tutors", row.id),
            name: row.name,
            cpf: row.cpf,
            email: row.email,
            phone: row.phone,
            address: row.address,
            deleted: row.deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable `tutors` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = tutors)]
pub struct NewTutorRow<'a> {
    pub id: Uuid,
    pub sequence: &'a str,
    pub name: &'a str,
    pub cpf: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: &'a str,
    pub address: Option<&'a str>,
}

/// Partial `tutors` update; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = tutors)]
pub struct TutorChangeset<'a> {
    pub name: Option<&'a str>,
    pub cpf: Option<&'a str>,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
}

/// One row of `animals`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = animals, check_for_backend(diesel::pg::Pg))]
pub struct AnimalRow {
    pub id: Uuid,
    pub sequence: Option<String>,
    pub name: String,
    pub species: String,
    pub race: Option<String>,
    pub gender: String,
    pub age: String,
    pub coat: Option<String>,
    pub tutor_id: Uuid,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AnimalRow> for Animal {
    fn from(row: AnimalRow) -> Self {
        Self {
            id: AnimalId::from_uuid(row.id),
            sequence: sequence_from_row(row.sequence, "animals", row.id),
            name: row.name,
            species: row.species,
            race: row.race,
            gender: row.gender,
            age: row.age,
            coat: row.coat,
            tutor_id: TutorId::from_uuid(row.tutor_id),
            deleted: row.deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable `animals` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = animals)]
pub struct NewAnimalRow<'a> {
    pub id: Uuid,
    pub sequence: &'a str,
    pub name: &'a str,
    pub species: &'a str,
    pub race: Option<&'a str>,
    pub gender: &'a str,
    pub age: &'a str,
    pub coat: Option<&'a str>,
    pub tutor_id: Uuid,
}

/// One row of `consults`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = consults, check_for_backend(diesel::pg::Pg))]
pub struct ConsultRow {
    pub id: Uuid,
    pub sequence: Option<String>,
    pub animal_name: String,
    pub species: String,
    pub phone: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub done: bool,
    pub tutor_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConsultRow> for Consult {
    fn from(row: ConsultRow) -> Self {
        Self {
            id: ConsultId::from_uuid(row.id),
            sequence: sequence_from_row(row.sequence, "consults", row.id),
            animal_name: row.animal_name,
            species: row.species,
            phone: row.phone,
            description: row.description,
            date: row.date,
            done: row.done,
            tutor_id: TutorId::from_uuid(row.tutor_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable `consults` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = consults)]
pub struct NewConsultRow<'a> {
    pub id: Uuid,
    pub sequence: &'a str,
    pub animal_name: &'a str,
    pub species: &'a str,
    pub phone: &'a str,
    pub description: Option<&'a str>,
    pub date: NaiveDate,
    pub tutor_id: Uuid,
}

/// Partial `consults` update; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = consults)]
pub struct ConsultChangeset<'a> {
    pub animal_name: Option<&'a str>,
    pub species: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub description: Option<&'a str>,
    pub date: Option<NaiveDate>,
}

/// One row of `staff`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = staff, check_for_backend(diesel::pg::Pg))]
pub struct StaffRow {
    pub id: Uuid,
    pub role: String,
    pub name: String,
    pub cpf: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub registration: Option<String>,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<StaffRow> for Staff {
    type Error = StaffRepositoryError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse()
            .map_err(|error: crate::domain::staff::StaffRoleParseError| {
                StaffRepositoryError::query(format!("staff row {}: {error}", row.id))
            })?;
        Ok(Self {
            id: StaffId::from_uuid(row.id),
            role,
            name: row.name,
            cpf: row.cpf,
            email: row.email,
            phone: row.phone,
            registration: row.registration,
            password: PasswordDigest::from_stored(row.password_digest),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable `staff` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = staff)]
pub struct NewStaffRow<'a> {
    pub id: Uuid,
    pub role: &'a str,
    pub name: &'a str,
    pub cpf: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub registration: Option<&'a str>,
    pub password_digest: &'a str,
}
