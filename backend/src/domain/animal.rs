//! Animal aggregate: a patient registered under a tutor.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::sequence::SequenceValue;
use crate::domain::tutor::TutorId;

/// Stable animal identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimalId(Uuid);

impl AnimalId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored animal record.
#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    /// Primary key.
    pub id: AnimalId,
    /// Human-facing record number; legacy rows may lack one.
    pub sequence: Option<SequenceValue>,
    /// Call name.
    pub name: String,
    /// Species ("canine", "feline", ...).
    pub species: String,
    /// Breed, when known.
    pub race: Option<String>,
    /// Sex of the animal as recorded at intake.
    pub gender: String,
    /// Age as free text ("3 years", "8 months").
    pub age: String,
    /// Coat description, when recorded.
    pub coat: Option<String>,
    /// Owning tutor.
    pub tutor_id: TutorId,
    /// Soft-delete flag; deleted animals keep their sequence number.
    pub deleted: bool,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validation errors for animal input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnimalValidationError {
    /// A required field is empty after trimming.
    #[error("animal {field} must not be empty")]
    EmptyField {
        /// Which field was empty.
        field: &'static str,
    },
}

/// Validated input for registering an animal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalDraft {
    /// Call name, trimmed.
    pub name: String,
    /// Species, trimmed.
    pub species: String,
    /// Breed; empty counts as absent.
    pub race: Option<String>,
    /// Sex, trimmed.
    pub gender: String,
    /// Age free text, trimmed.
    pub age: String,
    /// Coat description; empty counts as absent.
    pub coat: Option<String>,
}

impl AnimalDraft {
    /// Validate raw creation input.
    ///
    /// # Errors
    ///
    /// Returns [`AnimalValidationError::EmptyField`] when name, species,
    /// gender, or age is empty after trimming.
    pub fn new(
        name: &str,
        species: &str,
        race: Option<&str>,
        gender: &str,
        age: &str,
        coat: Option<&str>,
    ) -> Result<Self, AnimalValidationError> {
        Ok(Self {
            name: required(name, "name")?,
            species: required(species, "species")?,
            race: optional(race),
            gender: required(gender, "gender")?,
            age: required(age, "age")?,
            coat: optional(coat),
        })
    }
}

fn required(raw: &str, field: &'static str) -> Result<String, AnimalValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnimalValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

fn optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::{AnimalDraft, AnimalValidationError};

    #[test]
    fn draft_trims_and_drops_empty_optionals() {
        let draft = AnimalDraft::new(" Rex ", "canine", Some(""), "male", " 3 years ", None)
            .expect("valid draft");
        assert_eq!(draft.name, "Rex");
        assert_eq!(draft.age, "3 years");
        assert_eq!(draft.race, None);
        assert_eq!(draft.coat, None);
    }

    #[test]
    fn required_fields_must_be_present() {
        let result = AnimalDraft::new("Rex", " ", None, "male", "3 years", None);
        assert_eq!(
            result,
            Err(AnimalValidationError::EmptyField { field: "species" })
        );
    }
}
