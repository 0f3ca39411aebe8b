//! Consult aggregate: a scheduled or performed consultation.
//!
//! Consults are booked over the phone, so the intake payload carries the
//! animal and tutor as plain text rather than foreign keys; the service
//! layer resolves or creates the tutor row. Visit dates arrive in the
//! Brazilian `dd/mm/yyyy` convention.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::normalize::normalize_phone;
use crate::domain::sequence::SequenceValue;
use crate::domain::tutor::TutorId;

/// Stable consult identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConsultId(Uuid);

impl ConsultId {
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

impl fmt::Display for ConsultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored consult record.
#[derive(Debug, Clone, PartialEq)]
pub struct Consult {
    /// Primary key.
    pub id: ConsultId,
    /// Human-facing record number; legacy rows may lack one.
    pub sequence: Option<SequenceValue>,
    /// Animal name as given at booking time.
    pub animal_name: String,
    /// Species as given at booking time.
    pub species: String,
    /// Contact phone, digits only.
    pub phone: String,
    /// Free-text reason or notes.
    pub description: Option<String>,
    /// Scheduled visit date.
    pub date: NaiveDate,
    /// Whether the consultation has been carried out.
    pub done: bool,
    /// Tutor the consult belongs to.
    pub tutor_id: TutorId,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validation errors for consult input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsultValidationError {
    /// A required field is empty after trimming.
    #[error("consult {field} must not be empty")]
    EmptyField {
        /// Which field was empty.
        field: &'static str,
    },
    /// Phone did not normalise to 8–15 digits.
    #[error("consult phone number is not valid")]
    InvalidPhone,
    /// The visit date is not a real `dd/mm/yyyy` calendar date.
    #[error("consult date {raw:?} is not a valid dd/mm/yyyy date")]
    InvalidDate {
        /// The rejected input.
        raw: String,
    },
}

/// Parse a visit date in the `dd/mm/yyyy` convention.
///
/// # Errors
///
/// Returns [`ConsultValidationError::InvalidDate`] for anything that is not
/// a real calendar date in that format (including `31/02/...`).
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use vetdesk::domain::consult::parse_visit_date;
///
/// let date = parse_visit_date("07/08/2026").expect("valid date");
/// assert_eq!(date, NaiveDate::from_ymd_opt(2026, 8, 7).expect("calendar date"));
/// assert!(parse_visit_date("31/02/2026").is_err());
/// ```
pub fn parse_visit_date(raw: &str) -> Result<NaiveDate, ConsultValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").map_err(|_| {
        ConsultValidationError::InvalidDate {
            raw: raw.to_owned(),
        }
    })
}

/// Validated input for booking a consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsultDraft {
    /// Animal name, trimmed.
    pub animal_name: String,
    /// Species, trimmed.
    pub species: String,
    /// Normalised contact phone.
    pub phone: String,
    /// Notes; empty counts as absent.
    pub description: Option<String>,
    /// Parsed visit date.
    pub date: NaiveDate,
}

impl ConsultDraft {
    /// Validate raw booking input.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsultValidationError`] when a required field is empty,
    /// the phone does not normalise, or the date does not parse.
    pub fn new(
        animal_name: &str,
        species: &str,
        phone: &str,
        description: Option<&str>,
        date: &str,
    ) -> Result<Self, ConsultValidationError> {
        let animal_name = required(animal_name, "animal name")?;
        let species = required(species, "species")?;
        let phone = normalize_phone(phone).ok_or(ConsultValidationError::InvalidPhone)?;
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            animal_name,
            species,
            phone,
            description,
            date: parse_visit_date(date)?,
        })
    }
}

/// Partial update for a consult; `None` fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsultUpdate {
    /// Replacement animal name.
    pub animal_name: Option<String>,
    /// Replacement species.
    pub species: Option<String>,
    /// Replacement phone (normalised).
    pub phone: Option<String>,
    /// Replacement notes.
    pub description: Option<String>,
    /// Replacement visit date.
    pub date: Option<NaiveDate>,
}

impl ConsultUpdate {
    /// Validate raw update input; every field is optional.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsultValidationError`] when a supplied field fails the
    /// same checks as [`ConsultDraft::new`].
    pub fn new(
        animal_name: Option<&str>,
        species: Option<&str>,
        phone: Option<&str>,
        description: Option<&str>,
        date: Option<&str>,
    ) -> Result<Self, ConsultValidationError> {
        let animal_name = match animal_name {
            Some(raw) => Some(required(raw, "animal name")?),
            None => None,
        };
        let species = match species {
            Some(raw) => Some(required(raw, "species")?),
            None => None,
        };
        let phone = match phone {
            Some(raw) => Some(normalize_phone(raw).ok_or(ConsultValidationError::InvalidPhone)?),
            None => None,
        };
        let date = match date {
            Some(raw) => Some(parse_visit_date(raw)?),
            None => None,
        };

        Ok(Self {
            animal_name,
            species,
            phone,
            description: description.map(ToOwned::to_owned),
            date,
        })
    }

    /// Whether the update carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.animal_name.is_none()
            && self.species.is_none()
            && self.phone.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

fn required(raw: &str, field: &'static str) -> Result<String, ConsultValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConsultValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::{ConsultDraft, ConsultValidationError, parse_visit_date};

    #[rstest]
    #[case("01/01/2026", 2026, 1, 1)]
    #[case("29/02/2024", 2024, 2, 29)]
    #[case(" 07/08/2026 ", 2026, 8, 7)]
    fn visit_dates_parse_day_first(
        #[case] raw: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
    ) {
        let expected =
            chrono::NaiveDate::from_ymd_opt(year, month, day).expect("calendar date");
        assert_eq!(parse_visit_date(raw), Ok(expected));
    }

    #[rstest]
    #[case("31/02/2026")]
    #[case("29/02/2025")]
    #[case("2026-08-07")]
    #[case("8/13/2026")]
    #[case("soon")]
    fn impossible_dates_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            parse_visit_date(raw),
            Err(ConsultValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn draft_normalises_phone_and_description() {
        let draft = ConsultDraft::new(
            "Rex",
            "canine",
            "(11) 98888-7777",
            Some("  "),
            "15/09/2026",
        )
        .expect("valid draft");
        assert_eq!(draft.phone, "11988887777");
        assert_eq!(draft.description, None);
    }
}
