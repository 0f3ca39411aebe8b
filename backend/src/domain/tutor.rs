//! Tutor aggregate: the person responsible for one or more animals.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::normalize::{normalize_cpf, normalize_email, normalize_phone};
use crate::domain::sequence::SequenceValue;

/// Stable tutor identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TutorId(Uuid);

impl TutorId {
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

impl fmt::Display for TutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored tutor record.
#[derive(Debug, Clone, PartialEq)]
pub struct Tutor {
    /// Primary key.
    pub id: TutorId,
    /// Human-facing record number; legacy rows may lack one.
    pub sequence: Option<SequenceValue>,
    /// Full name.
    pub name: String,
    /// Normalised 11-digit CPF, when known.
    pub cpf: Option<String>,
    /// Normalised email address, when known.
    pub email: Option<String>,
    /// Contact phone, digits only.
    pub phone: String,
    /// Postal address free text.
    pub address: Option<String>,
    /// Soft-delete flag; deleted tutors keep their sequence number.
    pub deleted: bool,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validation errors for tutor input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TutorValidationError {
    /// Name is empty after trimming.
    #[error("tutor name must not be empty")]
    EmptyName,
    /// Phone did not normalise to 8–15 digits.
    #[error("tutor phone number is not valid")]
    InvalidPhone,
    /// A CPF was supplied but is not 11 digits.
    #[error("tutor CPF is not valid")]
    InvalidCpf,
    /// An email was supplied but fails the shape check.
    #[error("tutor email is not valid")]
    InvalidEmail,
}

/// Validated input for creating a tutor.
///
/// Identifying fields are canonicalised on construction so duplicate checks
/// and storage always see normalised values. Empty CPF/email inputs count
/// as absent, mirroring the intake forms which send empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorDraft {
    /// Full name, trimmed.
    pub name: String,
    /// Normalised CPF, when supplied.
    pub cpf: Option<String>,
    /// Normalised email, when supplied.
    pub email: Option<String>,
    /// Normalised phone digits.
    pub phone: String,
    /// Postal address, trimmed; empty counts as absent.
    pub address: Option<String>,
}

impl TutorDraft {
    /// Validate raw creation input.
    ///
    /// # Errors
    ///
    /// Returns a [`TutorValidationError`] when the name is empty, the phone
    /// does not normalise, or a non-empty CPF/email fails normalization.
    pub fn new(
        name: &str,
        cpf: Option<&str>,
        email: Option<&str>,
        phone: &str,
        address: Option<&str>,
    ) -> Result<Self, TutorValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TutorValidationError::EmptyName);
        }
        let phone = normalize_phone(phone).ok_or(TutorValidationError::InvalidPhone)?;
        let cpf = optional_field(cpf, normalize_cpf, TutorValidationError::InvalidCpf)?;
        let email = optional_field(email, normalize_email, TutorValidationError::InvalidEmail)?;
        let address = address
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(ToOwned::to_owned);

        Ok(Self {
            name: name.to_owned(),
            cpf,
            email,
            phone,
            address,
        })
    }
}

/// Partial update for a tutor; `None` fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorUpdate {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement CPF (normalised).
    pub cpf: Option<String>,
    /// Replacement email (normalised).
    pub email: Option<String>,
    /// Replacement phone (normalised).
    pub phone: Option<String>,
    /// Replacement address.
    pub address: Option<String>,
}

impl TutorUpdate {
    /// Validate raw update input; every field is optional.
    ///
    /// # Errors
    ///
    /// Returns a [`TutorValidationError`] when a supplied field fails the
    /// same checks as [`TutorDraft::new`].
    pub fn new(
        name: Option<&str>,
        cpf: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Self, TutorValidationError> {
        let name = match name.map(str::trim) {
            Some("") => return Err(TutorValidationError::EmptyName),
            other => other.map(ToOwned::to_owned),
        };
        let phone = match phone {
            Some(raw) => Some(normalize_phone(raw).ok_or(TutorValidationError::InvalidPhone)?),
            None => None,
        };
        let cpf = optional_field(cpf, normalize_cpf, TutorValidationError::InvalidCpf)?;
        let email = optional_field(email, normalize_email, TutorValidationError::InvalidEmail)?;

        Ok(Self {
            name,
            cpf,
            email,
            phone,
            address: address.map(ToOwned::to_owned),
        })
    }

    /// Whether the update carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cpf.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }
}

/// Normalise an optional identifying field: absent or empty input is fine,
/// a non-empty value that fails normalization is an error.
fn optional_field(
    raw: Option<&str>,
    normalize: fn(&str) -> Option<String>,
    error: TutorValidationError,
) -> Result<Option<String>, TutorValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => normalize(value).map(Some).ok_or(error),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::{TutorDraft, TutorUpdate, TutorValidationError};

    #[test]
    fn draft_normalises_identifying_fields() {
        let draft = TutorDraft::new(
            "  Maria Souza ",
            Some("529.982.247-25"),
            Some(" Maria@Example.COM"),
            "(11) 98888-7777",
            Some("  "),
        )
        .expect("valid draft");

        assert_eq!(draft.name, "Maria Souza");
        assert_eq!(draft.cpf.as_deref(), Some("52998224725"));
        assert_eq!(draft.email.as_deref(), Some("maria@example.com"));
        assert_eq!(draft.phone, "11988887777");
        assert_eq!(draft.address, None);
    }

    #[test]
    fn empty_cpf_and_email_count_as_absent() {
        let draft = TutorDraft::new("Maria", Some(""), Some(""), "11988887777", None)
            .expect("valid draft");
        assert_eq!(draft.cpf, None);
        assert_eq!(draft.email, None);
    }

    #[test]
    fn invalid_fields_are_rejected() {
        assert_eq!(
            TutorDraft::new(" ", None, None, "11988887777", None),
            Err(TutorValidationError::EmptyName)
        );
        assert_eq!(
            TutorDraft::new("Maria", Some("123"), None, "11988887777", None),
            Err(TutorValidationError::InvalidCpf)
        );
        assert_eq!(
            TutorDraft::new("Maria", None, Some("nope"), "11988887777", None),
            Err(TutorValidationError::InvalidEmail)
        );
        assert_eq!(
            TutorDraft::new("Maria", None, None, "123", None),
            Err(TutorValidationError::InvalidPhone)
        );
    }

    #[test]
    fn update_accepts_partial_input() {
        let update =
            TutorUpdate::new(None, None, None, Some("11 97777-6666"), None).expect("valid update");
        assert_eq!(update.phone.as_deref(), Some("11977776666"));
        assert!(update.name.is_none());
        assert!(!update.is_empty());
        assert!(TutorUpdate::default().is_empty());
    }
}
