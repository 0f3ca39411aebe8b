//! Staff aggregate: clinic accounts for secretaries, teachers, and students.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::normalize::{normalize_cpf, normalize_email, normalize_phone, normalize_sequence};

/// Stable staff identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StaffId(Uuid);

impl StaffId {
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

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Clinic role attached to a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaffRole {
    /// Front-desk administration.
    Secretary,
    /// Supervising veterinarian-teacher.
    Teacher,
    /// Veterinary student.
    Student,
}

impl StaffRole {
    /// Stable lowercase name used in storage and payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Secretary => "secretary",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    /// Whether accounts with this role carry an academic registration.
    pub fn requires_registration(self) -> bool {
        matches!(self, Self::Teacher | Self::Student)
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown staff role {raw:?}")]
pub struct StaffRoleParseError {
    /// The rejected input.
    pub raw: String,
}

impl FromStr for StaffRole {
    type Err = StaffRoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secretary" => Ok(Self::Secretary),
            "teacher" => Ok(Self::Teacher),
            "student" => Ok(Self::Student),
            other => Err(StaffRoleParseError {
                raw: other.to_owned(),
            }),
        }
    }
}

/// Salted SHA-256 credential digest, stored as `salt$digest` in hex.
///
/// Derivation draws a fresh 16-byte salt per account; verification recomputes
/// the digest from the stored salt. The cleartext never leaves this type.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Derive a digest for a new password with a random salt.
    pub fn derive(password: &str) -> Self {
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt_hex = hex::encode(salt);
        let digest = hash_with_salt(&salt_hex, password);
        Self(format!("{salt_hex}${digest}"))
    }

    /// Wrap a digest loaded from storage.
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Check a login attempt against this digest.
    ///
    /// A malformed stored value never matches; it cannot panic.
    pub fn verify(&self, password: &str) -> bool {
        match self.0.split_once('$') {
            Some((salt_hex, digest)) => hash_with_salt(salt_hex, password) == digest,
            None => false,
        }
    }

    /// The storable `salt$digest` representation.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Digests are not secret, but keep logs free of credential material.
        f.write_str("PasswordDigest(..)")
    }
}

fn hash_with_salt(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// A stored staff account.
#[derive(Debug, Clone, PartialEq)]
pub struct Staff {
    /// Primary key.
    pub id: StaffId,
    /// Account role.
    pub role: StaffRole,
    /// Full name.
    pub name: String,
    /// Normalised 11-digit CPF.
    pub cpf: String,
    /// Normalised email, when known.
    pub email: Option<String>,
    /// Contact phone, when known.
    pub phone: Option<String>,
    /// Academic registration (teachers and students).
    pub registration: Option<String>,
    /// Credential digest.
    pub password: PasswordDigest,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validation errors for staff input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StaffValidationError {
    /// Name is empty after trimming.
    #[error("staff name must not be empty")]
    EmptyName,
    /// CPF missing or not 11 digits.
    #[error("staff CPF is not valid")]
    InvalidCpf,
    /// An email was supplied but fails the shape check.
    #[error("staff email is not valid")]
    InvalidEmail,
    /// A phone was supplied but does not normalise.
    #[error("staff phone number is not valid")]
    InvalidPhone,
    /// The role requires a registration and none usable was supplied.
    #[error("{role} accounts require a registration")]
    MissingRegistration {
        /// Role that demanded the registration.
        role: StaffRole,
    },
    /// Password shorter than the minimum.
    #[error("staff password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validated input for registering a staff account.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffDraft {
    /// Account role.
    pub role: StaffRole,
    /// Full name, trimmed.
    pub name: String,
    /// Normalised CPF.
    pub cpf: String,
    /// Normalised email, when supplied.
    pub email: Option<String>,
    /// Normalised phone, when supplied.
    pub phone: Option<String>,
    /// Canonicalised registration (teachers and students).
    pub registration: Option<String>,
    /// Derived credential digest.
    pub password: PasswordDigest,
}

impl StaffDraft {
    /// Validate raw registration input and derive the credential digest.
    ///
    /// # Errors
    ///
    /// Returns a [`StaffValidationError`] when a field fails its check or a
    /// teacher/student registration is missing.
    pub fn new(
        role: StaffRole,
        name: &str,
        cpf: &str,
        email: Option<&str>,
        phone: Option<&str>,
        registration: Option<&str>,
        password: &str,
    ) -> Result<Self, StaffValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StaffValidationError::EmptyName);
        }
        let cpf = normalize_cpf(cpf).ok_or(StaffValidationError::InvalidCpf)?;
        let email = match email.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(normalize_email(raw).ok_or(StaffValidationError::InvalidEmail)?),
        };
        let phone = match phone.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(normalize_phone(raw).ok_or(StaffValidationError::InvalidPhone)?),
        };
        let registration = registration.and_then(normalize_sequence);
        if role.requires_registration() && registration.is_none() {
            return Err(StaffValidationError::MissingRegistration { role });
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(StaffValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        Ok(Self {
            role,
            name: name.to_owned(),
            cpf,
            email,
            phone,
            registration,
            password: PasswordDigest::derive(password),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::{PasswordDigest, StaffDraft, StaffRole, StaffValidationError};

    #[test]
    fn digests_verify_their_own_password() {
        let digest = PasswordDigest::derive("correct horse");
        assert!(digest.verify("correct horse"));
        assert!(!digest.verify("wrong pony"));
    }

    #[test]
    fn distinct_salts_give_distinct_digests() {
        let a = PasswordDigest::derive("same input");
        let b = PasswordDigest::derive("same input");
        assert_ne!(a.as_str(), b.as_str());
        assert!(a.verify("same input"));
        assert!(b.verify("same input"));
    }

    #[test]
    fn malformed_stored_digests_never_match() {
        let digest = PasswordDigest::from_stored("not-a-digest");
        assert!(!digest.verify("anything"));
    }

    #[test]
    fn students_require_a_registration() {
        let result = StaffDraft::new(
            StaffRole::Student,
            "Ana",
            "529.982.247-25",
            None,
            None,
            Some("  "),
            "hunter22",
        );
        assert_eq!(
            result,
            Err(StaffValidationError::MissingRegistration {
                role: StaffRole::Student
            })
        );
    }

    #[test]
    fn secretaries_need_no_registration() {
        let draft = StaffDraft::new(
            StaffRole::Secretary,
            " Fernanda Lima ",
            "992.960.180-56",
            Some("fernanda@example.com"),
            Some("123456789"),
            None,
            "hunter22",
        )
        .expect("valid draft");
        assert_eq!(draft.name, "Fernanda Lima");
        assert_eq!(draft.cpf, "99296018056");
        assert_eq!(draft.registration, None);
    }

    #[test]
    fn registrations_are_canonicalised() {
        let draft = StaffDraft::new(
            StaffRole::Teacher,
            "Paulo",
            "529.982.247-25",
            None,
            None,
            Some(" vet-071 "),
            "hunter22",
        )
        .expect("valid draft");
        assert_eq!(draft.registration.as_deref(), Some("VET-071"));
    }

    #[test]
    fn short_passwords_are_rejected() {
        let result = StaffDraft::new(
            StaffRole::Secretary,
            "Ana",
            "529.982.247-25",
            None,
            None,
            None,
            "short",
        );
        assert_eq!(
            result,
            Err(StaffValidationError::PasswordTooShort { min: 6 })
        );
    }
}
