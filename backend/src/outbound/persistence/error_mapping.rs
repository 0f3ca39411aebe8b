//! Shared translation from Diesel failures to port-error building blocks.
//!
//! Adapters first classify a Diesel error into a [`DbFailure`] and then map
//! that onto their own port error enum, so unique-violation detection (the
//! sequence-collision signal the services retry on) lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Storage failure stripped down to what port errors care about.
#[derive(Debug)]
pub(crate) enum DbFailure {
    /// The connection died or could not be used.
    Connection(String),
    /// A unique index rejected the write.
    UniqueViolation {
        /// Name of the violated constraint, when the driver reports it.
        constraint: Option<String>,
    },
    /// Any other query failure.
    Query(String),
}

/// Classify a Diesel error.
pub(crate) fn classify(error: DieselError) -> DbFailure {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(
                constraint = info.constraint_name(),
                message = info.message(),
                "unique violation"
            );
            DbFailure::UniqueViolation {
                constraint: info.constraint_name().map(ToOwned::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            DbFailure::Connection(info.message().to_owned())
        }
        DieselError::BrokenTransactionManager => {
            DbFailure::Connection("broken transaction manager".to_owned())
        }
        other => DbFailure::Query(other.to_string()),
    }
}

/// Whether a violated constraint is the table's sequence unique index.
pub(crate) fn is_sequence_constraint(constraint: Option<&str>) -> bool {
    constraint.is_some_and(|name| name.contains("sequence"))
}

/// Column name guessed from a constraint like `tutors_cpf_key`.
pub(crate) fn field_from_constraint(constraint: Option<&str>, table: &str) -> String {
    let Some(name) = constraint else {
        return "unique field".to_owned();
    };
    name.strip_prefix(table)
        .map(|rest| rest.trim_matches('_'))
        .map(|rest| rest.strip_suffix("_key").unwrap_or(rest))
        .filter(|field| !field.is_empty())
        .map_or_else(|| name.to_owned(), ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::{field_from_constraint, is_sequence_constraint};

    #[rstest]
    #[case(Some("tutors_sequence_key"), true)]
    #[case(Some("animals_sequence_key"), true)]
    #[case(Some("tutors_cpf_key"), false)]
    #[case(None, false)]
    fn sequence_constraints_are_recognised(
        #[case] constraint: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(is_sequence_constraint(constraint), expected);
    }

    #[rstest]
    #[case(Some("tutors_cpf_key"), "tutors", "cpf")]
    #[case(Some("staff_registration_key"), "staff", "registration")]
    #[case(Some("weird_name"), "tutors", "weird_name")]
    #[case(None, "tutors", "unique field")]
    fn fields_are_guessed_from_constraint_names(
        #[case] constraint: Option<&str>,
        #[case] table: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(field_from_constraint(constraint, table), expected);
    }
}
