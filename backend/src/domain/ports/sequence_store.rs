//! Port for reading assigned record sequence numbers.
//!
//! The [`SequenceStore`] trait is the read-only view the allocator has of a
//! record collection: the highest numeric sequence currently assigned, and
//! whether one candidate value is taken. The authoritative state is the
//! collection itself, not a counter row, so adapters answer both
//! questions straight from the entity tables.

use async_trait::async_trait;

use crate::domain::sequence::RecordKind;

use super::define_port_error;

define_port_error! {
    /// Errors raised by sequence store adapters.
    pub enum SequenceStoreError {
        /// Storage connection could not be established.
        Connection { message: String } =>
            "sequence storage connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "sequence storage query failed: {message}",
    }
}

/// Read-only access to the sequence numbers already assigned to a collection.
///
/// `max_assigned` must order stored values as integers, never
/// lexicographically, and may ignore values that are not plain decimal
/// integers (legacy rows can hold arbitrary text). `is_assigned` must match
/// the stored value exactly, including soft-deleted rows; a deleted record
/// keeps its number forever.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Highest numeric sequence currently stored for `kind`, if any.
    async fn max_assigned(&self, kind: RecordKind) -> Result<Option<String>, SequenceStoreError>;

    /// Whether `candidate` is already assigned to any row of `kind`.
    async fn is_assigned(
        &self,
        kind: RecordKind,
        candidate: &str,
    ) -> Result<bool, SequenceStoreError>;
}

/// Fixture store representing empty collections.
///
/// Reports no assigned sequences at all; useful in handler tests where
/// allocation behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSequenceStore;

#[async_trait]
impl SequenceStore for FixtureSequenceStore {
    async fn max_assigned(&self, _kind: RecordKind) -> Result<Option<String>, SequenceStoreError> {
        Ok(None)
    }

    async fn is_assigned(
        &self,
        _kind: RecordKind,
        _candidate: &str,
    ) -> Result<bool, SequenceStoreError> {
        Ok(false)
    }
}
