//! Record sequence allocation.
//!
//! Tutors, animals, and consults each carry a human-facing record number
//! (the *sequence*) distinct from their UUID primary key. Numbers are
//! decimal strings, unique within one collection, assigned once at creation
//! and never reused: soft-deleted rows keep theirs.
//!
//! [`SequenceAllocator`] produces the next number for a collection with one
//! strategy for all three kinds: read the highest numeric value stored, then
//! probe upwards from `max + 1` until a free value is found, giving up with
//! a typed error after a bounded number of probes. Allocations for the same
//! kind are serialised through a per-kind lock that also remembers the last
//! value issued in this process, so two concurrent calls can never hand out
//! the same number even though the allocator itself writes nothing. The
//! unique index on each `sequence` column remains the cross-process
//! backstop; creation services re-allocate on an insert conflict.
//!
//! A stored maximum that does not parse as an integer is treated as "no
//! prior value" and numbering restarts from the probe at `"1"`. That policy
//! is inherited from the system this replaces; it is safe here only because
//! probing still refuses any value that is actually stored.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use tokio::sync::Mutex;

use crate::domain::ports::{SequenceStore, SequenceStoreError};

/// Record collections with independent numbering spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Animal owners.
    Tutor,
    /// Patients.
    Animal,
    /// Consultations.
    Consult,
}

impl RecordKind {
    /// Stable lowercase name used in logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tutor => "tutor",
            Self::Animal => "animal",
            Self::Consult => "consult",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by [`SequenceValue::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceValueError {
    /// The value is empty.
    #[error("sequence value must not be empty")]
    Empty,
    /// The value contains a character other than a decimal digit.
    #[error("sequence value must contain only decimal digits")]
    NonDigit,
}

/// An allocated record number: a non-empty string of decimal digits.
///
/// # Examples
/// ```
/// use vetdesk::domain::sequence::SequenceValue;
///
/// let value = SequenceValue::new("42")?;
/// assert_eq!(value.as_str(), "42");
/// # Ok::<(), vetdesk::domain::sequence::SequenceValueError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceValue(String);

impl SequenceValue {
    /// Validate and wrap an already-formatted sequence value.
    pub fn new(raw: impl Into<String>) -> Result<Self, SequenceValueError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SequenceValueError::Empty);
        }
        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(SequenceValueError::NonDigit);
        }
        Ok(Self(raw))
    }

    fn from_number(value: u64) -> Self {
        Self(value.to_string())
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SequenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for SequenceValue {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<SequenceValue> for String {
    fn from(value: SequenceValue) -> Self {
        value.0
    }
}

/// Failures surfaced by [`SequenceAllocator::next`].
///
/// Both variants are retryable from the caller's point of view: storage may
/// come back, and a later allocation round starts from a fresh read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// The underlying storage read failed.
    #[error("sequence storage unavailable for {kind}: {message}")]
    Unavailable {
        /// Collection the allocation was for.
        kind: RecordKind,
        /// Adapter failure description.
        message: String,
    },
    /// Every probed candidate was already assigned.
    #[error("sequence allocation for {kind} gave up after {attempts} probes")]
    Exhausted {
        /// Collection the allocation was for.
        kind: RecordKind,
        /// Number of candidates probed before giving up.
        attempts: u32,
    },
}

impl From<AllocationError> for crate::domain::Error {
    fn from(error: AllocationError) -> Self {
        let code = match error {
            AllocationError::Unavailable { .. } => "sequence_unavailable",
            AllocationError::Exhausted { .. } => "sequence_exhausted",
        };
        Self::service_unavailable(error.to_string())
            .with_details(serde_json::json!({ "code": code }))
    }
}

/// Default bound on collision probes per allocation.
pub const DEFAULT_PROBE_LIMIT: u32 = 32;

#[derive(Debug, Default)]
struct Lane {
    /// Highest value issued by this process for the lane's kind.
    issued_floor: u64,
}

/// Allocates the next sequence number for a record collection.
///
/// Construct one per process and share it: the per-kind locks are what make
/// concurrent allocations of the same kind return distinct values.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use vetdesk::domain::ports::FixtureSequenceStore;
/// use vetdesk::domain::sequence::{RecordKind, SequenceAllocator};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let allocator =
///     SequenceAllocator::new(Arc::new(FixtureSequenceStore), Arc::new(DefaultClock));
/// let first = allocator.next(RecordKind::Tutor).await.expect("allocates");
/// assert_eq!(first.as_str(), "1");
/// # });
/// ```
pub struct SequenceAllocator {
    store: Arc<dyn SequenceStore>,
    clock: Arc<dyn Clock>,
    probe_limit: u32,
    clock_fallback: bool,
    tutor_lane: Mutex<Lane>,
    animal_lane: Mutex<Lane>,
    consult_lane: Mutex<Lane>,
}

impl SequenceAllocator {
    /// Create an allocator over the given store with default settings.
    pub fn new(store: Arc<dyn SequenceStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            probe_limit: DEFAULT_PROBE_LIMIT,
            clock_fallback: false,
            tutor_lane: Mutex::default(),
            animal_lane: Mutex::default(),
            consult_lane: Mutex::default(),
        }
    }

    /// Override the collision probe bound.
    pub fn with_probe_limit(mut self, probe_limit: u32) -> Self {
        self.probe_limit = probe_limit;
        self
    }

    /// Enable the degraded clock-derived fallback.
    ///
    /// When storage reads fail and this is enabled, the allocator returns
    /// the last six digits of the current Unix timestamp in milliseconds
    /// instead of an error. This knowingly weakens the uniqueness
    /// guarantee, so every firing emits a structured warning; leave it
    /// disabled unless availability matters more than clean numbering.
    pub fn with_clock_fallback(mut self, enabled: bool) -> Self {
        self.clock_fallback = enabled;
        self
    }

    /// Allocate the next free sequence value for `kind`.
    ///
    /// Read-only against storage: the caller is expected to write the value
    /// into the new row immediately and to retry allocation if that insert
    /// hits the sequence unique index.
    ///
    /// # Errors
    ///
    /// [`AllocationError::Unavailable`] when a storage read fails and the
    /// clock fallback is disabled; [`AllocationError::Exhausted`] when
    /// every candidate within the probe bound is taken.
    pub async fn next(&self, kind: RecordKind) -> Result<SequenceValue, AllocationError> {
        let mut lane = self.lane(kind).lock().await;

        let stored_basis = match self.store.max_assigned(kind).await {
            Ok(max) => max.as_deref().map_or(0, parse_basis),
            Err(error) => return self.degrade(kind, &error),
        };

        let mut candidate = stored_basis.max(lane.issued_floor).saturating_add(1);
        for _ in 0..self.probe_limit {
            match self.store.is_assigned(kind, &candidate.to_string()).await {
                Ok(false) => {
                    lane.issued_floor = candidate;
                    return Ok(SequenceValue::from_number(candidate));
                }
                Ok(true) => candidate = candidate.saturating_add(1),
                Err(error) => return self.degrade(kind, &error),
            }
        }

        Err(AllocationError::Exhausted {
            kind,
            attempts: self.probe_limit,
        })
    }

    fn lane(&self, kind: RecordKind) -> &Mutex<Lane> {
        match kind {
            RecordKind::Tutor => &self.tutor_lane,
            RecordKind::Animal => &self.animal_lane,
            RecordKind::Consult => &self.consult_lane,
        }
    }

    fn degrade(
        &self,
        kind: RecordKind,
        error: &SequenceStoreError,
    ) -> Result<SequenceValue, AllocationError> {
        if !self.clock_fallback {
            return Err(AllocationError::Unavailable {
                kind,
                message: error.to_string(),
            });
        }

        let millis = self.clock.utc().timestamp_millis();
        let fallback = u64::try_from(millis.rem_euclid(1_000_000)).unwrap_or(0);
        let value = SequenceValue::from_number(fallback);
        tracing::warn!(
            kind = %kind,
            sequence = %value,
            error = %error,
            "sequence storage failed; issuing clock-derived fallback value"
        );
        Ok(value)
    }
}

/// Numeric basis for probing, per the inherited reset policy: a stored
/// maximum that is not a plain decimal integer counts as no prior value.
fn parse_basis(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}
