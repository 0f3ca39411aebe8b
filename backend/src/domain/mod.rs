//! Domain types, services, and ports.
//!
//! The domain is transport and storage agnostic: aggregates and services
//! live here, driven adapters implement the traits under [`ports`], and the
//! inbound HTTP adapter maps [`Error`] onto status codes.

pub mod animal;
pub mod animal_service;
pub mod consult;
pub mod consult_service;
pub mod error;
pub mod normalize;
pub mod ports;
pub mod sequence;
pub mod staff;
pub mod staff_service;
pub mod tutor;
pub mod tutor_service;

pub use self::animal_service::AnimalService;
pub use self::consult_service::ConsultService;
pub use self::error::{Error, ErrorCode};
pub use self::sequence::{AllocationError, RecordKind, SequenceAllocator, SequenceValue};
pub use self::staff_service::StaffService;
pub use self::tutor_service::TutorService;

#[cfg(test)]
pub(crate) mod test_fixtures;

#[cfg(test)]
mod animal_service_tests;
#[cfg(test)]
mod sequence_tests;
#[cfg(test)]
mod staff_service_tests;
#[cfg(test)]
mod tutor_service_tests;
