//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL via `diesel-async` and `bb8` pooling. Adapters are thin
//! translators: row structs and schema definitions stay internal, every
//! database error maps to a typed port error, and no business logic lives
//! here. The unique indexes on each `sequence` column make concurrent
//! allocation races detectable; adapters surface them as
//! `DuplicateSequence` so services can re-allocate.

mod diesel_animal_repository;
mod diesel_consult_repository;
mod diesel_sequence_store;
mod diesel_staff_repository;
mod diesel_tutor_repository;
mod error_mapping;
mod models;
mod pool;
mod schema;

pub use diesel_animal_repository::DieselAnimalRepository;
pub use diesel_consult_repository::DieselConsultRepository;
pub use diesel_sequence_store::DieselSequenceStore;
pub use diesel_staff_repository::DieselStaffRepository;
pub use diesel_tutor_repository::DieselTutorRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
