//! vetdesk backend library.
//!
//! Administrative REST backend for a veterinary teaching clinic: tutors,
//! animals, consults, and staff accounts over PostgreSQL, with a
//! per-collection record-number allocator at its core.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
