//! Shared HTTP adapter state.
//!
//! Handlers receive the domain services via `actix_web::web::Data` so they
//! depend on use-cases only and stay testable without I/O: tests build the
//! same state over mock repositories.

use std::sync::Arc;

use crate::domain::{AnimalService, ConsultService, StaffService, TutorService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Tutor use-cases.
    pub tutors: Arc<TutorService>,
    /// Animal use-cases.
    pub animals: Arc<AnimalService>,
    /// Consult use-cases.
    pub consults: Arc<ConsultService>,
    /// Staff use-cases.
    pub staff: Arc<StaffService>,
}

impl HttpState {
    /// Bundle the domain services for handler injection.
    pub fn new(
        tutors: Arc<TutorService>,
        animals: Arc<AnimalService>,
        consults: Arc<ConsultService>,
        staff: Arc<StaffService>,
    ) -> Self {
        Self {
            tutors,
            animals,
            consults,
            staff,
        }
    }
}
