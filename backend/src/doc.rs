//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every HTTP endpoint and payload schema. The
//! generated specification backs the Swagger UI served at `/docs` in debug
//! builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "vetdesk API",
        description = "Administrative backend for a veterinary teaching clinic: \
                       tutors, animals, consults, and staff accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::tutors::create_tutor,
        crate::inbound::http::tutors::list_tutors,
        crate::inbound::http::tutors::get_tutor,
        crate::inbound::http::tutors::search_tutors_by_name,
        crate::inbound::http::tutors::search_tutors_by_phone,
        crate::inbound::http::tutors::update_tutor,
        crate::inbound::http::tutors::delete_tutor,
        crate::inbound::http::animals::create_animal,
        crate::inbound::http::animals::list_animals,
        crate::inbound::http::animals::get_animal,
        crate::inbound::http::animals::get_animal_by_sequence,
        crate::inbound::http::animals::search_animals,
        crate::inbound::http::animals::list_animals_by_tutor,
        crate::inbound::http::animals::delete_animal,
        crate::inbound::http::consults::create_consult,
        crate::inbound::http::consults::create_consult_for_tutor,
        crate::inbound::http::consults::list_open_consults,
        crate::inbound::http::consults::get_consult,
        crate::inbound::http::consults::update_consult,
        crate::inbound::http::consults::mark_consult_done,
        crate::inbound::http::staff::create_secretary,
        crate::inbound::http::staff::create_teacher,
        crate::inbound::http::staff::create_student,
        crate::inbound::http::staff::search_students,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::error::Error,
        crate::domain::error::ErrorCode,
        crate::inbound::http::auth::LoginRequest,
        crate::inbound::http::tutors::CreateTutorRequest,
        crate::inbound::http::tutors::UpdateTutorRequest,
        crate::inbound::http::tutors::TutorResponse,
        crate::inbound::http::animals::CreateAnimalRequest,
        crate::inbound::http::animals::AnimalResponse,
        crate::inbound::http::consults::CreateConsultRequest,
        crate::inbound::http::consults::CreateConsultForTutorRequest,
        crate::inbound::http::consults::UpdateConsultRequest,
        crate::inbound::http::consults::ConsultResponse,
        crate::inbound::http::staff::RegisterStaffRequest,
        crate::inbound::http::staff::StaffResponse,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_includes_the_core_paths() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths.paths;
        assert!(paths.contains_key("/api/v1/login"));
        assert!(paths.contains_key("/api/v1/tutors"));
        assert!(paths.contains_key("/api/v1/consults"));
        assert!(paths.contains_key("/healthz/ready"));
    }
}
