//! Consult HTTP handlers.
//!
//! ```text
//! POST   /api/v1/consults                       booking that registers the tutor too
//! POST   /api/v1/tutors/{tutor_id}/consults     booking for an existing tutor
//! GET    /api/v1/consults/open
//! GET    /api/v1/consults/{id}
//! PUT    /api/v1/consults/{id}
//! PATCH  /api/v1/consults/{id}/done
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::consult::{
    Consult, ConsultDraft, ConsultId, ConsultUpdate, ConsultValidationError,
};
use crate::domain::tutor::TutorId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_uuid;

/// Request payload for a booking that registers the tutor as well.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultRequest {
    /// Animal name as given over the phone.
    pub animal_name: String,
    /// Visit date, `dd/mm/yyyy`.
    pub date: String,
    /// Species.
    pub species: String,
    /// Contact phone.
    pub phone: String,
    /// Free-text reason or notes.
    pub description: Option<String>,
    /// Name of the tutor to register.
    pub tutor_name: String,
}

/// Request payload for a booking under an existing tutor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConsultForTutorRequest {
    /// Animal name as given over the phone.
    pub animal_name: String,
    /// Visit date, `dd/mm/yyyy`.
    pub date: String,
    /// Species.
    pub species: String,
    /// Contact phone.
    pub phone: String,
    /// Free-text reason or notes.
    pub description: Option<String>,
}

/// Request payload for updating a consult; absent fields stay untouched.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConsultRequest {
    pub animal_name: Option<String>,
    pub species: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    /// Visit date, `dd/mm/yyyy`.
    pub date: Option<String>,
}

/// Consult response payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultResponse {
    pub id: String,
    pub sequence: Option<String>,
    pub animal_name: String,
    pub species: String,
    pub phone: String,
    pub description: Option<String>,
    /// Visit date, ISO `yyyy-mm-dd`.
    pub date: String,
    pub done: bool,
    pub tutor_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Consult> for ConsultResponse {
    fn from(consult: Consult) -> Self {
        Self {
            id: consult.id.to_string(),
            sequence: consult.sequence.map(String::from),
            animal_name: consult.animal_name,
            species: consult.species,
            phone: consult.phone,
            description: consult.description,
            date: consult.date.to_string(),
            done: consult.done,
            tutor_id: consult.tutor_id.to_string(),
            created_at: consult.created_at.to_rfc3339(),
            updated_at: consult.updated_at.to_rfc3339(),
        }
    }
}

pub(crate) fn map_consult_validation_error(error: ConsultValidationError) -> Error {
    let field = match &error {
        ConsultValidationError::EmptyField { field } => *field,
        ConsultValidationError::InvalidPhone => "phone",
        ConsultValidationError::InvalidDate { .. } => "date",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_field",
    }))
}

/// Book a consult and register its tutor in one step.
#[utoipa::path(
    post,
    path = "/api/v1/consults",
    request_body = CreateConsultRequest,
    responses(
        (status = 201, description = "Consult booked", body = ConsultResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Tutor already registered", body = Error),
        (status = 503, description = "Record number allocation unavailable", body = Error)
    ),
    tags = ["consults"],
    operation_id = "createConsult"
)]
#[post("/consults")]
pub async fn create_consult(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateConsultRequest>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let payload = payload.into_inner();
    let draft = ConsultDraft::new(
        &payload.animal_name,
        &payload.species,
        &payload.phone,
        payload.description.as_deref(),
        &payload.date,
    )
    .map_err(map_consult_validation_error)?;

    let consult = state
        .consults
        .create_with_new_tutor(&payload.tutor_name, draft)
        .await?;
    Ok(HttpResponse::Created().json(ConsultResponse::from(consult)))
}

/// Book a consult for an existing tutor.
#[utoipa::path(
    post,
    path = "/api/v1/tutors/{tutor_id}/consults",
    params(("tutor_id" = String, Path, description = "Tutor UUID")),
    request_body = CreateConsultForTutorRequest,
    responses(
        (status = 201, description = "Consult booked", body = ConsultResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such tutor", body = Error),
        (status = 503, description = "Record number allocation unavailable", body = Error)
    ),
    tags = ["consults"],
    operation_id = "createConsultForTutor"
)]
#[post("/tutors/{tutor_id}/consults")]
pub async fn create_consult_for_tutor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateConsultForTutorRequest>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let tutor_id = TutorId::from_uuid(parse_uuid("tutorId", &path.into_inner())?);
    let payload = payload.into_inner();
    let draft = ConsultDraft::new(
        &payload.animal_name,
        &payload.species,
        &payload.phone,
        payload.description.as_deref(),
        &payload.date,
    )
    .map_err(map_consult_validation_error)?;

    let consult = state.consults.create_for_tutor(&tutor_id, draft).await?;
    Ok(HttpResponse::Created().json(ConsultResponse::from(consult)))
}

/// Consults not yet carried out, newest visit date first.
#[utoipa::path(
    get,
    path = "/api/v1/consults/open",
    responses(
        (status = 200, description = "Open consults"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["consults"],
    operation_id = "listOpenConsults"
)]
#[get("/consults/open")]
pub async fn list_open_consults(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let consults = state.consults.list_open().await?;
    let consults: Vec<ConsultResponse> = consults.into_iter().map(ConsultResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({ "consults": consults })))
}

/// Fetch one consult by id.
#[utoipa::path(
    get,
    path = "/api/v1/consults/{id}",
    params(("id" = String, Path, description = "Consult UUID")),
    responses(
        (status = 200, description = "Consult", body = ConsultResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such consult", body = Error)
    ),
    tags = ["consults"],
    operation_id = "getConsult"
)]
#[get("/consults/{id}")]
pub async fn get_consult(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = ConsultId::from_uuid(parse_uuid("id", &path.into_inner())?);
    let consult = state.consults.fetch(&id).await?;
    Ok(HttpResponse::Ok().json(ConsultResponse::from(consult)))
}

/// Update a consult.
#[utoipa::path(
    put,
    path = "/api/v1/consults/{id}",
    params(("id" = String, Path, description = "Consult UUID")),
    request_body = UpdateConsultRequest,
    responses(
        (status = 200, description = "Updated consult", body = ConsultResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such consult", body = Error)
    ),
    tags = ["consults"],
    operation_id = "updateConsult"
)]
#[put("/consults/{id}")]
pub async fn update_consult(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateConsultRequest>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = ConsultId::from_uuid(parse_uuid("id", &path.into_inner())?);
    let payload = payload.into_inner();
    let update = ConsultUpdate::new(
        payload.animal_name.as_deref(),
        payload.species.as_deref(),
        payload.phone.as_deref(),
        payload.description.as_deref(),
        payload.date.as_deref(),
    )
    .map_err(map_consult_validation_error)?;

    let consult = state.consults.update(&id, update).await?;
    Ok(HttpResponse::Ok().json(ConsultResponse::from(consult)))
}

/// Mark a consult as carried out.
#[utoipa::path(
    patch,
    path = "/api/v1/consults/{id}/done",
    params(("id" = String, Path, description = "Consult UUID")),
    responses(
        (status = 204, description = "Consult marked as done"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such consult", body = Error)
    ),
    tags = ["consults"],
    operation_id = "markConsultDone"
)]
#[patch("/consults/{id}/done")]
pub async fn mark_consult_done(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = ConsultId::from_uuid(parse_uuid("id", &path.into_inner())?);
    state.consults.mark_done(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
