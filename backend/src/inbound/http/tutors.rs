//! Tutor HTTP handlers.
//!
//! ```text
//! POST   /api/v1/tutors
//! GET    /api/v1/tutors?page=&numberOfItems=
//! GET    /api/v1/tutors/{id}
//! GET    /api/v1/tutors/search/name?q=
//! GET    /api/v1/tutors/search/phone?q=&page=
//! PUT    /api/v1/tutors/{id}
//! PATCH  /api/v1/tutors/{id}/delete
//! ```

use actix_web::{HttpResponse, get, patch, post, put, web};
use pagination::PageEnvelope;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::tutor::{Tutor, TutorDraft, TutorId, TutorUpdate, TutorValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{page_request, parse_uuid};

/// Request payload for registering a tutor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTutorRequest {
    /// Full name.
    pub name: String,
    /// CPF; empty counts as absent.
    pub cpf: Option<String>,
    /// Email; empty counts as absent.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: String,
    /// Postal address.
    pub address: Option<String>,
}

/// Request payload for updating a tutor; absent fields stay untouched.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTutorRequest {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Tutor response payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TutorResponse {
    pub id: String,
    pub sequence: Option<String>,
    pub name: String,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Tutor> for TutorResponse {
    fn from(tutor: Tutor) -> Self {
        Self {
            id: tutor.id.to_string(),
            sequence: tutor.sequence.map(String::from),
            name: tutor.name,
            cpf: tutor.cpf,
            email: tutor.email,
            phone: tutor.phone,
            address: tutor.address,
            deleted: tutor.deleted,
            created_at: tutor.created_at.to_rfc3339(),
            updated_at: tutor.updated_at.to_rfc3339(),
        }
    }
}

/// Pager query for tutor listings.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListTutorsQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub number_of_items: u32,
}

/// Name search query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct NameSearchQuery {
    /// Name fragment; dashes are read as spaces.
    pub q: String,
}

/// Phone search query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct PhoneSearchQuery {
    /// Phone fragment.
    pub q: String,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Page size for phone search results.
const PHONE_SEARCH_PAGE_SIZE: u32 = 5;

pub(crate) fn map_tutor_validation_error(error: TutorValidationError) -> Error {
    let field = match error {
        TutorValidationError::EmptyName => "name",
        TutorValidationError::InvalidPhone => "phone",
        TutorValidationError::InvalidCpf => "cpf",
        TutorValidationError::InvalidEmail => "email",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_field",
    }))
}

/// Register a tutor.
#[utoipa::path(
    post,
    path = "/api/v1/tutors",
    request_body = CreateTutorRequest,
    responses(
        (status = 201, description = "Tutor registered", body = TutorResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Tutor already registered", body = Error),
        (status = 503, description = "Record number allocation unavailable", body = Error)
    ),
    tags = ["tutors"],
    operation_id = "createTutor"
)]
#[post("/tutors")]
pub async fn create_tutor(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateTutorRequest>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let payload = payload.into_inner();
    let draft = TutorDraft::new(
        &payload.name,
        payload.cpf.as_deref(),
        payload.email.as_deref(),
        &payload.phone,
        payload.address.as_deref(),
    )
    .map_err(map_tutor_validation_error)?;

    let tutor = state.tutors.create(draft).await?;
    Ok(HttpResponse::Created().json(TutorResponse::from(tutor)))
}

/// One page of non-deleted tutors.
#[utoipa::path(
    get,
    path = "/api/v1/tutors",
    params(ListTutorsQuery),
    responses(
        (status = 200, description = "One page of tutors"),
        (status = 400, description = "Invalid pager", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["tutors"],
    operation_id = "listTutors"
)]
#[get("/tutors")]
pub async fn list_tutors(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListTutorsQuery>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let page = page_request(query.page, query.number_of_items)?;
    let envelope = state.tutors.list(page).await?;
    let envelope = PageEnvelope {
        items: envelope
            .items
            .into_iter()
            .map(TutorResponse::from)
            .collect::<Vec<_>>(),
        number_of_pages: envelope.number_of_pages,
    };
    Ok(HttpResponse::Ok().json(envelope))
}

/// Fetch one tutor by id.
#[utoipa::path(
    get,
    path = "/api/v1/tutors/{id}",
    params(("id" = String, Path, description = "Tutor UUID")),
    responses(
        (status = 200, description = "Tutor", body = TutorResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such tutor", body = Error)
    ),
    tags = ["tutors"],
    operation_id = "getTutor"
)]
#[get("/tutors/{id}")]
pub async fn get_tutor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = TutorId::from_uuid(parse_uuid("id", &path.into_inner())?);
    let tutor = state.tutors.fetch(&id).await?;
    Ok(HttpResponse::Ok().json(TutorResponse::from(tutor)))
}

/// Case-insensitive tutor name search.
#[utoipa::path(
    get,
    path = "/api/v1/tutors/search/name",
    params(NameSearchQuery),
    responses(
        (status = 200, description = "Matching tutors"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["tutors"],
    operation_id = "searchTutorsByName"
)]
#[get("/tutors/search/name")]
pub async fn search_tutors_by_name(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NameSearchQuery>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    // URL-friendly dashes stand in for spaces in the booking UI.
    let needle = query.q.replace('-', " ");
    let tutors = state.tutors.search_by_name(&needle).await?;
    let tutors: Vec<TutorResponse> = tutors.into_iter().map(TutorResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({ "tutors": tutors })))
}

/// Tutor phone search, five results per page.
#[utoipa::path(
    get,
    path = "/api/v1/tutors/search/phone",
    params(PhoneSearchQuery),
    responses(
        (status = 200, description = "Matching tutors"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["tutors"],
    operation_id = "searchTutorsByPhone"
)]
#[get("/tutors/search/phone")]
pub async fn search_tutors_by_phone(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PhoneSearchQuery>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let page = page_request(query.page, PHONE_SEARCH_PAGE_SIZE)?;
    let tutors = state.tutors.search_by_phone(&query.q, page).await?;
    let tutors: Vec<TutorResponse> = tutors.into_iter().map(TutorResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({ "tutors": tutors })))
}

/// Update a tutor.
#[utoipa::path(
    put,
    path = "/api/v1/tutors/{id}",
    params(("id" = String, Path, description = "Tutor UUID")),
    request_body = UpdateTutorRequest,
    responses(
        (status = 200, description = "Updated tutor", body = TutorResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such tutor", body = Error),
        (status = 409, description = "Unique field already in use", body = Error)
    ),
    tags = ["tutors"],
    operation_id = "updateTutor"
)]
#[put("/tutors/{id}")]
pub async fn update_tutor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateTutorRequest>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = TutorId::from_uuid(parse_uuid("id", &path.into_inner())?);
    let payload = payload.into_inner();
    let update = TutorUpdate::new(
        payload.name.as_deref(),
        payload.cpf.as_deref(),
        payload.email.as_deref(),
        payload.phone.as_deref(),
        payload.address.as_deref(),
    )
    .map_err(map_tutor_validation_error)?;

    let tutor = state.tutors.update(&id, update).await?;
    Ok(HttpResponse::Ok().json(TutorResponse::from(tutor)))
}

/// Soft-delete a tutor; its record number stays assigned.
#[utoipa::path(
    patch,
    path = "/api/v1/tutors/{id}/delete",
    params(("id" = String, Path, description = "Tutor UUID")),
    responses(
        (status = 204, description = "Tutor marked as deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such tutor", body = Error)
    ),
    tags = ["tutors"],
    operation_id = "deleteTutor"
)]
#[patch("/tutors/{id}/delete")]
pub async fn delete_tutor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = TutorId::from_uuid(parse_uuid("id", &path.into_inner())?);
    state.tutors.remove(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
