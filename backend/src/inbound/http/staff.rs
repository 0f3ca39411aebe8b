//! Staff account HTTP handlers.
//!
//! ```text
//! POST /api/v1/staff/secretaries
//! POST /api/v1/staff/teachers
//! POST /api/v1/staff/students
//! GET  /api/v1/staff/students/search?q=
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::staff::{Staff, StaffDraft, StaffRole, StaffValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request payload for registering a staff account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStaffRequest {
    /// Full name.
    pub name: String,
    /// CPF.
    pub cpf: String,
    /// Email; empty counts as absent.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Academic registration (teachers and students).
    pub registration: Option<String>,
    /// Initial password.
    pub password: String,
}

/// Staff response payload; never carries credential material.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffResponse {
    pub id: String,
    pub role: String,
    pub name: String,
    pub cpf: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub registration: Option<String>,
    pub created_at: String,
}

impl From<Staff> for StaffResponse {
    fn from(staff: Staff) -> Self {
        Self {
            id: staff.id.to_string(),
            role: staff.role.to_string(),
            name: staff.name,
            cpf: staff.cpf,
            email: staff.email,
            phone: staff.phone,
            registration: staff.registration,
            created_at: staff.created_at.to_rfc3339(),
        }
    }
}

/// Student name search query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentSearchQuery {
    /// Name fragment.
    pub q: String,
}

fn map_staff_validation_error(error: StaffValidationError) -> Error {
    let field = match &error {
        StaffValidationError::EmptyName => "name",
        StaffValidationError::InvalidCpf => "cpf",
        StaffValidationError::InvalidEmail => "email",
        StaffValidationError::InvalidPhone => "phone",
        StaffValidationError::MissingRegistration { .. } => "registration",
        StaffValidationError::PasswordTooShort { .. } => "password",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_field",
    }))
}

async fn register(
    state: &HttpState,
    session: &SessionContext,
    role: StaffRole,
    payload: RegisterStaffRequest,
) -> Result<HttpResponse, Error> {
    session.require_staff()?;
    let draft = StaffDraft::new(
        role,
        &payload.name,
        &payload.cpf,
        payload.email.as_deref(),
        payload.phone.as_deref(),
        payload.registration.as_deref(),
        &payload.password,
    )
    .map_err(map_staff_validation_error)?;

    let account = state.staff.register(draft).await?;
    Ok(HttpResponse::Created().json(StaffResponse::from(account)))
}

/// Register a secretary account.
#[utoipa::path(
    post,
    path = "/api/v1/staff/secretaries",
    request_body = RegisterStaffRequest,
    responses(
        (status = 201, description = "Secretary registered", body = StaffResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Unique field already in use", body = Error)
    ),
    tags = ["staff"],
    operation_id = "createSecretary"
)]
#[post("/staff/secretaries")]
pub async fn create_secretary(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterStaffRequest>,
) -> ApiResult<HttpResponse> {
    register(&state, &session, StaffRole::Secretary, payload.into_inner()).await
}

/// Register a teacher account.
#[utoipa::path(
    post,
    path = "/api/v1/staff/teachers",
    request_body = RegisterStaffRequest,
    responses(
        (status = 201, description = "Teacher registered", body = StaffResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Unique field already in use", body = Error)
    ),
    tags = ["staff"],
    operation_id = "createTeacher"
)]
#[post("/staff/teachers")]
pub async fn create_teacher(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterStaffRequest>,
) -> ApiResult<HttpResponse> {
    register(&state, &session, StaffRole::Teacher, payload.into_inner()).await
}

/// Register a student account.
#[utoipa::path(
    post,
    path = "/api/v1/staff/students",
    request_body = RegisterStaffRequest,
    responses(
        (status = 201, description = "Student registered", body = StaffResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Unique field already in use", body = Error)
    ),
    tags = ["staff"],
    operation_id = "createStudent"
)]
#[post("/staff/students")]
pub async fn create_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterStaffRequest>,
) -> ApiResult<HttpResponse> {
    register(&state, &session, StaffRole::Student, payload.into_inner()).await
}

/// Case-insensitive student name search.
#[utoipa::path(
    get,
    path = "/api/v1/staff/students/search",
    params(StudentSearchQuery),
    responses(
        (status = 200, description = "Matching students"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["staff"],
    operation_id = "searchStudents"
)]
#[get("/staff/students/search")]
pub async fn search_students(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<StudentSearchQuery>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let students = state.staff.search_students(&query.q).await?;
    let students: Vec<StaffResponse> = students.into_iter().map(StaffResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({ "students": students })))
}
