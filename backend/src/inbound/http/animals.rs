//! Animal HTTP handlers.
//!
//! ```text
//! POST   /api/v1/tutors/{tutor_id}/animals
//! GET    /api/v1/animals?page=&numberOfItems=
//! GET    /api/v1/animals/{id}
//! GET    /api/v1/animals/sequence/{sequence}
//! GET    /api/v1/animals/search?q=&page=
//! GET    /api/v1/tutors/{tutor_id}/animals
//! PATCH  /api/v1/animals/{id}/delete
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use pagination::PageEnvelope;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::domain::animal::{Animal, AnimalDraft, AnimalId, AnimalValidationError};
use crate::domain::tutor::TutorId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{page_request, parse_uuid};

/// Request payload for registering an animal.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnimalRequest {
    /// Call name.
    pub name: String,
    /// Species.
    pub species: String,
    /// Breed, when known.
    pub race: Option<String>,
    /// Sex of the animal.
    pub gender: String,
    /// Age free text.
    pub age: String,
    /// Coat description.
    pub coat: Option<String>,
}

/// Animal response payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimalResponse {
    pub id: String,
    pub sequence: Option<String>,
    pub name: String,
    pub species: String,
    pub race: Option<String>,
    pub gender: String,
    pub age: String,
    pub coat: Option<String>,
    pub tutor_id: String,
    pub deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Animal> for AnimalResponse {
    fn from(animal: Animal) -> Self {
        Self {
            id: animal.id.to_string(),
            sequence: animal.sequence.map(String::from),
            name: animal.name,
            species: animal.species,
            race: animal.race,
            gender: animal.gender,
            age: animal.age,
            coat: animal.coat,
            tutor_id: animal.tutor_id.to_string(),
            deleted: animal.deleted,
            created_at: animal.created_at.to_rfc3339(),
            updated_at: animal.updated_at.to_rfc3339(),
        }
    }
}

/// Pager query for animal listings.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListAnimalsQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub number_of_items: u32,
}

/// Name-or-sequence search query.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AnimalSearchQuery {
    /// Name fragment or sequence prefix.
    pub q: String,
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Page size for animal search results.
const SEARCH_PAGE_SIZE: u32 = 10;

fn map_animal_validation_error(error: AnimalValidationError) -> Error {
    let AnimalValidationError::EmptyField { field } = &error;
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_field",
    }))
}

/// Register an animal under a tutor.
#[utoipa::path(
    post,
    path = "/api/v1/tutors/{tutor_id}/animals",
    params(("tutor_id" = String, Path, description = "Owning tutor UUID")),
    request_body = CreateAnimalRequest,
    responses(
        (status = 201, description = "Animal registered", body = AnimalResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such tutor", body = Error),
        (status = 409, description = "Animal already registered", body = Error),
        (status = 503, description = "Record number allocation unavailable", body = Error)
    ),
    tags = ["animals"],
    operation_id = "createAnimal"
)]
#[post("/tutors/{tutor_id}/animals")]
pub async fn create_animal(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateAnimalRequest>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let tutor_id = TutorId::from_uuid(parse_uuid("tutorId", &path.into_inner())?);
    let payload = payload.into_inner();
    let draft = AnimalDraft::new(
        &payload.name,
        &payload.species,
        payload.race.as_deref(),
        &payload.gender,
        &payload.age,
        payload.coat.as_deref(),
    )
    .map_err(map_animal_validation_error)?;

    let animal = state.animals.create(&tutor_id, draft).await?;
    Ok(HttpResponse::Created().json(AnimalResponse::from(animal)))
}

/// One page of animals.
#[utoipa::path(
    get,
    path = "/api/v1/animals",
    params(ListAnimalsQuery),
    responses(
        (status = 200, description = "One page of animals"),
        (status = 400, description = "Invalid pager", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["animals"],
    operation_id = "listAnimals"
)]
#[get("/animals")]
pub async fn list_animals(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListAnimalsQuery>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let page = page_request(query.page, query.number_of_items)?;
    let envelope = state.animals.list(page).await?;
    let envelope = PageEnvelope {
        items: envelope
            .items
            .into_iter()
            .map(AnimalResponse::from)
            .collect::<Vec<_>>(),
        number_of_pages: envelope.number_of_pages,
    };
    Ok(HttpResponse::Ok().json(envelope))
}

/// Fetch one animal by id.
#[utoipa::path(
    get,
    path = "/api/v1/animals/{id}",
    params(("id" = String, Path, description = "Animal UUID")),
    responses(
        (status = 200, description = "Animal", body = AnimalResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such animal", body = Error)
    ),
    tags = ["animals"],
    operation_id = "getAnimal"
)]
#[get("/animals/{id}")]
pub async fn get_animal(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = AnimalId::from_uuid(parse_uuid("id", &path.into_inner())?);
    let animal = state.animals.fetch(&id).await?;
    Ok(HttpResponse::Ok().json(AnimalResponse::from(animal)))
}

/// Fetch one animal by its record number.
#[utoipa::path(
    get,
    path = "/api/v1/animals/sequence/{sequence}",
    params(("sequence" = String, Path, description = "Animal record number")),
    responses(
        (status = 200, description = "Animal", body = AnimalResponse),
        (status = 400, description = "Blank sequence", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such animal", body = Error)
    ),
    tags = ["animals"],
    operation_id = "getAnimalBySequence"
)]
#[get("/animals/sequence/{sequence}")]
pub async fn get_animal_by_sequence(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let animal = state.animals.fetch_by_sequence(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(AnimalResponse::from(animal)))
}

/// Name-or-sequence animal search.
#[utoipa::path(
    get,
    path = "/api/v1/animals/search",
    params(AnimalSearchQuery),
    responses(
        (status = 200, description = "Matching animals"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["animals"],
    operation_id = "searchAnimals"
)]
#[get("/animals/search")]
pub async fn search_animals(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AnimalSearchQuery>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let page = page_request(query.page, SEARCH_PAGE_SIZE)?;
    let animals = state.animals.search(&query.q, page).await?;
    let animals: Vec<AnimalResponse> = animals.into_iter().map(AnimalResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({ "animals": animals })))
}

/// Every animal registered under a tutor.
#[utoipa::path(
    get,
    path = "/api/v1/tutors/{tutor_id}/animals",
    params(("tutor_id" = String, Path, description = "Owning tutor UUID")),
    responses(
        (status = 200, description = "Animals of the tutor"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such tutor", body = Error)
    ),
    tags = ["animals"],
    operation_id = "listAnimalsByTutor"
)]
#[get("/tutors/{tutor_id}/animals")]
pub async fn list_animals_by_tutor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let tutor_id = TutorId::from_uuid(parse_uuid("tutorId", &path.into_inner())?);
    let animals = state.animals.list_by_tutor(&tutor_id).await?;
    let animals: Vec<AnimalResponse> = animals.into_iter().map(AnimalResponse::from).collect();
    Ok(HttpResponse::Ok().json(json!({ "animals": animals })))
}

/// Soft-delete an animal; its record number stays assigned.
#[utoipa::path(
    patch,
    path = "/api/v1/animals/{id}/delete",
    params(("id" = String, Path, description = "Animal UUID")),
    responses(
        (status = 204, description = "Animal marked as deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such animal", body = Error)
    ),
    tags = ["animals"],
    operation_id = "deleteAnimal"
)]
#[patch("/animals/{id}/delete")]
pub async fn delete_animal(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    let id = AnimalId::from_uuid(parse_uuid("id", &path.into_inner())?);
    state.animals.remove(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
