//! Handler tests: session auth plus the tutor endpoints, over mocked
//! domain services.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use crate::domain::ports::{
    MockAnimalRepository, MockConsultRepository, MockStaffRepository, MockTutorRepository,
};
use crate::domain::test_fixtures::{empty_allocator, stored_staff, stored_tutor, tutor_from};
use crate::domain::{AnimalService, ConsultService, StaffService, TutorService};
use crate::inbound::http::auth::login;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tutors::create_tutor;

fn state_with(tutor_repo: MockTutorRepository, staff_repo: MockStaffRepository) -> HttpState {
    let allocator = empty_allocator();
    let tutors_arc: Arc<dyn crate::domain::ports::TutorRepository> = Arc::new(tutor_repo);
    HttpState::new(
        Arc::new(TutorService::new(tutors_arc.clone(), allocator.clone())),
        Arc::new(AnimalService::new(
            Arc::new(MockAnimalRepository::new()),
            tutors_arc.clone(),
            allocator.clone(),
        )),
        Arc::new(ConsultService::new(
            Arc::new(MockConsultRepository::new()),
            tutors_arc,
            allocator,
        )),
        Arc::new(StaffService::new(Arc::new(staff_repo))),
    )
}

fn staff_repo_with_account() -> MockStaffRepository {
    let mut staff_repo = MockStaffRepository::new();
    staff_repo
        .expect_find_by_email()
        .returning(|_| Ok(Some(stored_staff("hunter22"))));
    staff_repo
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".into())
                        .cookie_secure(false)
                        .build(),
                )
                .service(web::scope("/api/v1").service(login).service(create_tutor)),
        )
        .await
    };
}

async fn login_cookie<S, B>(app: &S) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({
            "email": "fernanda@example.com",
            "password": "hunter22",
        }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie")
}

fn create_tutor_body() -> Value {
    json!({
        "name": "Maria Souza",
        "cpf": "529.982.247-25",
        "email": "maria@example.com",
        "phone": "(11) 98888-7777",
        "address": "Rua das Acacias 52",
    })
}

#[actix_rt::test]
async fn create_without_a_session_is_unauthorised() {
    let app = init_app!(state_with(
        MockTutorRepository::new(),
        MockStaffRepository::new()
    ));

    let request = test::TestRequest::post()
        .uri("/api/v1/tutors")
        .set_json(create_tutor_body())
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn login_then_create_returns_the_numbered_tutor() {
    let mut tutor_repo = MockTutorRepository::new();
    tutor_repo
        .expect_find_by_cpf_and_phone()
        .return_once(|_, _| Ok(None));
    tutor_repo
        .expect_insert()
        .return_once(|draft, sequence| Ok(tutor_from(draft, sequence)));

    let app = init_app!(state_with(tutor_repo, staff_repo_with_account()));
    let cookie = login_cookie(&app).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/tutors")
        .cookie(cookie)
        .set_json(create_tutor_body())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["sequence"], "1");
    assert_eq!(body["cpf"], "52998224725");
    assert_eq!(body["phone"], "11988887777");
}

#[actix_rt::test]
async fn invalid_phone_is_a_validation_error() {
    let app = init_app!(state_with(
        MockTutorRepository::new(),
        staff_repo_with_account()
    ));
    let cookie = login_cookie(&app).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/tutors")
        .cookie(cookie)
        .set_json(json!({
            "name": "Maria Souza",
            "phone": "123",
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "phone");
}

#[actix_rt::test]
async fn duplicate_tutor_is_a_conflict() {
    let mut tutor_repo = MockTutorRepository::new();
    tutor_repo
        .expect_find_by_cpf_and_phone()
        .return_once(|_, _| Ok(Some(stored_tutor())));

    let app = init_app!(state_with(tutor_repo, staff_repo_with_account()));
    let cookie = login_cookie(&app).await;

    let request = test::TestRequest::post()
        .uri("/api/v1/tutors")
        .cookie(cookie)
        .set_json(create_tutor_body())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "conflict");
}
