//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;

use vetdesk::Trace;
#[cfg(debug_assertions)]
use vetdesk::doc::ApiDoc;
use vetdesk::domain::{
    AnimalService, ConsultService, SequenceAllocator, StaffService, TutorService,
};
use vetdesk::inbound::http::health::{HealthState, live, ready};
use vetdesk::inbound::http::state::HttpState;
use vetdesk::inbound::http::{animals, auth, consults, staff, tutors};
use vetdesk::outbound::persistence::{
    DieselAnimalRepository, DieselConsultRepository, DieselSequenceStore, DieselStaffRepository,
    DieselTutorRepository,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Wire the Diesel adapters and domain services into the handler state.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let pool = config.db_pool.clone();

    let sequence_store = Arc::new(DieselSequenceStore::new(pool.clone()));
    let allocator = Arc::new(
        SequenceAllocator::new(sequence_store, Arc::new(DefaultClock))
            .with_clock_fallback(config.sequence_clock_fallback),
    );

    let tutor_repo: Arc<DieselTutorRepository> = Arc::new(DieselTutorRepository::new(pool.clone()));

    HttpState::new(
        Arc::new(TutorService::new(tutor_repo.clone(), allocator.clone())),
        Arc::new(AnimalService::new(
            Arc::new(DieselAnimalRepository::new(pool.clone())),
            tutor_repo.clone(),
            allocator.clone(),
        )),
        Arc::new(ConsultService::new(
            Arc::new(DieselConsultRepository::new(pool.clone())),
            tutor_repo,
            allocator,
        )),
        Arc::new(StaffService::new(Arc::new(DieselStaffRepository::new(
            pool,
        )))),
    )
}

/// Build and start the HTTP server.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the listener cannot bind.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let health_state = web::Data::new(HealthState::new());
    let http_state = web::Data::new(build_http_state(&config));

    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;
    let same_site = config.same_site;
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(auth::login)
            .service(auth::logout)
            .service(tutors::create_tutor)
            .service(tutors::list_tutors)
            .service(tutors::search_tutors_by_name)
            .service(tutors::search_tutors_by_phone)
            .service(tutors::get_tutor)
            .service(tutors::update_tutor)
            .service(tutors::delete_tutor)
            .service(animals::create_animal)
            .service(animals::list_animals)
            .service(animals::search_animals)
            .service(animals::get_animal_by_sequence)
            .service(animals::get_animal)
            .service(animals::list_animals_by_tutor)
            .service(animals::delete_animal)
            .service(consults::create_consult)
            .service(consults::create_consult_for_tutor)
            .service(consults::list_open_consults)
            .service(consults::get_consult)
            .service(consults::update_consult)
            .service(consults::mark_consult_done)
            .service(staff::create_secretary)
            .service(staff::create_teacher)
            .service(staff::create_student)
            .service(staff::search_students);

        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app = app
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
