//! Tests for the staff service.

use std::sync::Arc;

use crate::domain::ErrorCode;
use crate::domain::ports::MockStaffRepository;
use crate::domain::staff::{StaffDraft, StaffRole};
use crate::domain::staff_service::StaffService;
use crate::domain::test_fixtures::{staff_from, stored_staff};

fn service(repo: MockStaffRepository) -> StaffService {
    StaffService::new(Arc::new(repo))
}

fn secretary_draft() -> StaffDraft {
    StaffDraft::new(
        StaffRole::Secretary,
        "Fernanda Lima",
        "992.960.180-56",
        Some("fernanda@example.com"),
        Some("11933334444"),
        None,
        "hunter22",
    )
    .expect("valid draft")
}

#[tokio::test]
async fn register_inserts_after_uniqueness_checks() {
    let mut repo = MockStaffRepository::new();
    repo.expect_find_by_cpf()
        .withf(|cpf| cpf == "99296018056")
        .return_once(|_| Ok(None));
    repo.expect_find_by_email()
        .withf(|email| email == "fernanda@example.com")
        .return_once(|_| Ok(None));
    repo.expect_insert().return_once(|draft| Ok(staff_from(draft)));

    let created = service(repo).register(secretary_draft()).await.expect("registers");
    assert_eq!(created.cpf, "99296018056");
    assert_eq!(created.role, StaffRole::Secretary);
}

#[tokio::test]
async fn register_rejects_a_taken_cpf() {
    let mut repo = MockStaffRepository::new();
    repo.expect_find_by_cpf()
        .return_once(|_| Ok(Some(stored_staff("hunter22"))));

    let error = service(repo)
        .register(secretary_draft())
        .await
        .expect_err("conflict");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn register_checks_registrations_for_students() {
    let draft = StaffDraft::new(
        StaffRole::Student,
        "Ana Reis",
        "529.982.247-25",
        None,
        None,
        Some("vet-2031"),
        "hunter22",
    )
    .expect("valid draft");

    let mut repo = MockStaffRepository::new();
    repo.expect_find_by_cpf().return_once(|_| Ok(None));
    repo.expect_find_by_registration()
        .withf(|registration| registration == "VET-2031")
        .return_once(|_| Ok(Some(stored_staff("hunter22"))));

    let error = service(repo).register(draft).await.expect_err("conflict");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn authenticate_accepts_the_right_password() {
    let account = stored_staff("hunter22");
    let mut repo = MockStaffRepository::new();
    repo.expect_find_by_email()
        .withf(|email| email == "fernanda@example.com")
        .return_once(move |_| Ok(Some(account)));

    let logged_in = service(repo)
        .authenticate(" Fernanda@Example.com ", "hunter22")
        .await
        .expect("authenticates");
    assert_eq!(logged_in.email.as_deref(), Some("fernanda@example.com"));
}

#[tokio::test]
async fn authenticate_rejects_a_wrong_password() {
    let account = stored_staff("hunter22");
    let mut repo = MockStaffRepository::new();
    repo.expect_find_by_email().return_once(move |_| Ok(Some(account)));

    let error = service(repo)
        .authenticate("fernanda@example.com", "letmein")
        .await
        .expect_err("unauthorised");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn authenticate_rejects_an_unknown_email() {
    let mut repo = MockStaffRepository::new();
    repo.expect_find_by_email().return_once(|_| Ok(None));

    let error = service(repo)
        .authenticate("nobody@example.com", "hunter22")
        .await
        .expect_err("unauthorised");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn authenticate_rejects_a_malformed_email_without_a_lookup() {
    // No expectation on the repository: a lookup would panic the mock.
    let repo = MockStaffRepository::new();

    let error = service(repo)
        .authenticate("not-an-email", "hunter22")
        .await
        .expect_err("unauthorised");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}
