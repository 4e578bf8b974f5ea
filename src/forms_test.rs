use serde_json::json;

use super::*;
use crate::test_support::{Canned, FakeServer, unreachable_base_url};
use crate::validate::{Field, PASSWORDS_DO_NOT_MATCH};

fn login_form(email: &str, password: &str) -> LoginForm {
    LoginForm { email: email.to_owned(), password: password.to_owned() }
}

fn register_form(password: &str, confirm: &str) -> RegisterForm {
    RegisterForm {
        email: "a@b.com".to_owned(),
        username: "alice".to_owned(),
        password: password.to_owned(),
        confirm_password: confirm.to_owned(),
    }
}

// =============================================================================
// failure_message
// =============================================================================

#[test]
fn failure_message_prefers_server_message() {
    let err = AuthError::Api { status_code: 400, message: "Bad password".to_owned(), from_server: true };
    assert_eq!(failure_message(&err, LOGIN_FAILED), "Bad password");
}

#[test]
fn failure_message_ignores_generic_status_text() {
    let err = AuthError::Api { status_code: 400, message: "request failed with status 400".to_owned(), from_server: false };
    assert_eq!(failure_message(&err, LOGIN_FAILED), LOGIN_FAILED);
}

#[test]
fn failure_message_falls_back_without_response() {
    assert_eq!(failure_message(&AuthError::Transport("refused".to_owned()), LOGIN_FAILED), LOGIN_FAILED);
    assert_eq!(failure_message(&AuthError::InvalidResponse("eof".to_owned()), REGISTER_FAILED), REGISTER_FAILED);
}

#[test]
fn in_flight_flag_is_exclusive_and_released_on_drop() {
    let flag = AtomicBool::new(false);
    let first = InFlight::acquire(&flag);
    assert!(first.is_some());
    assert!(InFlight::acquire(&flag).is_none());
    drop(first);
    assert!(InFlight::acquire(&flag).is_some());
}

// =============================================================================
// LoginController
// =============================================================================

#[tokio::test]
async fn login_invalid_input_sends_nothing() {
    let server = FakeServer::start(vec![]).await;
    let session = SessionManager::new(&server.config()).unwrap();
    let controller = LoginController::default();

    for form in [login_form("not-an-email", "secret1"), login_form("a@b.com", "12345")] {
        let outcome = controller.submit(&session, &form).await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)), "got {outcome:?}");
    }
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn login_success_redirects_to_notifications() {
    let server =
        FakeServer::start(vec![("POST", "/auth/login", Canned::json(200, &json!({ "id": "u1", "token": "t" })))]).await;
    let session = SessionManager::new(&server.config()).unwrap();
    let controller = LoginController::default();

    let outcome = controller.submit(&session, &login_form("a@b.com", "secret1")).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Succeeded {
            toast: Toast::success(LOGIN_SUCCEEDED),
            redirect: Route::Notifications,
            delay: Duration::ZERO,
        }
    );
    assert!(session.is_authenticated());
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn login_rejection_surfaces_server_message() {
    let server = FakeServer::start(vec![(
        "POST",
        "/auth/login",
        Canned::json(401, &json!({ "message": "Invalid credentials" })),
    )])
    .await;
    let session = SessionManager::new(&server.config()).unwrap();
    let controller = LoginController::default();

    let outcome = controller.submit(&session, &login_form("a@b.com", "secret1")).await;
    assert_eq!(outcome, SubmitOutcome::Failed(Toast::error("Invalid credentials")));
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn login_transport_failure_uses_fallback() {
    let config = crate::config::ClientConfig::default().with_base_url(&unreachable_base_url().await);
    let session = SessionManager::new(&config).unwrap();
    let controller = LoginController::default();

    let outcome = controller.submit(&session, &login_form("a@b.com", "secret1")).await;
    assert_eq!(outcome, SubmitOutcome::Failed(Toast::error(LOGIN_FAILED)));
}

#[tokio::test]
async fn duplicate_login_submission_is_suppressed() {
    let server =
        FakeServer::start(vec![("POST", "/auth/login", Canned::json(200, &json!({ "id": "u1", "token": "t" })))]).await;
    let session = SessionManager::new(&server.config()).unwrap();
    let controller = LoginController::default();
    let form = login_form("a@b.com", "secret1");

    let (first, second) = tokio::join!(controller.submit(&session, &form), controller.submit(&session, &form));
    assert!(matches!(first, SubmitOutcome::Succeeded { .. }));
    assert_eq!(second, SubmitOutcome::Busy);
    assert_eq!(server.requests().len(), 1);
}

// =============================================================================
// RegisterController
// =============================================================================

#[tokio::test]
async fn register_mismatch_rejected_locally() {
    let server = FakeServer::start(vec![]).await;
    let session = SessionManager::new(&server.config()).unwrap();
    let controller = RegisterController::new(Duration::ZERO);

    let SubmitOutcome::Invalid(errors) = controller.submit(&session, &register_form("abc123", "xyz999")).await else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.get(Field::ConfirmPassword), Some(PASSWORDS_DO_NOT_MATCH));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn register_success_redirects_to_login_after_delay() {
    let server = FakeServer::start(vec![("POST", "/auth/register", Canned::json(201, &json!({})))]).await;
    let session = SessionManager::new(&server.config()).unwrap();
    let controller = RegisterController::new(Duration::from_millis(2000));

    let outcome = controller.submit(&session, &register_form("abc123", "abc123")).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Succeeded {
            toast: Toast::success(REGISTER_SUCCEEDED),
            redirect: Route::Login,
            delay: Duration::from_millis(2000),
        }
    );
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn register_failure_without_message_uses_fallback() {
    let server = FakeServer::start(vec![("POST", "/auth/register", Canned::text(500, "boom"))]).await;
    let session = SessionManager::new(&server.config()).unwrap();
    let controller = RegisterController::new(Duration::ZERO);

    let outcome = controller.submit(&session, &register_form("abc123", "abc123")).await;
    assert_eq!(outcome, SubmitOutcome::Failed(Toast::error(REGISTER_FAILED)));
}

#[tokio::test]
async fn login_failure_with_empty_body_uses_fallback() {
    let server = FakeServer::start(vec![("POST", "/auth/login", Canned::json(400, &json!({})))]).await;
    let session = SessionManager::new(&server.config()).unwrap();
    let controller = LoginController::default();

    let outcome = controller.submit(&session, &login_form("a@b.com", "secret1")).await;
    assert_eq!(outcome, SubmitOutcome::Failed(Toast::error(LOGIN_FAILED)));
    assert!(!session.is_authenticated());
}
