mod common;

use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, App};
use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::json;
use taskdesk::auth::AuthResponse;
use taskdesk::models::{NewUser, Role};

use common::{bearer, test_state};

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let state = test_state(&[]);
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| state.configure(cfg)),
    )
    .await;

    let credentials = json!({ "email": "integration@example.com", "password": "Password123!" });

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(registered.user.email, "integration@example.com");
    assert_eq!(registered.user.role, Role::User);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(&credentials)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;

    // Only the token and the public projection of the user come back.
    assert_eq!(body["user"], json!({ "email": "integration@example.com", "role": "user" }));
    assert!(body.get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let login_claims = state.keys.verify(token).unwrap();
    let register_claims = state.keys.verify(&registered.token).unwrap();
    assert_eq!(login_claims.sub, register_claims.sub);
    assert_eq!(login_claims.email, "integration@example.com");
    assert_eq!(login_claims.role, Role::User);
}

#[actix_rt::test]
async fn test_duplicate_registration_conflicts() {
    let state = test_state(&[]);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let payload = json!({ "email": "dup@example.com", "password": "Password123!" });

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "User already exists" }));
}

#[actix_rt::test]
async fn test_concurrent_registration_admits_one() {
    let state = test_state(&[]);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;
    let payload = json!({ "email": "race@example.com", "password": "Password123!" });

    let first = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();
    let second = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&payload)
        .to_request();

    let (a, b) = futures::join!(
        test::call_service(&app, first),
        test::call_service(&app, second)
    );
    let mut statuses = vec![a.status().as_u16(), b.status().as_u16()];
    statuses.sort();

    assert_eq!(statuses, vec![201, 409]);
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let state = test_state(&[]);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let test_cases = vec![
        (json!({ "password": "Password123!" }), "missing email"),
        (json!({ "email": "test@example.com" }), "missing password"),
        (json!({ "email": "", "password": "Password123!" }), "empty email"),
        (json!({ "email": "test@example.com", "password": "" }), "empty password"),
        (
            json!({ "email": "test@example.com", "password": "Password123!", "role": "root" }),
            "unknown role",
        ),
        (
            json!({ "email": "test@example.com", "password": "Password123!", "role": "admin" }),
            "self-assigned admin role",
        ),
        (
            json!({ "email": "test@example.com", "password": format!("{}CORRECT", "a".repeat(72)) }),
            "password longer than 72 bytes",
        ),
        (json!(42), "wrong body shape"),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;

        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "Test case failed: {}. Body: {:?}",
            description,
            String::from_utf8_lossy(&body)
        );
    }
}

#[actix_rt::test]
async fn test_admin_role_with_selection_enabled() {
    let state = test_state(&[("ALLOW_ROLE_SELECTION", "true")]);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "ops@example.com", "password": "Password123!", "role": "admin" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(body.user.role, Role::Admin);
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let state = test_state(&[]);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "login_test_user@example.com", "password": "Password123!" }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "login_test_user@example.com", "password": "WrongPassword123!" }))
        .to_request();
    let resp_wrong = test::call_service(&app, wrong_password).await;
    let status_wrong = resp_wrong.status();
    let body_wrong = test::read_body(resp_wrong).await;

    let unknown_user = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "nonexistent@example.com", "password": "Password123!" }))
        .to_request();
    let resp_unknown = test::call_service(&app, unknown_user).await;
    let status_unknown = resp_unknown.status();
    let body_unknown = test::read_body(resp_unknown).await;

    assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
    assert_eq!(status_unknown, status_wrong);
    assert_eq!(body_unknown, body_wrong);
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let state = test_state(&[]);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    for payload in [
        json!({ "password": "Password123!" }),
        json!({ "email": "someone@example.com" }),
        json!({ "email": "", "password": "" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
    }
}

#[actix_rt::test]
async fn test_expired_token_is_rejected() {
    let state = test_state(&[]);
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let user = NewUser {
        email: "late@example.com".into(),
        password_hash: String::new(),
        role: Role::User,
    }
    .into_user();
    let expired = state
        .keys
        .issue_with_lifetime(&user, Duration::minutes(-5))
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&expired))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Not authorized" }));
}

#[actix_rt::test]
async fn test_bootstrapped_admin_can_log_in() {
    let state = test_state(&[]);
    state
        .auth
        .bootstrap_admin(Some("root@example.com"), Some("RootPassword1"))
        .await
        .unwrap();
    let app = test::init_service(App::new().configure(|cfg| state.configure(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "root@example.com", "password": "RootPassword1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(body.user.role, Role::Admin);
    assert_eq!(state.keys.verify(&body.token).unwrap().role, Role::Admin);
}
