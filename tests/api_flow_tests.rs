//! End-to-end HTTP flow on SQLite: register, login, shorten, list, redirect,
//! stats, delete, logout.

mod common;

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, LOCATION};
use actix_web::test::{self, TestRequest};
use actix_web::App;
use serde_json::{Value, json};
use uuid::Uuid;

use shortleak::api::services::configure_app;
use shortleak::runtime::lifetime::AppContext;
use shortleak::services::DisabledMetadataFetcher;

use common::{sqlite_storage, test_config};

const PASSWORD: &str = "Sup3r$ecret";

macro_rules! setup_app {
    ($app:ident, $dir:ident) => {
        let (storage, $dir) = sqlite_storage().await;
        let ctx = AppContext::new(
            &test_config(),
            storage.clone(),
            storage.clone(),
            storage.clone(),
            Arc::new(DisabledMetadataFetcher),
        );
        let $app =
            test::init_service(App::new().configure(|cfg| configure_app(cfg, &ctx))).await;
    };
}

fn register_body(email: &str) -> Value {
    json!({"fullname": "Grace Hopper", "email": email, "password": PASSWORD})
}

#[actix_rt::test]
async fn test_full_link_lifecycle() {
    setup_app!(app, _dir);

    // register
    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("grace@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["email"], "grace@example.com");
    assert!(body["data"].get("password_hash").is_none());

    // login
    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": "Grace@Example.com", "password": PASSWORD}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == "shortleak_session")
        .expect("session cookie missing")
        .into_owned();
    assert_eq!(session.http_only(), Some(true));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["fullname"], "Grace Hopper");
    assert_eq!(body["data"]["token"], session.value());
    let session = Cookie::new("shortleak_session", session.value().to_string());

    // shorten: created, then deduplicated
    let req = TestRequest::post()
        .uri("/shorten")
        .cookie(session.clone())
        .set_json(json!({"url": "https://example.com/docs"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["created"], true);
    let token = body["data"]["short_token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 5);

    let req = TestRequest::post()
        .uri("/shorten")
        .cookie(session.clone())
        .set_json(json!({"url": "https://example.com/docs"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["created"], false);
    assert_eq!(body["data"]["short_token"], token.as_str());

    // list own links
    let req = TestRequest::get()
        .uri("/api/links/user")
        .cookie(session.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // public lookup with owner summary
    let req = TestRequest::get()
        .uri(&format!("/api/links/{}", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["url"], "https://example.com/docs");
    assert_eq!(body["data"]["owner"]["email"], "grace@example.com");

    // two visits by one visitor, one by another
    let visitor = Uuid::new_v4();
    for cookie_value in [visitor, visitor, Uuid::new_v4()] {
        let req = TestRequest::get()
            .uri(&format!("/{}", token))
            .cookie(Cookie::new("client_id", cookie_value.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(LOCATION).unwrap(),
            "https://example.com/docs"
        );
    }

    let req = TestRequest::get()
        .uri(&format!("/stats/{}", token))
        .cookie(session.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total_visits"], 3);
    assert_eq!(body["data"]["unique_visitors"], 2);
    assert_eq!(body["data"]["link"]["short_token"], token.as_str());

    // delete, then everything about the token is gone
    let req = TestRequest::delete()
        .uri(&format!("/api/links/{}", token))
        .cookie(session.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri(&format!("/api/links/{}", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = TestRequest::get().uri(&format!("/{}", token)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // logout expires the cookie
    let req = TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == "shortleak_session")
        .expect("logout should clear the session cookie");
    assert_eq!(cleared.value(), "");
}

#[actix_rt::test]
async fn test_register_validation_and_conflict() {
    setup_app!(app, _dir);

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({"fullname": "Al", "email": "nope", "password": "short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2002);
    assert_eq!(body["message"], "Validation failed");
    assert!(body["data"]["fullname"].is_string());
    assert!(body["data"]["email"].is_string());
    assert!(body["data"]["password"].is_string());

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("dup@example.com"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("DUP@example.com"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    setup_app!(app, _dir);

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(register_body("ada@example.com"))
        .to_request();
    test::call_service(&app, req).await;

    let mut messages = Vec::new();
    for (email, password) in [
        ("ada@example.com", "Wr0ng!pass"),
        ("nobody@example.com", PASSWORD),
    ] {
        let req = TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": email, "password": password}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.response().cookies().next().is_none());
        let body: Value = test::read_body_json(resp).await;
        messages.push(body["message"].as_str().unwrap().to_string());
    }
    assert_eq!(messages[0], "Invalid email or password");
    assert_eq!(messages[0], messages[1]);
}

#[actix_rt::test]
async fn test_protected_routes_require_session() {
    setup_app!(app, _dir);

    let requests = [
        TestRequest::post()
            .uri("/shorten")
            .set_json(json!({"url": "https://example.com"})),
        TestRequest::get().uri("/api/links/user"),
        TestRequest::delete().uri("/api/links/abcde"),
        TestRequest::get().uri("/stats/abcde"),
    ];
    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Unauthorized");
    }

    let req = TestRequest::get()
        .uri("/api/links/user")
        .cookie(Cookie::new("shortleak_session", "garbage"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

/// 注册并登录，返回 JWT
macro_rules! register_and_login {
    ($app:expr, $email:expr) => {{
        let req = TestRequest::post()
            .uri("/api/auth/register")
            .set_json(register_body($email))
            .to_request();
        test::call_service($app, req).await;

        let req = TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": $email, "password": PASSWORD}))
            .to_request();
        let resp = test::call_service($app, req).await;
        let body: Value = test::read_body_json(resp).await;
        body["data"]["token"].as_str().unwrap().to_string()
    }};
}

#[actix_rt::test]
async fn test_bearer_token_and_ownership() {
    setup_app!(app, _dir);

    let alice = register_and_login!(&app, "alice@example.com");
    let bob = register_and_login!(&app, "bob@example.com");

    let req = TestRequest::post()
        .uri("/shorten")
        .insert_header((AUTHORIZATION, format!("Bearer {}", alice)))
        .set_json(json!({"url": "https://example.com/alice"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let token = body["data"]["short_token"].as_str().unwrap().to_string();

    // bob cannot see stats or delete alice's link
    let req = TestRequest::get()
        .uri(&format!("/stats/{}", token))
        .insert_header((AUTHORIZATION, format!("Bearer {}", bob)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = TestRequest::delete()
        .uri(&format!("/api/links/{}", token))
        .insert_header((AUTHORIZATION, format!("Bearer {}", bob)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = TestRequest::get()
        .uri("/api/links/user")
        .insert_header((AUTHORIZATION, format!("Bearer {}", bob)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_shorten_input_errors() {
    setup_app!(app, _dir);
    let token = register_and_login!(&app, "input@example.com");
    let auth = (AUTHORIZATION, format!("Bearer {}", token));

    let req = TestRequest::post()
        .uri("/shorten")
        .insert_header(auth.clone())
        .set_json(json!({}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = TestRequest::post()
        .uri("/shorten")
        .insert_header(auth.clone())
        .set_json(json!({"url": "definitely not a url"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3002);

    let req = TestRequest::post()
        .uri("/shorten")
        .insert_header(auth)
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}
