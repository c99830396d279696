//! End-to-end tests for the papod HTTP API.
//!
//! Requests go through the full router (extractors, status mapping, JSON)
//! without binding a socket.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use papod::config::Config;
use papod::server::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(AppState::new(&Config::default())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).to_string())
    });
    (status, value)
}

#[tokio::test]
async fn test_root_and_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["users"], 0);
}

#[tokio::test]
async fn test_create_user_grants_welcome() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"name": "Maria Silva", "email": "maria@exemplo.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["level"], json!({"level": 1, "xp": 0, "next_level_xp": 100}));
    assert_eq!(body["achievements"].as_array().unwrap().len(), 1);
    assert_eq!(body["achievements"][0]["id"], "welcome");
    assert_eq!(body["role"], "resident");

    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"name": "Outra Maria", "email": "maria@exemplo.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_and_list_users() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/users", Some(json!({"name": "Ana"}))).await;
    send(&app, Method::POST, "/users", Some(json!({"name": "Chefe", "role": "admin"}))).await;

    let id = created["id"].as_str().unwrap();
    let (status, body) = send(&app, Method::GET, &format!("/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana");

    let (_, all) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, admins) = send(&app, Method::GET, "/users?role=admin", None).await;
    assert_eq!(admins.as_array().unwrap().len(), 1);
    assert_eq!(admins[0]["name"], "Chefe");

    let (status, _) = send(&app, Method::GET, "/users/does-not-exist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_voice_onboarding() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/onboarding/voice",
        Some(json!({"transcript": "Olá, meu nome é maria clara souza"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Maria Clara Souza");
    assert_eq!(body["voice_interactions_count"], 1);
    assert_eq!(body["achievements"][0]["id"], "voice_onboarding");
    assert_eq!(body["achievements"][0]["name"], "Voz Ativa!");

    let (status, _) = send(&app, Method::POST, "/onboarding/voice", Some(json!({"transcript": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/onboarding/voice", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_xp_levels_up_and_grants_badges() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/users", Some(json!({"name": "Ana"}))).await;
    let uri = format!("/users/{}/xp", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"xp": 250}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"], json!({"level": 3, "xp": 40, "next_level_xp": 121}));

    let ids: Vec<&str> = body["achievements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["welcome", "level_2", "level_3"]);
}

#[tokio::test]
async fn test_add_xp_rejections() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/users", Some(json!({"name": "Ana"}))).await;
    let uri = format!("/users/{}/xp", created["id"].as_str().unwrap());

    for amount in [0, -5] {
        let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"xp": amount}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = send(&app, Method::PUT, "/users/nobody/xp", Some(json!({"xp": 10}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_xp_body_formats() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/users", Some(json!({"name": "Ana"}))).await;
    let uri = format!("/users/{}/xp", created["id"].as_str().unwrap());

    // Missing xp counts as zero
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.as_str().unwrap().contains("positive"));

    for bad in [json!({"xp": "dez"}), json!({"xp": 1.5}), json!({"xp": [10]})] {
        let (status, body) = send(&app, Method::PUT, &uri, Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Formato de XP inválido");
    }

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({"xp": "10"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"]["xp"], 10);
}

#[tokio::test]
async fn test_update_user_profile() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/users", Some(json!({"name": "Ana"}))).await;
    send(&app, Method::POST, "/users", Some(json!({"name": "Bia", "email": "bia@exemplo.com"}))).await;
    let uri = format!("/users/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"display_name": "Aninha", "role": "moderator"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display_name"], "Aninha");
    assert_eq!(body["role"], "moderator");
    assert_eq!(body["name"], "Ana");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"name": "A"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"email": "bia@exemplo.com"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, "/users/nobody", Some(json!({"name": "Ana"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trailing_slash_routes() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/users/", Some(json!({"name": "Ana"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/users/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::POST, "/voice-command/", Some(json!({"text": "ajuda"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"]["type"], "dialog");
}

#[tokio::test]
async fn test_voice_command() {
    let app = app();
    let (_, created) = send(&app, Method::POST, "/users", Some(json!({"name": "Ana"}))).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/voice-command",
        Some(json!({"text": "quero listar os moradores residentes", "user_id": id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Vou listar os residentes para você.");
    assert_eq!(body["action"], json!({"type": "navigate", "target": "/residents"}));

    let (_, user) = send(&app, Method::GET, &format!("/users/{}", id), None).await;
    assert_eq!(user["voice_interactions_count"], 1);
    assert_eq!(user["level"]["xp"], 2);

    let (_, body) = send(&app, Method::POST, "/voice-command", Some(json!({"text": "como funciona?"}))).await;
    assert_eq!(body["action"], json!({"type": "dialog", "content": "help_intro"}));

    let (_, body) = send(&app, Method::POST, "/voice-command", Some(json!({"text": "oi"}))).await;
    assert_eq!(body["action"], Value::Null);
}
