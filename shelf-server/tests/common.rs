use anyhow::{Context, Result};
use axum_test::TestServer;
use serde_json::{Value, json};

use shelf_config::{ConfigLoader, models::sources::EnvConfig};
use shelf_core::{AppUnitOfWork, api_types::routes};
use shelf_server::{AppState, create_app};

/// A server over a fresh in-memory store.
#[allow(unused)]
pub fn test_server() -> Result<TestServer> {
    test_server_with_env(EnvConfig::default())
}

#[allow(unused)]
pub fn test_server_with_env(env: EnvConfig) -> Result<TestServer> {
    let env = EnvConfig {
        storage_backend: Some("memory".into()),
        ..env
    };
    let config = ConfigLoader::new()
        .load_with_env(env, false)
        .context("test configuration")?
        .config;
    let state = AppState::new(AppUnitOfWork::in_memory(), None, config);
    TestServer::new(create_app(state)).map_err(|err| anyhow::anyhow!(err.to_string()))
}

pub fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("response carries an id")
}

#[allow(unused)]
pub async fn create_library(server: &TestServer) -> i64 {
    let response = server
        .post(routes::libraries::COLLECTION)
        .json(&json!({
            "name": "Central",
            "address": "1 Main St",
            "phone": "555-0100",
            "email": "central@library.test",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    id_of(&response.json::<Value>())
}

#[allow(unused)]
pub async fn create_member(server: &TestServer, library: i64, email: &str) -> i64 {
    let response = server
        .post(routes::members::COLLECTION)
        .json(&json!({
            "name": "Ada Reader",
            "email": email,
            "phone": "555-0101",
            "address": "2 Side St",
            "library": library,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    id_of(&response.json::<Value>())
}

#[allow(unused)]
pub async fn create_book(server: &TestServer, library: i64, isbn: &str, copies: i32) -> i64 {
    let response = server
        .post(routes::books::COLLECTION)
        .json(&json!({
            "title": "The Hobbit",
            "isbn": isbn,
            "library": library,
            "publication_date": "1937-09-21",
            "publisher": "Allen & Unwin",
            "total_copies": copies,
            "available_copies": copies,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    id_of(&response.json::<Value>())
}
