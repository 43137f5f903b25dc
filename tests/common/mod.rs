#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use menu_api::{
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Helper harness for spinning up the full router backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with a fresh, migrated store.
    pub async fn new() -> Self {
        let cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            3000,
            "test".to_string(),
        );

        // A single pooled connection keeps every query on the same in-memory database.
        let pool = db::establish_connection_with_config(&DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = menu_api::build_router(state.clone());

        Self { router, state }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a raw JSON-typed body, for payloads `serde_json` would never produce.
    pub async fn request_raw(&self, method: Method, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Creates a category and returns its `data` object.
    pub async fn create_category(&self, body: Value) -> Value {
        let response = self.request(Method::POST, "/api/categories", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["data"].clone()
    }

    /// Creates a subcategory and returns its `data` object.
    pub async fn create_subcategory(&self, body: Value) -> Value {
        let response = self
            .request(Method::POST, "/api/subcategories", Some(body))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["data"].clone()
    }

    /// Creates an item and returns its `data` object.
    pub async fn create_item(&self, body: Value) -> Value {
        let response = self.request(Method::POST, "/api/items", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["data"].clone()
    }

    /// Seeds the usual Beverages > Soda pair.
    pub async fn seed_beverages(&self) -> (Value, Value) {
        let category = self.create_category(json!({ "name": "Beverages" })).await;
        let subcategory = self
            .create_subcategory(json!({ "category_id": category["id"], "name": "Soda" }))
            .await;
        (category, subcategory)
    }
}

/// Reads a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&body).expect("response body is not json")
}

/// Pulls a string field out of a JSON object.
pub fn text(value: &Value, field: &str) -> String {
    value[field]
        .as_str()
        .unwrap_or_else(|| panic!("{field} should be a string in {value}"))
        .to_string()
}
