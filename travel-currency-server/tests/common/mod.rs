//! Shared helpers for router and client tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use currency_core::StoredPreference;
use travel_currency_server::{
    build_router, AppState, InMemoryPreferenceStore, PreferenceStore, ServerConfig, StoreError,
};

pub const GEO: &str = "x-vercel-ip-country";
pub const USER: &str = "x-user-id";

fn unavailable() -> StoreError {
    StoreError::Status {
        status: 503,
        body: "unavailable".to_string(),
    }
}

/// Store whose every call fails, standing in for an unreachable profile database
pub struct UnavailableStore;

#[async_trait]
impl PreferenceStore for UnavailableStore {
    async fn get(&self, _user_id: &str) -> Result<Option<StoredPreference>, StoreError> {
        Err(unavailable())
    }
    async fn put(&self, _user_id: &str, _preference: &StoredPreference) -> Result<(), StoreError> {
        Err(unavailable())
    }
    async fn clear(&self, _user_id: &str) -> Result<(), StoreError> {
        Err(unavailable())
    }
}

pub fn memory_app() -> (axum::Router, InMemoryPreferenceStore) {
    let store = InMemoryPreferenceStore::new();
    let app = build_router(AppState::new(ServerConfig::default(), Arc::new(store.clone())));
    (app, store)
}

pub fn app_with(store: Arc<dyn PreferenceStore>) -> axum::Router {
    build_router(AppState::new(ServerConfig::default(), store))
}

pub async fn send(app: &axum::Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}
