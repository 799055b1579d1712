//! Shared helpers for endpoint tests
//!
//! Requests go through the real router with `tower::ServiceExt::oneshot`, so
//! routing, extraction and error rendering are all exercised.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{Map, Value};
use tower::ServiceExt;

use inventory_api::config::ServiceConfig;
use inventory_api::filter::FilterSet;
use inventory_api::http_server::{build_router, AppState};
use inventory_api::store::{DocumentStore, GroupCount, MemoryStore, StoreError, StoreResult};

/// Router over a fresh in-memory store, plus a handle to that store for seeding
pub fn test_app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let state = Arc::new(AppState::new(Arc::new(store.clone())));
    (build_router(&ServiceConfig::default(), state), store)
}

/// Router whose store fails every call
pub fn failing_app() -> Router {
    let state = Arc::new(AppState::new(Arc::new(UnreachableStore)));
    build_router(&ServiceConfig::default(), state)
}

/// Send one request and return the status with the decoded body.
///
/// Non-JSON bodies (axum extractor rejections) come back as a JSON string.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    let response = router.clone().oneshot(request).await.expect("infallible router");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

pub async fn put(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::PUT, uri, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::DELETE, uri, None).await
}

/// A store that is never reachable
pub struct UnreachableStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::unavailable("connection refused"))
}

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn increment(&self, _counters: &str, _sequence: &str) -> StoreResult<i64> {
        down()
    }

    async fn insert_one(&self, _collection: &str, _id: i64, _document: Value) -> StoreResult<()> {
        down()
    }

    async fn find_one(&self, _collection: &str, _id: i64) -> StoreResult<Option<Value>> {
        down()
    }

    async fn update_one(
        &self,
        _collection: &str,
        _id: i64,
        _fields: Map<String, Value>,
    ) -> StoreResult<u64> {
        down()
    }

    async fn delete_one(&self, _collection: &str, _id: i64) -> StoreResult<u64> {
        down()
    }

    async fn find(
        &self,
        _collection: &str,
        _filter: &FilterSet,
        _limit: usize,
    ) -> StoreResult<Vec<Value>> {
        down()
    }

    async fn group_count(
        &self,
        _collection: &str,
        _field: &str,
        _limit: usize,
    ) -> StoreResult<Vec<GroupCount>> {
        down()
    }

    async fn ping(&self) -> StoreResult<()> {
        down()
    }
}
