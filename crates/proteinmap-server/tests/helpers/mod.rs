//! Test helpers for ProteinMap server integration tests

#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use proteinmap_common::AminoAcidAlphabet;
use proteinmap_server::{
    api::{self, AppState},
    config::Config,
    db,
};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

/// A pool that never connects unless a request reaches storage
///
/// Points at a closed port so a request that does reach storage fails fast.
pub fn lazy_pool() -> PgPool {
    let mut config = Config::default().database;
    config.url = "postgresql://127.0.0.1:1/proteinmap_test".to_string();
    config.min_connections = 0;
    config.connect_timeout_secs = 1;
    db::create_lazy_pool(&config).expect("Failed to build lazy pool")
}

/// Setup the full application router on top of `pool`
pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState {
        db: pool,
        alphabet: Arc::new(AminoAcidAlphabet::canonical()),
    };
    api::create_router(state, &Config::default().cors)
}

pub async fn send(app: Router, request: Request<Body>) -> (Response, Value) {
    let response = app.oneshot(request).await.expect("Request failed");
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (Response::from_parts(parts, Body::empty()), json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .expect("Failed to build request")
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .expect("Failed to build request")
}

/// Insert an organism row directly
pub async fn insert_organism(pool: &PgPool, taxa_id: i32) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO organisms (taxa_id, clade, genus, species) VALUES ($1, 'E', 'Homo', 'sapiens')")
        .bind(taxa_id)
        .execute(pool)
        .await
        .map(|_| ())
}

/// Insert a Pfam row directly
pub async fn insert_pfam(pool: &PgPool, pfam_id: &str, description: &str) -> sqlx::Result<()> {
    sqlx::query("INSERT INTO pfams (pfam_id, description) VALUES ($1, $2)")
        .bind(pfam_id)
        .bind(description)
        .execute(pool)
        .await
        .map(|_| ())
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
