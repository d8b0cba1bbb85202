//! ProteinMap Server Library
//!
//! HTTP catalog service for organisms, proteins, amino-acid sequences,
//! protein domains and Pfam domain families.
//!
//! # Overview
//!
//! - **API Endpoints**: create, retrieve, list and delete proteins; look up
//!   Pfam families; compute domain coverage for a protein
//! - **Database Management**: PostgreSQL integration with SQLx, embedded migrations
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS, compression and request tracing
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** layout:
//!
//! - **Commands** (Write Operations): `CreateProteinCommand`, `DeleteProteinCommand`.
//!   Creating a protein validates the nested payload first and then writes the
//!   protein, its sequence and its domains inside one transaction.
//! - **Queries** (Read Operations): protein and Pfam lookups, per-organism
//!   listings and the coverage aggregate.
//!
//! Each operation is a plain struct implementing `mediator::Request` with a
//! standalone async `handle` function; see [`cqrs::build_mediator`].
//!
//! # Example
//!
//! ```no_run
//! use proteinmap_server::{api, config::Config, db};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let state = api::AppState {
//!         db: pool,
//!         alphabet: Arc::new(config.catalog.amino_acids.clone()),
//!     };
//!     let app = api::create_router(state, &config.cors);
//!     let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod features;
pub mod middleware;
