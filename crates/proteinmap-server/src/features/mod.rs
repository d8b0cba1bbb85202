//! Feature modules implementing the ProteinMap API
//!
//! Each feature is a vertical slice following the CQRS pattern:
//! - `commands/` - Write operations
//! - `queries/` - Read operations
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Stored rows and wire representations
//!
//! # Features
//!
//! - **proteins**: nested protein create, lookup, delete, per-organism
//!   listing and domain coverage
//! - **pfams**: Pfam family lookup and per-organism domain families

pub mod pfams;
pub mod proteins;
pub mod shared;

use axum::Router;
use proteinmap_common::AminoAcidAlphabet;
use std::sync::Arc;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool for database operations
    pub db: sqlx::PgPool,
    /// Residue alphabet submitted sequences are checked against
    pub alphabet: Arc<AminoAcidAlphabet>,
}

/// Creates the API router with all feature routes, to be nested under `/api`
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .merge(proteins::proteins_routes().with_state(state.clone()))
        .merge(pfams::pfams_routes().with_state(state.db))
}
