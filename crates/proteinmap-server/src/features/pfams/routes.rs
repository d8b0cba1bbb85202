//! Pfam API routes
//!
//! - `GET /api/pfam/:pfam_id` - Get a Pfam family
//! - `GET /api/pfams/:taxa_id` - List domain families across an organism's proteins
//!
//! Each path is also served with a trailing slash.

use crate::api::response::{internal_error, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use super::queries::{GetPfamError, GetPfamQuery, ListOrganismPfamsError, ListOrganismPfamsQuery};

pub fn pfams_routes() -> Router<PgPool> {
    Router::new()
        .route("/pfam/:pfam_id", get(get_pfam))
        .route("/pfam/:pfam_id/", get(get_pfam))
        .route("/pfams/:taxa_id", get(list_organism_pfams))
        .route("/pfams/:taxa_id/", get(list_organism_pfams))
}

/// `GET /api/pfam/:pfam_id`
///
/// - `200 OK` - `{domain_id, domain_description}`
/// - `404 Not Found` - unknown id
#[tracing::instrument(skip(pool))]
async fn get_pfam(
    State(pool): State<PgPool>,
    Path(pfam_id): Path<String>,
) -> Result<Response, PfamApiError> {
    let pfam = super::queries::get::handle(pool, GetPfamQuery { pfam_id }).await?;
    Ok((StatusCode::OK, Json(pfam)).into_response())
}

/// `GET /api/pfams/:taxa_id`
///
/// Always `200 OK`; an unknown or non-numeric organism yields `[]`.
#[tracing::instrument(skip(pool))]
async fn list_organism_pfams(
    State(pool): State<PgPool>,
    Path(taxa_id): Path<String>,
) -> Result<Response, PfamApiError> {
    let items =
        super::queries::list_by_organism::handle(pool, ListOrganismPfamsQuery { taxa_id }).await?;

    tracing::debug!(count = items.len(), "Organism Pfams listed via API");

    Ok((StatusCode::OK, Json(items)).into_response())
}

#[derive(Debug)]
enum PfamApiError {
    Get(GetPfamError),
    List(ListOrganismPfamsError),
}

impl From<GetPfamError> for PfamApiError {
    fn from(err: GetPfamError) -> Self {
        Self::Get(err)
    }
}

impl From<ListOrganismPfamsError> for PfamApiError {
    fn from(err: ListOrganismPfamsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for PfamApiError {
    fn into_response(self) -> Response {
        match self {
            PfamApiError::Get(GetPfamError::NotFound(id)) => {
                ErrorResponse::new("NOT_FOUND", format!("Pfam '{}' not found", id))
                    .into_response_with(StatusCode::NOT_FOUND)
            },
            PfamApiError::Get(GetPfamError::Database(e)) => {
                tracing::error!("Database error during Pfam lookup: {}", e);
                internal_error()
            },
            PfamApiError::List(ListOrganismPfamsError::Database(e)) => {
                tracing::error!("Database error while listing organism Pfams: {}", e);
                internal_error()
            },
        }
    }
}
