use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::pfams::types::{PfamRepresentation, PfamRow};

/// Look up a single Pfam family by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPfamQuery {
    pub pfam_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPfamError {
    #[error("Pfam '{0}' not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<PfamRepresentation, GetPfamError>> for GetPfamQuery {}

impl crate::cqrs::middleware::Query for GetPfamQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: GetPfamQuery) -> Result<PfamRepresentation, GetPfamError> {
    let row: Option<PfamRow> =
        sqlx::query_as("SELECT pfam_id, description FROM pfams WHERE pfam_id = $1")
            .bind(&query.pfam_id)
            .fetch_optional(&pool)
            .await?;

    row.map(PfamRepresentation::from)
        .ok_or(GetPfamError::NotFound(query.pfam_id))
}
