use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::proteins::types::{load_protein, ProteinRepresentation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProteinQuery {
    pub protein_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetProteinError {
    #[error("Protein '{0}' not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ProteinRepresentation, GetProteinError>> for GetProteinQuery {}

impl crate::cqrs::middleware::Query for GetProteinQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: GetProteinQuery,
) -> Result<ProteinRepresentation, GetProteinError> {
    let mut conn = pool.acquire().await?;

    load_protein(&mut conn, &query.protein_id)
        .await?
        .ok_or(GetProteinError::NotFound(query.protein_id))
}
