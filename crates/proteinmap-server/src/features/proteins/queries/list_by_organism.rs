use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Proteins of one organism in creation order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrganismProteinsQuery {
    /// Raw path segment; anything that is not an integer matches nothing
    pub taxa_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProteinListItem {
    pub protein_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ListOrganismProteinsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<ProteinListItem>, ListOrganismProteinsError>>
    for ListOrganismProteinsQuery
{
}

impl crate::cqrs::middleware::Query for ListOrganismProteinsQuery {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListOrganismProteinsQuery,
) -> Result<Vec<ProteinListItem>, ListOrganismProteinsError> {
    let Ok(taxa_id) = query.taxa_id.trim().parse::<i32>() else {
        tracing::debug!("Non-numeric taxa id, returning empty list");
        return Ok(Vec::new());
    };

    let items = sqlx::query_as(
        r#"
        SELECT protein_id
        FROM proteins
        WHERE taxa_id = $1
        ORDER BY created_at, protein_id
        "#,
    )
    .bind(taxa_id)
    .fetch_all(&pool)
    .await?;

    Ok(items)
}
