use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Delete a protein together with its sequence and domains
///
/// The organism and the Pfam families it referenced are left in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteProteinCommand {
    pub protein_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteProteinResponse {
    pub protein_id: String,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteProteinError {
    #[error("Protein '{0}' not found")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteProteinResponse, DeleteProteinError>> for DeleteProteinCommand {}

impl crate::cqrs::middleware::Command for DeleteProteinCommand {}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    command: DeleteProteinCommand,
) -> Result<DeleteProteinResponse, DeleteProteinError> {
    // sequences and domains go with it via ON DELETE CASCADE
    let deleted: Option<String> =
        sqlx::query_scalar("DELETE FROM proteins WHERE protein_id = $1 RETURNING protein_id")
            .bind(&command.protein_id)
            .fetch_optional(&pool)
            .await?;

    match deleted {
        Some(protein_id) => {
            tracing::info!(%protein_id, "Protein deleted");
            Ok(DeleteProteinResponse {
                protein_id,
                deleted: true,
            })
        },
        None => Err(DeleteProteinError::NotFound(command.protein_id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{count_rows, TestOrganism, TestPfam, TestProtein};

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_cascades_to_owned_rows_only(pool: PgPool) -> sqlx::Result<()> {
        let organism = TestOrganism::new(9606).insert(&pool).await?;
        let pfam = TestPfam::new("PF00069").insert(&pool).await?;
        TestProtein::new("P12345", &organism)
            .with_sequence("MKTAYIAK")
            .with_domain(&pfam, 1, 4)
            .with_domain(&pfam, 5, 8)
            .insert(&pool)
            .await?;

        let response = handle(
            pool.clone(),
            DeleteProteinCommand {
                protein_id: "P12345".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(response.deleted);
        assert_eq!(count_rows(&pool, "proteins").await?, 0);
        assert_eq!(count_rows(&pool, "sequences").await?, 0);
        assert_eq!(count_rows(&pool, "domains").await?, 0);
        assert_eq!(count_rows(&pool, "organisms").await?, 1);
        assert_eq!(count_rows(&pool, "pfams").await?, 1);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_unknown_protein(pool: PgPool) -> sqlx::Result<()> {
        let result = handle(
            pool,
            DeleteProteinCommand {
                protein_id: "NOPE".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(DeleteProteinError::NotFound(_))));
        Ok(())
    }
}
