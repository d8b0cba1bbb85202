//! Domain-to-Pfam entries across every protein of one organism

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::pfams::types::{PfamRepresentation, PfamRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrganismPfamsQuery {
    /// Raw path segment; anything that is not an integer matches nothing
    pub taxa_id: String,
}

/// One domain of the organism with the family it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganismPfamItem {
    pub id: i64,
    pub pfam_id: PfamRepresentation,
}

#[derive(Debug, thiserror::Error)]
pub enum ListOrganismPfamsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<OrganismPfamItem>, ListOrganismPfamsError>> for ListOrganismPfamsQuery {}

impl crate::cqrs::middleware::Query for ListOrganismPfamsQuery {}

#[derive(sqlx::FromRow)]
struct DomainPfamRecord {
    id: i64,
    pfam_id: String,
    description: String,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    query: ListOrganismPfamsQuery,
) -> Result<Vec<OrganismPfamItem>, ListOrganismPfamsError> {
    let Ok(taxa_id) = query.taxa_id.trim().parse::<i32>() else {
        tracing::debug!("Non-numeric taxa id, returning empty list");
        return Ok(Vec::new());
    };

    let records: Vec<DomainPfamRecord> = sqlx::query_as(
        r#"
        SELECT d.id, f.pfam_id, f.description
        FROM domains d
        JOIN proteins p ON p.protein_id = d.protein_id
        JOIN pfams f ON f.pfam_id = d.pfam_id
        WHERE p.taxa_id = $1
        ORDER BY d.id
        "#,
    )
    .bind(taxa_id)
    .fetch_all(&pool)
    .await?;

    Ok(records
        .into_iter()
        .map(|r| OrganismPfamItem {
            id: r.id,
            pfam_id: PfamRow {
                pfam_id: r.pfam_id,
                description: r.description,
            }
            .into(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{TestOrganism, TestPfam, TestProtein};

    #[tokio::test]
    async fn test_non_numeric_taxa_id_is_empty() {
        let mut config = crate::config::Config::default().database;
        config.min_connections = 0;
        let pool = crate::db::create_lazy_pool(&config).unwrap();

        let items = handle(pool, ListOrganismPfamsQuery { taxa_id: "human".to_string() })
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_lists_domains_of_organism_only(pool: PgPool) -> sqlx::Result<()> {
        let human = TestOrganism::new(9606).insert(&pool).await?;
        let mouse = TestOrganism::new(10090).with_name("Mus", "musculus").insert(&pool).await?;
        let kinase = TestPfam::new("PF00069").insert(&pool).await?;
        let sh2 = TestPfam::new("PF00017").insert(&pool).await?;

        TestProtein::new("P1", &human)
            .with_length(100)
            .with_domain(&kinase, 1, 50)
            .with_domain(&sh2, 60, 90)
            .insert(&pool)
            .await?;
        TestProtein::new("M1", &mouse)
            .with_length(100)
            .with_domain(&kinase, 1, 50)
            .insert(&pool)
            .await?;

        let items = handle(pool, ListOrganismPfamsQuery { taxa_id: "9606".to_string() })
            .await
            .unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.pfam_id.domain_id.as_str()).collect();
        assert_eq!(ids, vec!["PF00069", "PF00017"]);
        assert!(items[0].id < items[1].id);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_unknown_organism_is_empty(pool: PgPool) -> sqlx::Result<()> {
        let items = handle(pool, ListOrganismPfamsQuery { taxa_id: "1".to_string() })
            .await
            .unwrap();
        assert!(items.is_empty());
        Ok(())
    }
}
