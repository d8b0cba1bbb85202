//! Domain coverage of a protein
//!
//! `coverage = (Σ stop − Σ start) / length` over every stored domain of the
//! protein. Overlapping domains are not merged and the ratio is not clamped,
//! so values above 1 are expected. Stored rows are trusted as-is.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeCoverageQuery {
    pub protein_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ComputeCoverageError {
    /// Unknown protein, or a protein without domains
    #[error("No domains found for protein '{0}'")]
    NotFound(String),
    #[error("Protein '{0}' has length 0; coverage is undefined")]
    ZeroLength(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<f64, ComputeCoverageError>> for ComputeCoverageQuery {}

impl crate::cqrs::middleware::Query for ComputeCoverageQuery {}

/// Integer sums are taken first; only the final division is floating point.
pub fn compute_coverage(sum_stop: i64, sum_start: i64, length: i32) -> f64 {
    (sum_stop - sum_start) as f64 / f64::from(length)
}

#[derive(sqlx::FromRow)]
struct DomainSpanRecord {
    length: i32,
    domain_count: i64,
    sum_stop: i64,
    sum_start: i64,
}

#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, query: ComputeCoverageQuery) -> Result<f64, ComputeCoverageError> {
    let record: Option<DomainSpanRecord> = sqlx::query_as(
        r#"
        SELECT p.length,
               COUNT(d.id) AS domain_count,
               COALESCE(SUM(d.stop), 0)::BIGINT AS sum_stop,
               COALESCE(SUM(d.start), 0)::BIGINT AS sum_start
        FROM proteins p
        LEFT JOIN domains d ON d.protein_id = p.protein_id
        WHERE p.protein_id = $1
        GROUP BY p.protein_id, p.length
        "#,
    )
    .bind(&query.protein_id)
    .fetch_optional(&pool)
    .await?;

    let record = match record {
        Some(r) if r.domain_count > 0 => r,
        _ => return Err(ComputeCoverageError::NotFound(query.protein_id)),
    };

    if record.length == 0 {
        return Err(ComputeCoverageError::ZeroLength(query.protein_id));
    }

    let coverage = compute_coverage(record.sum_stop, record.sum_start, record.length);

    tracing::debug!(domains = record.domain_count, coverage, "Coverage computed");

    Ok(coverage)
}
