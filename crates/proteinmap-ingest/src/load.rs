//! Transactional catalog replacement
//!
//! The existing catalog is cleared and the parsed one written inside one
//! transaction. Any failure rolls the whole load back, leaving the previous
//! catalog in place.

use proteinmap_common::{ProteinMapError, Result};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::fmt;

use crate::parse::{Catalog, DomainRecord, OrganismRecord, PfamRecord, ProteinRecord, SequenceRecord};

/// Rows per multi-row INSERT; keeps binds well under the Postgres limit
const CHUNK_SIZE: usize = 1000;

/// Rows written per table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub pfams: usize,
    pub organisms: usize,
    pub proteins: usize,
    pub sequences: usize,
    pub domains: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pfams, {} organisms, {} proteins, {} sequences, {} domains",
            self.pfams, self.organisms, self.proteins, self.sequences, self.domains
        )
    }
}

fn db_error(context: &str) -> impl Fn(sqlx::Error) -> ProteinMapError + '_ {
    move |e| ProteinMapError::Database(format!("{}: {}", context, e))
}

/// Apply pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| ProteinMapError::Database(format!("Failed to run migrations: {}", e)))
}

/// Replace the whole catalog with `catalog`
#[tracing::instrument(skip(pool, catalog))]
pub async fn replace_catalog(pool: &PgPool, catalog: &Catalog) -> Result<LoadSummary> {
    let mut tx = pool.begin().await.map_err(db_error("Failed to begin transaction"))?;

    clear_catalog(&mut tx).await?;

    let summary = LoadSummary {
        pfams: insert_pfams(&mut tx, &catalog.pfams).await?,
        organisms: insert_organisms(&mut tx, &catalog.organisms).await?,
        proteins: insert_proteins(&mut tx, &catalog.proteins).await?,
        sequences: insert_sequences(&mut tx, &catalog.sequences).await?,
        domains: insert_domains(&mut tx, &catalog.domains).await?,
    };

    tx.commit().await.map_err(db_error("Failed to commit catalog"))?;

    tracing::info!(%summary, "Catalog replaced");
    Ok(summary)
}

/// Delete children before parents so foreign keys never block
async fn clear_catalog(tx: &mut Transaction<'_, Postgres>) -> Result<()> {
    for table in ["domains", "sequences", "proteins", "organisms", "pfams"] {
        let result = sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to clear catalog"))?;
        tracing::debug!(table, rows = result.rows_affected(), "Cleared table");
    }
    Ok(())
}

async fn insert_pfams(tx: &mut Transaction<'_, Postgres>, records: &[PfamRecord]) -> Result<usize> {
    for chunk in records.chunks(CHUNK_SIZE) {
        let mut query_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO pfams (pfam_id, description) ");

        query_builder.push_values(chunk, |mut b, record| {
            b.push_bind(&record.pfam_id).push_bind(&record.description);
        });

        query_builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert pfams"))?;
    }

    tracing::debug!("Inserted {} pfams", records.len());
    Ok(records.len())
}

async fn insert_organisms(
    tx: &mut Transaction<'_, Postgres>,
    records: &[OrganismRecord],
) -> Result<usize> {
    for chunk in records.chunks(CHUNK_SIZE) {
        let mut query_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO organisms (taxa_id, clade, genus, species) ");

        query_builder.push_values(chunk, |mut b, record| {
            b.push_bind(record.taxa_id)
                .push_bind(&record.clade)
                .push_bind(&record.genus)
                .push_bind(&record.species);
        });

        query_builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert organisms"))?;
    }

    tracing::debug!("Inserted {} organisms", records.len());
    Ok(records.len())
}

async fn insert_proteins(
    tx: &mut Transaction<'_, Postgres>,
    records: &[ProteinRecord],
) -> Result<usize> {
    for chunk in records.chunks(CHUNK_SIZE) {
        let mut query_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO proteins (protein_id, length, taxa_id) ");

        query_builder.push_values(chunk, |mut b, record| {
            b.push_bind(&record.protein_id)
                .push_bind(record.length)
                .push_bind(record.taxa_id);
        });

        query_builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert proteins"))?;
    }

    tracing::debug!("Inserted {} proteins", records.len());
    Ok(records.len())
}

async fn insert_sequences(
    tx: &mut Transaction<'_, Postgres>,
    records: &[SequenceRecord],
) -> Result<usize> {
    for chunk in records.chunks(CHUNK_SIZE) {
        let mut query_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO sequences (protein_id, sequence) ");

        query_builder.push_values(chunk, |mut b, record| {
            b.push_bind(&record.protein_id).push_bind(&record.sequence);
        });

        query_builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert sequences"))?;
    }

    tracing::debug!("Inserted {} sequences", records.len());
    Ok(records.len())
}

async fn insert_domains(
    tx: &mut Transaction<'_, Postgres>,
    records: &[DomainRecord],
) -> Result<usize> {
    for chunk in records.chunks(CHUNK_SIZE) {
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO domains (protein_id, pfam_id, description, start, stop) ",
        );

        query_builder.push_values(chunk, |mut b, record| {
            b.push_bind(&record.protein_id)
                .push_bind(&record.pfam_id)
                .push_bind(&record.description)
                .push_bind(record.start)
                .push_bind(record.stop);
        });

        query_builder
            .build()
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to insert domains"))?;
    }

    tracing::debug!("Inserted {} domains", records.len());
    Ok(records.len())
}
