//! Stored rows and the nested wire representation of a protein
//!
//! A stored protein is spread over `proteins`, `organisms`, `sequences`,
//! `domains` and `pfams`. [`ProteinRepresentation::from_rows`] folds those
//! rows into the nested JSON shape served by the API and accepted back by
//! the create command.

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::features::pfams::types::{PfamRepresentation, PfamRow};

/// A protein joined with its organism and optional sequence
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProteinRow {
    pub protein_id: String,
    pub length: i32,
    pub taxa_id: i32,
    pub clade: String,
    pub genus: String,
    pub species: String,
    pub sequence: Option<String>,
}

/// A domain joined with its Pfam family
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DomainRow {
    pub id: i64,
    pub pfam_id: String,
    pub pfam_description: String,
    pub description: String,
    pub start: i32,
    pub stop: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyRepresentation {
    pub taxa_id: i32,
    pub clade: String,
    pub genus: String,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRepresentation {
    pub pfam_id: PfamRepresentation,
    pub description: String,
    pub start: i32,
    pub stop: i32,
}

/// Nested protein as served by `GET /api/protein/:id`
///
/// `sequence` is `null` when the protein has no stored sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinRepresentation {
    pub protein_id: String,
    pub sequence: Option<String>,
    pub taxonomy: TaxonomyRepresentation,
    pub length: i32,
    pub domains: Vec<DomainRepresentation>,
}

impl From<DomainRow> for DomainRepresentation {
    fn from(row: DomainRow) -> Self {
        Self {
            pfam_id: PfamRow {
                pfam_id: row.pfam_id,
                description: row.pfam_description,
            }
            .into(),
            description: row.description,
            start: row.start,
            stop: row.stop,
        }
    }
}

impl ProteinRepresentation {
    /// Domains keep the order they are given in
    pub fn from_rows(protein: ProteinRow, domains: Vec<DomainRow>) -> Self {
        Self {
            protein_id: protein.protein_id,
            sequence: protein.sequence,
            taxonomy: TaxonomyRepresentation {
                taxa_id: protein.taxa_id,
                clade: protein.clade,
                genus: protein.genus,
                species: protein.species,
            },
            length: protein.length,
            domains: domains.into_iter().map(DomainRepresentation::from).collect(),
        }
    }
}

/// Read one protein with everything it owns or references
///
/// Domains come back in insertion order.
pub async fn load_protein(
    conn: &mut PgConnection,
    protein_id: &str,
) -> sqlx::Result<Option<ProteinRepresentation>> {
    let protein: Option<ProteinRow> = sqlx::query_as(
        r#"
        SELECT p.protein_id, p.length, o.taxa_id, o.clade, o.genus, o.species, s.sequence
        FROM proteins p
        JOIN organisms o ON o.taxa_id = p.taxa_id
        LEFT JOIN sequences s ON s.protein_id = p.protein_id
        WHERE p.protein_id = $1
        "#,
    )
    .bind(protein_id)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(protein) = protein else {
        return Ok(None);
    };

    let domains: Vec<DomainRow> = sqlx::query_as(
        r#"
        SELECT d.id, f.pfam_id, f.description AS pfam_description,
               d.description, d.start, d.stop
        FROM domains d
        JOIN pfams f ON f.pfam_id = d.pfam_id
        WHERE d.protein_id = $1
        ORDER BY d.id
        "#,
    )
    .bind(protein_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(ProteinRepresentation::from_rows(protein, domains)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn protein_row(sequence: Option<&str>) -> ProteinRow {
        ProteinRow {
            protein_id: "A0A014PQC0".to_string(),
            length: 3,
            taxa_id: 1116,
            clade: "E".to_string(),
            genus: "Metarhizium".to_string(),
            species: "robertsii".to_string(),
            sequence: sequence.map(str::to_string),
        }
    }

    fn domain_row(id: i64, pfam: &str, start: i32, stop: i32) -> DomainRow {
        DomainRow {
            id,
            pfam_id: pfam.to_string(),
            pfam_description: format!("{} family", pfam),
            description: format!("{} domain", pfam),
            start,
            stop,
        }
    }

    #[test]
    fn test_from_rows_nests_organism_and_pfams() {
        let repr = ProteinRepresentation::from_rows(
            protein_row(Some("MKT")),
            vec![domain_row(1, "PF00001", 1, 2), domain_row(2, "PF00002", 2, 3)],
        );

        assert_eq!(
            serde_json::to_value(&repr).unwrap(),
            json!({
                "protein_id": "A0A014PQC0",
                "sequence": "MKT",
                "taxonomy": {
                    "taxa_id": 1116,
                    "clade": "E",
                    "genus": "Metarhizium",
                    "species": "robertsii"
                },
                "length": 3,
                "domains": [
                    {
                        "pfam_id": {"domain_id": "PF00001", "domain_description": "PF00001 family"},
                        "description": "PF00001 domain",
                        "start": 1,
                        "stop": 2
                    },
                    {
                        "pfam_id": {"domain_id": "PF00002", "domain_description": "PF00002 family"},
                        "description": "PF00002 domain",
                        "start": 2,
                        "stop": 3
                    }
                ]
            })
        );
    }

    #[test]
    fn test_missing_sequence_serializes_as_null() {
        let repr = ProteinRepresentation::from_rows(protein_row(None), Vec::new());
        let value = serde_json::to_value(&repr).unwrap();
        assert!(value["sequence"].is_null());
        assert_eq!(value["domains"], json!([]));
    }
}
