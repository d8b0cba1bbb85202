use serde::{Deserialize, Serialize};

/// Stored Pfam row
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PfamRow {
    pub pfam_id: String,
    pub description: String,
}

/// Wire shape of a Pfam family
///
/// The stored columns are renamed to `domain_id` and `domain_description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PfamRepresentation {
    pub domain_id: String,
    pub domain_description: String,
}

impl From<PfamRow> for PfamRepresentation {
    fn from(row: PfamRow) -> Self {
        Self {
            domain_id: row.pfam_id,
            domain_description: row.description,
        }
    }
}
