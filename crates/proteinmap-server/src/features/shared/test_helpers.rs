//! Test fixtures for database tests
//!
//! ```rust,ignore
//! #[sqlx::test(migrations = "../../migrations")]
//! async fn test_something(pool: PgPool) -> sqlx::Result<()> {
//!     let organism = TestOrganism::new(9606).insert(&pool).await?;
//!     let pfam = TestPfam::new("PF00001").insert(&pool).await?;
//!     TestProtein::new("P00001", &organism)
//!         .with_sequence("MKT")
//!         .with_domain(&pfam, 1, 3)
//!         .insert(&pool)
//!         .await?;
//!     Ok(())
//! }
//! ```

use sqlx::PgPool;

/// Builder for test organisms
#[derive(Debug, Clone)]
pub struct TestOrganism {
    pub taxa_id: i32,
    pub clade: String,
    pub genus: String,
    pub species: String,
}

impl TestOrganism {
    pub fn new(taxa_id: i32) -> Self {
        Self {
            taxa_id,
            clade: "E".to_string(),
            genus: "Homo".to_string(),
            species: "sapiens".to_string(),
        }
    }

    pub fn with_name(mut self, genus: &str, species: &str) -> Self {
        self.genus = genus.to_string();
        self.species = species.to_string();
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query("INSERT INTO organisms (taxa_id, clade, genus, species) VALUES ($1, $2, $3, $4)")
            .bind(self.taxa_id)
            .bind(&self.clade)
            .bind(&self.genus)
            .bind(&self.species)
            .execute(pool)
            .await?;
        Ok(self)
    }
}

/// Builder for test Pfam families
#[derive(Debug, Clone)]
pub struct TestPfam {
    pub pfam_id: String,
    pub description: String,
}

impl TestPfam {
    pub fn new(pfam_id: &str) -> Self {
        Self {
            pfam_id: pfam_id.to_string(),
            description: format!("{} family", pfam_id),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query("INSERT INTO pfams (pfam_id, description) VALUES ($1, $2)")
            .bind(&self.pfam_id)
            .bind(&self.description)
            .execute(pool)
            .await?;
        Ok(self)
    }
}

/// Builder for test proteins with optional sequence and domains
#[derive(Debug, Clone)]
pub struct TestProtein {
    pub protein_id: String,
    pub taxa_id: i32,
    pub length: i32,
    pub sequence: Option<String>,
    /// (pfam_id, description, start, stop)
    pub domains: Vec<(String, String, i32, i32)>,
}

impl TestProtein {
    pub fn new(protein_id: &str, organism: &TestOrganism) -> Self {
        Self {
            protein_id: protein_id.to_string(),
            taxa_id: organism.taxa_id,
            length: 0,
            sequence: None,
            domains: Vec::new(),
        }
    }

    pub fn with_length(mut self, length: i32) -> Self {
        self.length = length;
        self
    }

    /// Set the sequence and make `length` match it
    pub fn with_sequence(mut self, sequence: &str) -> Self {
        self.length = sequence.chars().count() as i32;
        self.sequence = Some(sequence.to_string());
        self
    }

    pub fn with_domain(mut self, pfam: &TestPfam, start: i32, stop: i32) -> Self {
        self.domains.push((
            pfam.pfam_id.clone(),
            format!("{} domain", pfam.pfam_id),
            start,
            stop,
        ));
        self
    }

    pub async fn insert(self, pool: &PgPool) -> sqlx::Result<Self> {
        sqlx::query("INSERT INTO proteins (protein_id, length, taxa_id) VALUES ($1, $2, $3)")
            .bind(&self.protein_id)
            .bind(self.length)
            .bind(self.taxa_id)
            .execute(pool)
            .await?;

        if let Some(sequence) = &self.sequence {
            sqlx::query("INSERT INTO sequences (protein_id, sequence) VALUES ($1, $2)")
                .bind(&self.protein_id)
                .bind(sequence)
                .execute(pool)
                .await?;
        }

        for (pfam_id, description, start, stop) in &self.domains {
            sqlx::query(
                "INSERT INTO domains (protein_id, pfam_id, description, start, stop) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&self.protein_id)
            .bind(pfam_id)
            .bind(description)
            .bind(start)
            .bind(stop)
            .execute(pool)
            .await?;
        }

        Ok(self)
    }
}

/// Row count of a catalog table
pub async fn count_rows(pool: &PgPool, table: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
}
