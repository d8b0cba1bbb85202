//! ProteinMap Ingest Library
//!
//! Bulk loader that replaces the catalog with the contents of three
//! header-less CSV files.
//!
//! # Data Files
//!
//! - `pfam_descriptions.csv`: `pfam_id,description`
//! - `assignment_data_set.csv`: `protein_id,taxa_id,clade,scientific_name,
//!   domain_description,pfam_id,start,stop,length`
//! - `assignment_data_sequences.csv`: `protein_id,sequence`
//!
//! Parsing ([`parse`]) is pure and happens before any database work, so a
//! broken file never touches the catalog. Loading ([`load`]) runs in a single
//! transaction.
//!
//! # Example
//!
//! ```no_run
//! use proteinmap_common::AminoAcidAlphabet;
//! use proteinmap_ingest::{load, parse};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let alphabet = AminoAcidAlphabet::canonical();
//!     let catalog = parse::read_catalog(std::path::Path::new("./data"), &alphabet, false)?;
//!     let pool = sqlx::PgPool::connect("postgresql://localhost/proteinmap").await?;
//!     load::run_migrations(&pool).await?;
//!     let summary = load::replace_catalog(&pool, &catalog).await?;
//!     tracing::info!(%summary, "Catalog loaded");
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod load;
pub mod parse;

/// Pfam descriptions file name inside the data directory
pub const PFAM_FILE: &str = "pfam_descriptions.csv";

/// Domain assignment file name inside the data directory
pub const ASSIGNMENT_FILE: &str = "assignment_data_set.csv";

/// Sequence file name inside the data directory
pub const SEQUENCE_FILE: &str = "assignment_data_sequences.csv";
