//! ProteinMap Ingest - Bulk catalog loader

use anyhow::{Context, Result};
use clap::Parser;
use proteinmap_common::logging::{init_logging, LogConfig, LogLevel};
use proteinmap_common::AminoAcidAlphabet;
use proteinmap_ingest::{load, parse};
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "proteinmap-ingest")]
#[command(author, version, about = "Replace the ProteinMap catalog with CSV data")]
struct Cli {
    /// Directory holding the three catalog CSV files
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Residues accepted in sequences
    #[arg(long, env = "PROTEINMAP_AMINO_ACIDS")]
    amino_acids: Option<String>,

    /// Load proteins without reading the sequence file
    #[arg(long)]
    skip_sequences: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("proteinmap-ingest")
        .build()
        .merge_env()?;

    let _log_guard = init_logging(&log_config)?;

    let alphabet = match cli.amino_acids.as_deref() {
        Some(letters) => AminoAcidAlphabet::parse(letters)?,
        None => AminoAcidAlphabet::canonical(),
    };

    info!(data_dir = %cli.data_dir.display(), "Reading catalog");
    let catalog = parse::read_catalog(&cli.data_dir, &alphabet, cli.skip_sequences)?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&cli.database_url)
        .await
        .context("Failed to connect to database")?;

    load::run_migrations(&pool).await?;
    let summary = load::replace_catalog(&pool, &catalog).await?;

    info!(%summary, "Ingestion complete");
    Ok(())
}
