//! Error types for ProteinMap

use thiserror::Error;

/// Result type alias for ProteinMap operations
pub type Result<T> = std::result::Result<T, ProteinMapError>;

/// Main error type shared by the ProteinMap crates
#[derive(Error, Debug)]
pub enum ProteinMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid amino-acid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl ProteinMapError {
    /// Create a parse error pointing at a line of an input file
    pub fn parse_at(source: &str, line: u64, message: impl std::fmt::Display) -> Self {
        Self::Parse(format!("{}:{}: {}", source, line, message))
    }
}
