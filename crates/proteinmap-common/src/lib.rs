//! ProteinMap Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the ProteinMap workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`ProteinMapError`] and the crate [`Result`] alias
//! - **Logging**: tracing subscriber setup driven by [`logging::LogConfig`]
//! - **Types**: catalog-wide configuration types such as
//!   [`types::AminoAcidAlphabet`]
//!
//! # Example
//!
//! ```no_run
//! use proteinmap_common::types::AminoAcidAlphabet;
//!
//! let alphabet = AminoAcidAlphabet::canonical();
//! assert!(alphabet.contains_only("MKTAYIAKQR"));
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{ProteinMapError, Result};
pub use types::AminoAcidAlphabet;
