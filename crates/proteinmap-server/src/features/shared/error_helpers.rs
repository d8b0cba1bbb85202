//! Database error handling utilities
//!
//! Commands translate unique violations into their own error variants and let
//! everything else surface as a storage failure.
//!
//! ```rust,ignore
//! use proteinmap_server::features::shared::error_helpers::map_unique_violation;
//!
//! sqlx::query("INSERT INTO proteins ...")
//!     .execute(&mut *tx)
//!     .await
//!     .map_err(|e| map_unique_violation(e, CreateProteinError::Duplicate(id), CreateProteinError::Database))?;
//! ```

use sqlx::Error as SqlxError;

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Return `unique_error` for a unique violation, otherwise wrap the error
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}
