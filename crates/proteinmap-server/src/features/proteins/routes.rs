//! Protein API routes
//!
//! # Route Structure
//!
//! - `POST /api/protein/` - Create a protein from its nested representation
//! - `GET /api/protein/:protein_id` - Get a protein
//! - `DELETE /api/protein/:protein_id` - Delete a protein and what it owns
//! - `GET /api/proteins/:taxa_id` - List an organism's proteins in creation order
//! - `GET /api/coverage/:protein_id` - Domain coverage ratio
//!
//! Every path is served with and without a trailing slash.

use crate::api::response::{internal_error, ErrorResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::{
    commands::{CreateProteinCommand, CreateProteinError, DeleteProteinCommand, DeleteProteinError},
    queries::{
        ComputeCoverageError, ComputeCoverageQuery, GetProteinError, GetProteinQuery,
        ListOrganismProteinsError, ListOrganismProteinsQuery,
    },
};
use crate::features::FeatureState;

// ============================================================================
// Router Configuration
// ============================================================================

pub fn proteins_routes() -> Router<FeatureState> {
    Router::new()
        .route("/protein", axum::routing::post(create_protein))
        .route("/protein/", axum::routing::post(create_protein))
        .route("/protein/:protein_id", get(get_protein).delete(delete_protein))
        .route("/protein/:protein_id/", get(get_protein).delete(delete_protein))
        .route("/proteins/:taxa_id", get(list_organism_proteins))
        .route("/proteins/:taxa_id/", get(list_organism_proteins))
        .route("/coverage/:protein_id", get(compute_coverage))
        .route("/coverage/:protein_id/", get(compute_coverage))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a protein
///
/// # Request Body
///
/// ```json
/// {
///   "protein_id": "A0A016S8J7",
///   "sequence": "MVIGVGFLLVLFSSSVLGILNAGVQLRIEELFDTPGHTNNWAVLVCTSRFWFNYRHVSNVLALYHTVKRLGIPDSNIILMLAEDVPCNPRNPRPEAAVLSA",
///   "taxonomy": {"taxa_id": 53326},
///   "length": 101,
///   "domains": [
///     {"pfam_id": {"domain_id": "PF01650"}, "description": "Peptidase C13 legumain", "start": 40, "stop": 94}
///   ]
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - the stored protein representation
/// - `400 Bad Request` - field errors, including values of the wrong JSON type
///   and unknown organism or Pfam references; a body that is not JSON gets no
///   field map
/// - `409 Conflict` - protein id already taken
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state, payload))]
async fn create_protein(
    State(state): State<FeatureState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ProteinApiError> {
    let Json(body) = payload?;
    let command = CreateProteinCommand::from_json(&body).map_err(CreateProteinError::Validation)?;

    let protein = super::commands::create::handle(state.db, state.alphabet, command).await?;

    tracing::info!(
        protein_id = %protein.protein_id,
        domains = protein.domains.len(),
        "Protein created via API"
    );

    Ok((StatusCode::CREATED, Json(protein)).into_response())
}

/// Delete a protein
///
/// - `204 No Content` - deleted along with its sequence and domains
/// - `404 Not Found` - unknown id
#[tracing::instrument(skip(state))]
async fn delete_protein(
    State(state): State<FeatureState>,
    Path(protein_id): Path<String>,
) -> Result<Response, ProteinApiError> {
    super::commands::delete::handle(state.db, DeleteProteinCommand { protein_id }).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// Get a protein
///
/// - `200 OK` - protein representation
/// - `404 Not Found` - unknown id
#[tracing::instrument(skip(state))]
async fn get_protein(
    State(state): State<FeatureState>,
    Path(protein_id): Path<String>,
) -> Result<Response, ProteinApiError> {
    let protein = super::queries::get::handle(state.db, GetProteinQuery { protein_id }).await?;
    Ok((StatusCode::OK, Json(protein)).into_response())
}

/// List an organism's proteins
///
/// Always `200 OK`; an unknown or non-numeric organism yields `[]`.
#[tracing::instrument(skip(state))]
async fn list_organism_proteins(
    State(state): State<FeatureState>,
    Path(taxa_id): Path<String>,
) -> Result<Response, ProteinApiError> {
    let items =
        super::queries::list_by_organism::handle(state.db, ListOrganismProteinsQuery { taxa_id })
            .await?;

    tracing::debug!(count = items.len(), "Organism proteins listed via API");

    Ok((StatusCode::OK, Json(items)).into_response())
}

/// Domain coverage of a protein
///
/// - `200 OK` - a bare floating-point number
/// - `404 Not Found` - unknown protein or no domains
/// - `422 Unprocessable Entity` - stored length is 0
#[tracing::instrument(skip(state))]
async fn compute_coverage(
    State(state): State<FeatureState>,
    Path(protein_id): Path<String>,
) -> Result<Response, ProteinApiError> {
    let coverage =
        super::queries::coverage::handle(state.db, ComputeCoverageQuery { protein_id }).await?;
    Ok((StatusCode::OK, Json(coverage)).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for protein API endpoints
#[derive(Debug)]
enum ProteinApiError {
    Body(JsonRejection),
    Create(CreateProteinError),
    Delete(DeleteProteinError),
    Get(GetProteinError),
    List(ListOrganismProteinsError),
    Coverage(ComputeCoverageError),
}

impl From<JsonRejection> for ProteinApiError {
    fn from(err: JsonRejection) -> Self {
        Self::Body(err)
    }
}

impl From<CreateProteinError> for ProteinApiError {
    fn from(err: CreateProteinError) -> Self {
        Self::Create(err)
    }
}

impl From<DeleteProteinError> for ProteinApiError {
    fn from(err: DeleteProteinError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetProteinError> for ProteinApiError {
    fn from(err: GetProteinError) -> Self {
        Self::Get(err)
    }
}

impl From<ListOrganismProteinsError> for ProteinApiError {
    fn from(err: ListOrganismProteinsError) -> Self {
        Self::List(err)
    }
}

impl From<ComputeCoverageError> for ProteinApiError {
    fn from(err: ComputeCoverageError) -> Self {
        Self::Coverage(err)
    }
}

fn not_found(message: String) -> Response {
    ErrorResponse::new("NOT_FOUND", message).into_response_with(StatusCode::NOT_FOUND)
}

impl IntoResponse for ProteinApiError {
    fn into_response(self) -> Response {
        match self {
            ProteinApiError::Body(rejection) => {
                ErrorResponse::new("VALIDATION_ERROR", rejection.body_text())
                    .into_response_with(StatusCode::BAD_REQUEST)
            },

            // Create errors
            ProteinApiError::Create(CreateProteinError::Duplicate(id)) => ErrorResponse::new(
                "CONFLICT",
                format!("Protein with id '{}' already exists", id),
            )
            .into_response_with(StatusCode::CONFLICT),
            ProteinApiError::Create(CreateProteinError::Database(e)) => {
                tracing::error!("Database error during protein creation: {}", e);
                internal_error()
            },
            ProteinApiError::Create(err) => {
                let details = err.field_errors().unwrap_or_default().to_json();
                ErrorResponse::with_details("VALIDATION_ERROR", "Invalid protein", details)
                    .into_response_with(StatusCode::BAD_REQUEST)
            },

            // Delete errors
            ProteinApiError::Delete(DeleteProteinError::NotFound(id)) => {
                not_found(format!("Protein '{}' not found", id))
            },
            ProteinApiError::Delete(DeleteProteinError::Database(e)) => {
                tracing::error!("Database error during protein deletion: {}", e);
                internal_error()
            },

            // Query errors
            ProteinApiError::Get(GetProteinError::NotFound(id)) => {
                not_found(format!("Protein '{}' not found", id))
            },
            ProteinApiError::Get(GetProteinError::Database(e)) => {
                tracing::error!("Database error during protein lookup: {}", e);
                internal_error()
            },
            ProteinApiError::List(ListOrganismProteinsError::Database(e)) => {
                tracing::error!("Database error while listing organism proteins: {}", e);
                internal_error()
            },
            ProteinApiError::Coverage(ComputeCoverageError::NotFound(id)) => {
                not_found(format!("No domains found for protein '{}'", id))
            },
            ProteinApiError::Coverage(err @ ComputeCoverageError::ZeroLength(_)) => {
                ErrorResponse::new("UNPROCESSABLE", err.to_string())
                    .into_response_with(StatusCode::UNPROCESSABLE_ENTITY)
            },
            ProteinApiError::Coverage(ComputeCoverageError::Database(e)) => {
                tracing::error!("Database error during coverage computation: {}", e);
                internal_error()
            },
        }
    }
}
