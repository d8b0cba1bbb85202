//! Create protein command
//!
//! Accepts the nested wire shape served by `GET /api/protein/:id` and writes
//! the protein, its optional sequence and its domains as one unit.
//!
//! # Architecture
//!
//! - [`CreateProteinCommand::validate`] checks every field without touching
//!   storage and yields a [`NewProtein`] decoupled from the wire names.
//! - [`handle`] resolves the organism and each domain's Pfam family against
//!   existing rows inside a single transaction. Any failure drops the
//!   transaction, so no partial protein survives.

use mediator::Request;
use proteinmap_common::AminoAcidAlphabet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::sync::Arc;

use crate::features::proteins::types::{load_protein, ProteinRepresentation};
use crate::features::shared::error_helpers::map_unique_violation;
use crate::features::shared::validation::{
    json_integer, json_list, json_object, json_string, validate_sequence, validate_text,
    FieldErrors, JsonTypeError, NON_FIELD_ERRORS, REQUIRED_MESSAGE,
};

/// Maximum characters in a protein id
pub const PROTEIN_ID_MAX_LENGTH: usize = 12;

/// Maximum characters in a stored sequence
pub const SEQUENCE_MAX_LENGTH: usize = 40_000;

/// Maximum characters in a domain description
pub const DOMAIN_DESCRIPTION_MAX_LENGTH: usize = 200;

/// Maximum characters in a Pfam id
pub const PFAM_ID_MAX_LENGTH: usize = 20;

/// Field error for a `length` that differs from the submitted sequence
pub const LENGTH_MISMATCH_MESSAGE: &str = "Protein length and sequence length should be the same";

/// Field error for a domain whose start lies after its stop; `start == stop` passes
pub const DOMAIN_RANGE_MESSAGE: &str = "Domain stop must be greater than start";

/// Command to create a protein from its nested representation
///
/// Every field is optional at the type level so that an absent field is
/// reported as a field error instead of a body rejection. `sequence` may be
/// absent or `null`; both mean "no sequence".
///
/// # Examples
///
/// ```rust,ignore
/// let command: CreateProteinCommand = serde_json::from_value(json!({
///     "protein_id": "A0A016S8J7",
///     "sequence": "MKT",
///     "taxonomy": {"taxa_id": 53326},
///     "length": 3,
///     "domains": [{
///         "description": "Kinase domain",
///         "start": 1,
///         "stop": 3,
///         "pfam_id": {"domain_id": "PF00069"}
///     }]
/// }))?;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProteinCommand {
    pub protein_id: Option<String>,
    pub sequence: Option<String>,
    pub taxonomy: Option<TaxonomyInput>,
    pub length: Option<i32>,
    pub domains: Option<Vec<DomainInput>>,
}

/// Organism reference; only `taxa_id` is read, the descriptive fields are
/// accepted so a served representation can be submitted back unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxonomyInput {
    pub taxa_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainInput {
    pub description: Option<String>,
    pub start: Option<i32>,
    pub stop: Option<i32>,
    pub pfam_id: Option<PfamRefInput>,
}

/// Pfam reference; `domain_description` is ignored on input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PfamRefInput {
    pub domain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_description: Option<String>,
}

/// A validated protein ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProtein {
    pub protein_id: String,
    pub sequence: Option<String>,
    pub taxa_id: i32,
    pub length: i32,
    pub domains: Vec<NewDomain>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDomain {
    pub pfam_id: String,
    pub description: String,
    pub start: i32,
    pub stop: i32,
}

/// Errors that can occur when creating a protein
#[derive(Debug, thiserror::Error)]
pub enum CreateProteinError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Organism with taxa_id {0} does not exist")]
    OrganismNotFound(i32),

    #[error("Pfam '{0}' does not exist")]
    PfamNotFound(String),

    #[error("Protein '{0}' already exists")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateProteinError {
    /// Field map for the errors a client can fix by editing the payload
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors.clone()),
            Self::OrganismNotFound(_) => Some(FieldErrors::single("taxonomy", self)),
            Self::PfamNotFound(_) => Some(FieldErrors::single("domains", self)),
            Self::Duplicate(_) => Some(FieldErrors::single("protein_id", self)),
            Self::Database(_) => None,
        }
    }
}

impl Request<Result<ProteinRepresentation, CreateProteinError>> for CreateProteinCommand {}

impl crate::cqrs::middleware::Command for CreateProteinCommand {}

/// Decode `object[key]`, recording a type mismatch under `field`
///
/// `label` prefixes the message for values nested inside `field`.
fn read<'v, T>(
    object: &'v Map<String, Value>,
    key: &str,
    field: &str,
    label: Option<&str>,
    errors: &mut FieldErrors,
    decode: impl FnOnce(&'v Value) -> Result<Option<T>, JsonTypeError>,
) -> Option<T> {
    match decode(object.get(key)?) {
        Ok(value) => value,
        Err(e) => {
            match label {
                Some(label) => errors.add(field, format!("{}: {}", label, e)),
                None => errors.add(field, e),
            }
            None
        },
    }
}

impl CreateProteinCommand {
    /// Read a command from a parsed JSON body
    ///
    /// Values of the wrong JSON type are reported under their wire field,
    /// e.g. `{"length": ["A valid integer is required."]}`. Absent fields are
    /// left as `None` for [`validate`](Self::validate) to report. Descriptive
    /// taxonomy and Pfam fields are read-only and not decoded.
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let Some(object) = body.as_object() else {
            return Err(FieldErrors::single(NON_FIELD_ERRORS, JsonTypeError::NotAnObject));
        };

        let mut errors = FieldErrors::new();

        let protein_id = read(object, "protein_id", "protein_id", None, &mut errors, json_string);
        let sequence = read(object, "sequence", "sequence", None, &mut errors, json_string);
        let length = read(object, "length", "length", None, &mut errors, json_integer);

        let taxonomy = read(object, "taxonomy", "taxonomy", None, &mut errors, json_object);
        let taxonomy = taxonomy.map(|taxonomy| TaxonomyInput {
            taxa_id: read(
                taxonomy,
                "taxa_id",
                "taxonomy",
                Some("taxa_id"),
                &mut errors,
                json_integer,
            ),
            ..Default::default()
        });

        let items = read(object, "domains", "domains", None, &mut errors, json_list);
        let domains = items.map(|items| {
            items
                .iter()
                .map(|item| match json_object(item) {
                    Ok(Some(domain)) => Self::domain_from_json(domain, &mut errors),
                    Ok(None) => DomainInput::default(),
                    Err(e) => {
                        errors.add("domains", e);
                        DomainInput::default()
                    },
                })
                .collect::<Vec<_>>()
        });

        errors.into_result(Self {
            protein_id,
            sequence,
            taxonomy,
            length,
            domains,
        })
    }

    fn domain_from_json(domain: &Map<String, Value>, errors: &mut FieldErrors) -> DomainInput {
        let description = read(
            domain,
            "description",
            "domains",
            Some("description"),
            errors,
            json_string,
        );
        let start = read(domain, "start", "domains", Some("start"), errors, json_integer);
        let stop = read(domain, "stop", "domains", Some("stop"), errors, json_integer);

        let pfam = read(domain, "pfam_id", "domains", Some("pfam_id"), errors, json_object);
        let pfam_id = pfam.map(|pfam| PfamRefInput {
            domain_id: read(
                pfam,
                "domain_id",
                "domains",
                Some("pfam_id.domain_id"),
                errors,
                json_string,
            ),
            domain_description: None,
        });

        DomainInput {
            description,
            start,
            stop,
            pfam_id,
        }
    }

    /// Check every field and normalize the payload
    ///
    /// # Rules
    ///
    /// - `protein_id`: required, non-blank, at most 12 characters
    /// - `sequence`: optional; every character in `alphabet`, at most 40,000
    ///   characters; the empty string is valid
    /// - `length`: required, non-negative, equal to the character count of
    ///   `sequence` when one was submitted
    /// - `taxonomy.taxa_id`: required
    /// - `domains`: required list; each entry needs a non-blank description,
    ///   `start <= stop` and a `pfam_id.domain_id`
    pub fn validate(&self, alphabet: &AminoAcidAlphabet) -> Result<NewProtein, FieldErrors> {
        let mut errors = FieldErrors::new();

        let protein_id = match self.protein_id.as_deref() {
            None => {
                errors.required("protein_id");
                None
            },
            Some(id) => match validate_text(id, PROTEIN_ID_MAX_LENGTH) {
                Ok(()) => Some(id.to_string()),
                Err(e) => {
                    errors.add("protein_id", e);
                    None
                },
            },
        };

        if let Some(sequence) = self.sequence.as_deref() {
            if let Err(e) = validate_sequence(sequence, alphabet, SEQUENCE_MAX_LENGTH) {
                errors.add("sequence", e);
            }
        }

        match self.length {
            None => errors.required("length"),
            Some(length) if length < 0 => {
                errors.add("length", "Ensure this value is greater than or equal to 0.")
            },
            Some(length) => {
                if let Some(sequence) = self.sequence.as_deref() {
                    if usize::try_from(length).ok() != Some(sequence.chars().count()) {
                        errors.add("length", LENGTH_MISMATCH_MESSAGE);
                    }
                }
            },
        }

        let taxa_id = match &self.taxonomy {
            None => {
                errors.required("taxonomy");
                None
            },
            Some(TaxonomyInput { taxa_id: None, .. }) => {
                errors.add("taxonomy", format!("taxa_id: {}", REQUIRED_MESSAGE));
                None
            },
            Some(TaxonomyInput {
                taxa_id: Some(taxa_id),
                ..
            }) => Some(*taxa_id),
        };

        let mut domains = Vec::new();
        match &self.domains {
            None => errors.required("domains"),
            Some(inputs) => {
                for input in inputs {
                    if let Some(domain) = validate_domain(input, &mut errors) {
                        domains.push(domain);
                    }
                }
            },
        }

        match (protein_id, self.length, taxa_id) {
            (Some(protein_id), Some(length), Some(taxa_id)) => errors.into_result(NewProtein {
                protein_id,
                sequence: self.sequence.clone(),
                taxa_id,
                length,
                domains,
            }),
            _ => Err(errors),
        }
    }
}

fn validate_domain(input: &DomainInput, errors: &mut FieldErrors) -> Option<NewDomain> {
    let before = errors.get("domains").map_or(0, <[String]>::len);

    match input.description.as_deref() {
        None => errors.add("domains", format!("description: {}", REQUIRED_MESSAGE)),
        Some(description) => {
            if let Err(e) = validate_text(description, DOMAIN_DESCRIPTION_MAX_LENGTH) {
                errors.add("domains", format!("description: {}", e));
            }
        },
    }

    if input.start.is_none() {
        errors.add("domains", format!("start: {}", REQUIRED_MESSAGE));
    }
    if input.stop.is_none() {
        errors.add("domains", format!("stop: {}", REQUIRED_MESSAGE));
    }
    if let (Some(start), Some(stop)) = (input.start, input.stop) {
        if start > stop {
            errors.add("domains", DOMAIN_RANGE_MESSAGE);
        }
    }

    match input.pfam_id.as_ref().and_then(|p| p.domain_id.as_deref()) {
        None => errors.add("domains", format!("pfam_id.domain_id: {}", REQUIRED_MESSAGE)),
        Some(pfam_id) => {
            if let Err(e) = validate_text(pfam_id, PFAM_ID_MAX_LENGTH) {
                errors.add("domains", format!("pfam_id.domain_id: {}", e));
            }
        },
    }

    let after = errors.get("domains").map_or(0, <[String]>::len);
    if after > before {
        return None;
    }

    Some(NewDomain {
        pfam_id: input.pfam_id.as_ref()?.domain_id.clone()?,
        description: input.description.clone()?,
        start: input.start?,
        stop: input.stop?,
    })
}

/// Handler for creating proteins
///
/// Runs in one transaction:
/// 1. resolve the organism by `taxa_id`
/// 2. insert the protein
/// 3. insert the sequence when one was submitted, even if empty
/// 4. for each domain in input order, resolve its Pfam family and insert it
/// 5. read the stored protein back and commit
///
/// # Errors
///
/// - `Validation` before any database work
/// - `OrganismNotFound` / `PfamNotFound` for dangling references
/// - `Duplicate` when the protein id is taken
/// - `Database` for any other storage failure
#[tracing::instrument(skip(pool, alphabet, command), fields(protein_id = ?command.protein_id))]
pub async fn handle(
    pool: PgPool,
    alphabet: Arc<AminoAcidAlphabet>,
    command: CreateProteinCommand,
) -> Result<ProteinRepresentation, CreateProteinError> {
    let protein = command
        .validate(&alphabet)
        .map_err(CreateProteinError::Validation)?;

    tracing::info!(domains = protein.domains.len(), "Creating protein");

    let mut tx = pool.begin().await?;

    let organism_exists: Option<i32> =
        sqlx::query_scalar("SELECT taxa_id FROM organisms WHERE taxa_id = $1 FOR SHARE")
            .bind(protein.taxa_id)
            .fetch_optional(&mut *tx)
            .await?;
    if organism_exists.is_none() {
        return Err(CreateProteinError::OrganismNotFound(protein.taxa_id));
    }

    sqlx::query("INSERT INTO proteins (protein_id, length, taxa_id) VALUES ($1, $2, $3)")
        .bind(&protein.protein_id)
        .bind(protein.length)
        .bind(protein.taxa_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                CreateProteinError::Duplicate(protein.protein_id.clone()),
                CreateProteinError::Database,
            )
        })?;

    if let Some(sequence) = &protein.sequence {
        sqlx::query("INSERT INTO sequences (protein_id, sequence) VALUES ($1, $2)")
            .bind(&protein.protein_id)
            .bind(sequence)
            .execute(&mut *tx)
            .await?;
    }

    for domain in &protein.domains {
        let pfam_exists: Option<String> =
            sqlx::query_scalar("SELECT pfam_id FROM pfams WHERE pfam_id = $1 FOR SHARE")
                .bind(&domain.pfam_id)
                .fetch_optional(&mut *tx)
                .await?;
        if pfam_exists.is_none() {
            return Err(CreateProteinError::PfamNotFound(domain.pfam_id.clone()));
        }

        sqlx::query(
            "INSERT INTO domains (protein_id, pfam_id, description, start, stop) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&protein.protein_id)
        .bind(&domain.pfam_id)
        .bind(&domain.description)
        .bind(domain.start)
        .bind(domain.stop)
        .execute(&mut *tx)
        .await?;
    }

    let created = load_protein(&mut tx, &protein.protein_id)
        .await?
        .ok_or_else(|| CreateProteinError::Database(sqlx::Error::RowNotFound))?;

    tx.commit().await?;

    tracing::info!(protein_id = %created.protein_id, "Protein created successfully");

    Ok(created)
}
