//! CSV parsing into an in-memory catalog
//!
//! All three files are header-less. Later rows win over earlier rows with the
//! same key. Cross-file references are checked in [`Catalog::assemble`] so a
//! load either has a consistent catalog to write or fails before touching the
//! database.

use proteinmap_common::{AminoAcidAlphabet, ProteinMapError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{ASSIGNMENT_FILE, PFAM_FILE, SEQUENCE_FILE};

const PROTEIN_ID_MAX: usize = 12;
const CLADE_MAX: usize = 2;
const GENUS_MAX: usize = 50;
const SPECIES_MAX: usize = 100;
const PFAM_ID_MAX: usize = 20;
const PFAM_DESCRIPTION_MAX: usize = 100;
const DOMAIN_DESCRIPTION_MAX: usize = 200;
const SEQUENCE_MAX: usize = 40_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfamRecord {
    pub pfam_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganismRecord {
    pub taxa_id: i32,
    pub clade: String,
    pub genus: String,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinRecord {
    pub protein_id: String,
    pub taxa_id: i32,
    pub length: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub protein_id: String,
    pub pfam_id: String,
    pub description: String,
    pub start: i32,
    pub stop: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub protein_id: String,
    pub sequence: String,
}

/// Organisms, proteins and domains read from the assignment file
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    pub organisms: BTreeMap<i32, OrganismRecord>,
    pub proteins: BTreeMap<String, ProteinRecord>,
    pub domains: Vec<DomainRecord>,
}

/// A consistent catalog ready to be written
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub pfams: Vec<PfamRecord>,
    pub organisms: Vec<OrganismRecord>,
    pub proteins: Vec<ProteinRecord>,
    pub domains: Vec<DomainRecord>,
    pub sequences: Vec<SequenceRecord>,
    /// Sequences holding residues outside the alphabet; loaded regardless
    pub invalid_sequences: usize,
    /// Domains whose start lies after their stop; loaded regardless
    pub inverted_domains: usize,
}

#[derive(Debug, Deserialize)]
struct PfamRow {
    pfam_id: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct AssignmentRow {
    protein_id: String,
    taxa_id: i32,
    clade: String,
    scientific_name: String,
    domain_description: String,
    pfam_id: String,
    start: i32,
    stop: i32,
    length: i32,
}

#[derive(Debug, Deserialize)]
struct SequenceRow {
    protein_id: String,
    sequence: String,
}

/// Key and numeric columns of the pfam and sequence files
const PFAM_TRIMMED: &[usize] = &[0];
const SEQUENCE_TRIMMED: &[usize] = &[0];

/// protein_id, taxa_id, clade, pfam_id, start, stop, length
const ASSIGNMENT_TRIMMED: &[usize] = &[0, 1, 2, 5, 6, 7, 8];

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::None)
        .from_reader(input)
}

fn csv_error(source: &str, err: csv::Error) -> ProteinMapError {
    let line = err.position().map_or(0, csv::Position::line);
    ProteinMapError::parse_at(source, line, err)
}

/// Deserialize every record, pairing each row with its 1-based line
///
/// Only the `trimmed` columns lose surrounding whitespace; text fields are
/// kept as written.
fn read_rows<T, R>(input: R, source: &str, trimmed: &[usize]) -> Result<Vec<(u64, T)>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv_reader(input);
    let mut rows = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(source, e))?;
        let line = record
            .position()
            .map_or(index as u64 + 1, csv::Position::line);
        let record: csv::StringRecord = record
            .iter()
            .enumerate()
            .map(|(column, field)| {
                if trimmed.contains(&column) {
                    field.trim()
                } else {
                    field
                }
            })
            .collect();
        let row = record
            .deserialize(None)
            .map_err(|e| ProteinMapError::parse_at(source, line, e))?;
        rows.push((line, row));
    }

    Ok(rows)
}

/// Check a text field is non-empty (unless `allow_empty`) and within `max` characters
fn check_text(
    source: &str,
    line: u64,
    field: &str,
    value: &str,
    max: usize,
    allow_empty: bool,
) -> Result<()> {
    if value.is_empty() && !allow_empty {
        return Err(ProteinMapError::parse_at(source, line, format!("{} is empty", field)));
    }
    if value.chars().count() > max {
        return Err(ProteinMapError::parse_at(
            source,
            line,
            format!("{} is longer than {} characters", field, max),
        ));
    }
    Ok(())
}

/// Split a scientific name on its first space into genus and species
///
/// `"Homo sapiens neanderthalensis"` gives `("Homo", "sapiens neanderthalensis")`;
/// a single word gives an empty species.
pub fn split_scientific_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((genus, species)) => (genus.to_string(), species.to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// Parse `pfam_id,description` rows; a repeated id replaces the earlier row
pub fn parse_pfams<R: Read>(input: R, source: &str) -> Result<Vec<PfamRecord>> {
    let mut pfams = BTreeMap::new();

    for (line, row) in read_rows::<PfamRow, _>(input, source, PFAM_TRIMMED)? {
        check_text(source, line, "pfam_id", &row.pfam_id, PFAM_ID_MAX, false)?;
        check_text(source, line, "description", &row.description, PFAM_DESCRIPTION_MAX, true)?;

        pfams.insert(
            row.pfam_id.clone(),
            PfamRecord {
                pfam_id: row.pfam_id,
                description: row.description,
            },
        );
    }

    Ok(pfams.into_values().collect())
}

/// Parse domain assignment rows
///
/// Each row contributes one domain. Organisms are keyed by taxa id and
/// proteins by protein id; the last row for a key wins.
pub fn parse_assignments<R: Read>(input: R, source: &str) -> Result<Assignments> {
    let mut assignments = Assignments::default();

    for (line, row) in read_rows::<AssignmentRow, _>(input, source, ASSIGNMENT_TRIMMED)? {
        let (genus, species) = split_scientific_name(&row.scientific_name);

        check_text(source, line, "protein_id", &row.protein_id, PROTEIN_ID_MAX, false)?;
        check_text(source, line, "clade", &row.clade, CLADE_MAX, false)?;
        check_text(source, line, "genus", &genus, GENUS_MAX, false)?;
        check_text(source, line, "species", &species, SPECIES_MAX, true)?;
        check_text(
            source,
            line,
            "domain_description",
            &row.domain_description,
            DOMAIN_DESCRIPTION_MAX,
            true,
        )?;
        check_text(source, line, "pfam_id", &row.pfam_id, PFAM_ID_MAX, false)?;
        if row.length < 0 {
            return Err(ProteinMapError::parse_at(source, line, "length is negative"));
        }

        assignments.organisms.insert(
            row.taxa_id,
            OrganismRecord {
                taxa_id: row.taxa_id,
                clade: row.clade,
                genus,
                species,
            },
        );
        assignments.proteins.insert(
            row.protein_id.clone(),
            ProteinRecord {
                protein_id: row.protein_id.clone(),
                taxa_id: row.taxa_id,
                length: row.length,
            },
        );
        assignments.domains.push(DomainRecord {
            protein_id: row.protein_id,
            pfam_id: row.pfam_id,
            description: row.domain_description,
            start: row.start,
            stop: row.stop,
        });
    }

    Ok(assignments)
}

/// Parse `protein_id,sequence` rows; a repeated id replaces the earlier row
pub fn parse_sequences<R: Read>(input: R, source: &str) -> Result<BTreeMap<String, String>> {
    let mut sequences = BTreeMap::new();

    for (line, row) in read_rows::<SequenceRow, _>(input, source, SEQUENCE_TRIMMED)? {
        check_text(source, line, "protein_id", &row.protein_id, PROTEIN_ID_MAX, false)?;
        check_text(source, line, "sequence", &row.sequence, SEQUENCE_MAX, true)?;

        sequences.insert(row.protein_id, row.sequence);
    }

    Ok(sequences)
}

impl Catalog {
    /// Join the parsed files, rejecting dangling references
    ///
    /// # Errors
    ///
    /// - a domain names a Pfam id missing from the descriptions file
    /// - a sequence belongs to a protein missing from the assignment file
    pub fn assemble(
        pfams: Vec<PfamRecord>,
        assignments: Assignments,
        sequences: BTreeMap<String, String>,
        alphabet: &AminoAcidAlphabet,
    ) -> Result<Self> {
        let known_pfams: BTreeSet<&str> = pfams.iter().map(|p| p.pfam_id.as_str()).collect();
        if let Some(domain) = assignments
            .domains
            .iter()
            .find(|d| !known_pfams.contains(d.pfam_id.as_str()))
        {
            return Err(ProteinMapError::Parse(format!(
                "{}: protein '{}' has a domain in Pfam '{}', which is not in {}",
                ASSIGNMENT_FILE, domain.protein_id, domain.pfam_id, PFAM_FILE
            )));
        }

        if let Some(protein_id) = sequences
            .keys()
            .find(|id| !assignments.proteins.contains_key(id.as_str()))
        {
            return Err(ProteinMapError::Parse(format!(
                "{}: sequence for protein '{}', which is not in {}",
                SEQUENCE_FILE, protein_id, ASSIGNMENT_FILE
            )));
        }

        let mut invalid_sequences = 0;
        let sequences: Vec<SequenceRecord> = sequences
            .into_iter()
            .map(|(protein_id, sequence)| {
                if !alphabet.contains_only(&sequence) {
                    tracing::debug!(
                        %protein_id,
                        invalid = ?alphabet.invalid_residues(&sequence),
                        "Sequence contains residues outside the alphabet"
                    );
                    invalid_sequences += 1;
                }
                SequenceRecord {
                    protein_id,
                    sequence,
                }
            })
            .collect();

        let inverted_domains = assignments
            .domains
            .iter()
            .filter(|d| d.start > d.stop)
            .count();

        Ok(Self {
            pfams,
            organisms: assignments.organisms.into_values().collect(),
            proteins: assignments.proteins.into_values().collect(),
            domains: assignments.domains,
            sequences,
            invalid_sequences,
            inverted_domains,
        })
    }
}

fn open(data_dir: &Path, name: &str) -> Result<File> {
    let path = data_dir.join(name);
    File::open(&path).map_err(|e| {
        ProteinMapError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

/// Read and assemble the catalog from the three files in `data_dir`
///
/// With `skip_sequences` the sequence file is not opened and the catalog
/// carries no sequences.
pub fn read_catalog(
    data_dir: &Path,
    alphabet: &AminoAcidAlphabet,
    skip_sequences: bool,
) -> Result<Catalog> {
    let pfams = parse_pfams(open(data_dir, PFAM_FILE)?, PFAM_FILE)?;
    tracing::info!(count = pfams.len(), file = PFAM_FILE, "Parsed Pfam descriptions");

    let assignments = parse_assignments(open(data_dir, ASSIGNMENT_FILE)?, ASSIGNMENT_FILE)?;
    tracing::info!(
        organisms = assignments.organisms.len(),
        proteins = assignments.proteins.len(),
        domains = assignments.domains.len(),
        file = ASSIGNMENT_FILE,
        "Parsed domain assignments"
    );

    let sequences = if skip_sequences {
        tracing::info!("Skipping sequences");
        BTreeMap::new()
    } else {
        let sequences = parse_sequences(open(data_dir, SEQUENCE_FILE)?, SEQUENCE_FILE)?;
        tracing::info!(count = sequences.len(), file = SEQUENCE_FILE, "Parsed sequences");
        sequences
    };

    let catalog = Catalog::assemble(pfams, assignments, sequences, alphabet)?;

    if catalog.invalid_sequences > 0 {
        tracing::warn!(
            count = catalog.invalid_sequences,
            alphabet = %alphabet,
            "Sequences contain residues outside the alphabet; loading them anyway"
        );
    }
    if catalog.inverted_domains > 0 {
        tracing::warn!(
            count = catalog.inverted_domains,
            "Domains with start after stop; loading them anyway"
        );
    }

    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const PFAMS: &str = "\
PF00001,7 transmembrane receptor (rhodopsin family)
PF00069,Protein kinase domain
PF00001,7tm receptor
";

    const ASSIGNMENTS: &str = "\
A0A014PQC0,1116,E,Metarhizium robertsii,Kinase domain,PF00069,10,80,120
A0A014PQC0,1116,E,Metarhizium robertsii,Receptor domain,PF00001,85,110,120
B0B000XYZ1,9606,E,Homo sapiens neanderthalensis,Kinase domain,PF00069,1,50,60
";

    const SEQUENCES: &str = "\
A0A014PQC0,MKTAYIAKQR
B0B000XYZ1,MKTAYIAKQB
";

    #[test]
    fn test_split_scientific_name() {
        assert_eq!(
            split_scientific_name("Homo sapiens"),
            ("Homo".to_string(), "sapiens".to_string())
        );
        assert_eq!(
            split_scientific_name("Homo sapiens neanderthalensis"),
            ("Homo".to_string(), "sapiens neanderthalensis".to_string())
        );
        assert_eq!(split_scientific_name("Bacteria"), ("Bacteria".to_string(), String::new()));
    }

    #[test]
    fn test_parse_pfams_last_duplicate_wins() {
        let pfams = parse_pfams(PFAMS.as_bytes(), PFAM_FILE).unwrap();
        assert_eq!(pfams.len(), 2);
        assert_eq!(pfams[0].pfam_id, "PF00001");
        assert_eq!(pfams[0].description, "7tm receptor");
    }

    #[test]
    fn test_parse_pfams_quoted_commas() {
        let pfams = parse_pfams(
            "PF00002,\"7tm receptor, secretin family\"\n".as_bytes(),
            PFAM_FILE,
        )
        .unwrap();
        assert_eq!(pfams[0].description, "7tm receptor, secretin family");
    }

    #[test]
    fn test_only_key_and_numeric_fields_are_trimmed() {
        let pfams = parse_pfams(" PF00069 , Protein kinase domain \n".as_bytes(), PFAM_FILE).unwrap();
        assert_eq!(pfams[0].pfam_id, "PF00069");
        assert_eq!(pfams[0].description, " Protein kinase domain ");

        let assignments = parse_assignments(
            "A0A014PQC0 , 1116 ,E,Metarhizium robertsii, Kinase domain , PF00069 , 10 , 80 , 120 \n"
                .as_bytes(),
            ASSIGNMENT_FILE,
        )
        .unwrap();
        let domain = &assignments.domains[0];
        assert_eq!(domain.protein_id, "A0A014PQC0");
        assert_eq!(domain.pfam_id, "PF00069");
        assert_eq!(domain.description, " Kinase domain ");
        assert_eq!((domain.start, domain.stop), (10, 80));
        assert_eq!(assignments.proteins["A0A014PQC0"].length, 120);

        let sequences = parse_sequences("A0A014PQC0 ,MKT \n".as_bytes(), SEQUENCE_FILE).unwrap();
        assert_eq!(sequences["A0A014PQC0"], "MKT ");
    }

    #[test]
    fn test_parse_assignments() {
        let assignments = parse_assignments(ASSIGNMENTS.as_bytes(), ASSIGNMENT_FILE).unwrap();

        assert_eq!(assignments.organisms.len(), 2);
        assert_eq!(assignments.proteins.len(), 2);
        assert_eq!(assignments.domains.len(), 3);

        let human = &assignments.organisms[&9606];
        assert_eq!(human.genus, "Homo");
        assert_eq!(human.species, "sapiens neanderthalensis");

        let protein = &assignments.proteins["A0A014PQC0"];
        assert_eq!(protein.length, 120);
        assert_eq!(protein.taxa_id, 1116);

        assert_eq!(assignments.domains[1].pfam_id, "PF00001");
        assert_eq!(assignments.domains[1].start, 85);
    }

    #[test]
    fn test_parse_assignments_reports_line() {
        let input = "\
A0A014PQC0,1116,E,Metarhizium robertsii,Kinase domain,PF00069,10,80,120
A0A014PQC0,1116,E,Metarhizium robertsii,Kinase domain,PF00069,ten,80,120
";
        let err = parse_assignments(input.as_bytes(), ASSIGNMENT_FILE).unwrap_err();
        assert!(err.to_string().contains("assignment_data_set.csv:2"), "{}", err);
    }

    #[test]
    fn test_parse_assignments_rejects_long_protein_id() {
        let input = "ABCDEFGHIJKLM,1116,E,Metarhizium robertsii,Kinase,PF00069,1,2,3\n";
        let err = parse_assignments(input.as_bytes(), ASSIGNMENT_FILE).unwrap_err();
        assert!(err.to_string().contains("protein_id"), "{}", err);
    }

    #[test]
    fn test_assemble_counts_invalid_sequences() {
        let catalog = Catalog::assemble(
            parse_pfams(PFAMS.as_bytes(), PFAM_FILE).unwrap(),
            parse_assignments(ASSIGNMENTS.as_bytes(), ASSIGNMENT_FILE).unwrap(),
            parse_sequences(SEQUENCES.as_bytes(), SEQUENCE_FILE).unwrap(),
            &AminoAcidAlphabet::canonical(),
        )
        .unwrap();

        assert_eq!(catalog.sequences.len(), 2);
        assert_eq!(catalog.invalid_sequences, 1);
        assert_eq!(catalog.inverted_domains, 0);
    }

    #[test]
    fn test_assemble_rejects_unknown_pfam() {
        let pfams = parse_pfams("PF00069,Protein kinase domain\n".as_bytes(), PFAM_FILE).unwrap();
        let err = Catalog::assemble(
            pfams,
            parse_assignments(ASSIGNMENTS.as_bytes(), ASSIGNMENT_FILE).unwrap(),
            BTreeMap::new(),
            &AminoAcidAlphabet::canonical(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("PF00001"), "{}", err);
    }

    #[test]
    fn test_assemble_rejects_orphan_sequence() {
        let err = Catalog::assemble(
            parse_pfams(PFAMS.as_bytes(), PFAM_FILE).unwrap(),
            parse_assignments(ASSIGNMENTS.as_bytes(), ASSIGNMENT_FILE).unwrap(),
            parse_sequences("ZZZ999,MKT\n".as_bytes(), SEQUENCE_FILE).unwrap(),
            &AminoAcidAlphabet::canonical(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("ZZZ999"), "{}", err);
    }

    #[test]
    fn test_read_catalog_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in [
            (PFAM_FILE, PFAMS),
            (ASSIGNMENT_FILE, ASSIGNMENTS),
            (SEQUENCE_FILE, SEQUENCES),
        ] {
            let mut file = File::create(dir.path().join(name)).unwrap();
            file.write_all(contents.as_bytes()).unwrap();
        }

        let catalog = read_catalog(dir.path(), &AminoAcidAlphabet::canonical(), false).unwrap();
        assert_eq!(catalog.pfams.len(), 2);
        assert_eq!(catalog.organisms.len(), 2);
        assert_eq!(catalog.proteins.len(), 2);
        assert_eq!(catalog.domains.len(), 3);
        assert_eq!(catalog.sequences.len(), 2);

        std::fs::remove_file(dir.path().join(SEQUENCE_FILE)).unwrap();
        let catalog = read_catalog(dir.path(), &AminoAcidAlphabet::canonical(), true).unwrap();
        assert!(catalog.sequences.is_empty());

        let err = read_catalog(dir.path(), &AminoAcidAlphabet::canonical(), false).unwrap_err();
        assert!(err.to_string().contains(SEQUENCE_FILE), "{}", err);
    }
}
