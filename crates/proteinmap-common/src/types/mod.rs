//! Common types used across ProteinMap

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{ProteinMapError, Result};

/// The twenty canonical amino-acid one-letter codes.
pub const CANONICAL_AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// The set of residue letters a protein sequence may be written in.
///
/// Built once at startup from configuration and shared read-only by every
/// request that validates a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AminoAcidAlphabet {
    letters: BTreeSet<char>,
}

impl AminoAcidAlphabet {
    /// The 20-letter canonical alphabet
    pub fn canonical() -> Self {
        Self {
            letters: CANONICAL_AMINO_ACIDS.chars().collect(),
        }
    }

    /// Parse an alphabet from a string of letters, e.g. `"ACDEFGHIKLMNPQRSTVWY"`.
    ///
    /// Surrounding whitespace is ignored. The string must be non-empty and
    /// must not repeat a letter.
    pub fn parse(letters: &str) -> Result<Self> {
        let letters = letters.trim();
        if letters.is_empty() {
            return Err(ProteinMapError::InvalidAlphabet(
                "alphabet cannot be empty".to_string(),
            ));
        }

        let mut set = BTreeSet::new();
        for c in letters.chars() {
            if c.is_whitespace() {
                return Err(ProteinMapError::InvalidAlphabet(
                    "alphabet cannot contain whitespace".to_string(),
                ));
            }
            if !set.insert(c) {
                return Err(ProteinMapError::InvalidAlphabet(format!(
                    "letter '{}' appears more than once",
                    c
                )));
            }
        }

        Ok(Self { letters: set })
    }

    /// Whether `residue` belongs to the alphabet
    #[inline]
    pub fn contains(&self, residue: char) -> bool {
        self.letters.contains(&residue)
    }

    /// Whether every character of `sequence` belongs to the alphabet.
    ///
    /// The empty sequence trivially satisfies the check.
    pub fn contains_only(&self, sequence: &str) -> bool {
        sequence.chars().all(|c| self.contains(c))
    }

    /// Characters of `sequence` outside the alphabet, in order of first appearance
    pub fn invalid_residues(&self, sequence: &str) -> Vec<char> {
        let mut seen = BTreeSet::new();
        sequence
            .chars()
            .filter(|c| !self.contains(*c) && seen.insert(*c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
}

impl Default for AminoAcidAlphabet {
    fn default() -> Self {
        Self::canonical()
    }
}

impl std::fmt::Display for AminoAcidAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.letters {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for AminoAcidAlphabet {
    type Err = ProteinMapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AminoAcidAlphabet {
    type Error = ProteinMapError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AminoAcidAlphabet> for String {
    fn from(alphabet: AminoAcidAlphabet) -> Self {
        alphabet.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_has_twenty_letters() {
        let alphabet = AminoAcidAlphabet::canonical();
        assert_eq!(alphabet.len(), 20);
        assert_eq!(alphabet.to_string(), CANONICAL_AMINO_ACIDS);
    }

    #[test]
    fn test_contains_only_canonical_letters() {
        let alphabet = AminoAcidAlphabet::canonical();
        assert!(alphabet.contains_only("MKTAYIAKQRQISFVKSHFSRQ"));
        assert!(alphabet.contains_only(CANONICAL_AMINO_ACIDS));
        assert!(alphabet.contains_only(""));
    }

    #[test]
    fn test_rejects_non_canonical_letters() {
        let alphabet = AminoAcidAlphabet::canonical();
        for bad in ["ABC", "acd", "MK*", "X", "MKT AY", "MKTÜ"] {
            assert!(!alphabet.contains_only(bad), "'{}' should be rejected", bad);
        }
    }

    #[test]
    fn test_invalid_residues_are_reported_once_in_order() {
        let alphabet = AminoAcidAlphabet::canonical();
        assert_eq!(alphabet.invalid_residues("ABXBAZ"), vec!['B', 'X', 'Z']);
        assert!(alphabet.invalid_residues("ACDE").is_empty());
    }

    #[test]
    fn test_parse_custom_alphabet() {
        let alphabet: AminoAcidAlphabet = " ACDEFGHIKLMNPQRSTVWYU ".parse().unwrap();
        assert_eq!(alphabet.len(), 21);
        assert!(alphabet.contains('U'));
    }

    #[test]
    fn test_parse_rejects_empty_and_duplicates() {
        assert!(AminoAcidAlphabet::parse("").is_err());
        assert!(AminoAcidAlphabet::parse("   ").is_err());
        assert!(AminoAcidAlphabet::parse("AAC").is_err());
        assert!(AminoAcidAlphabet::parse("A C").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let alphabet = AminoAcidAlphabet::parse("CA").unwrap();
        let json = serde_json::to_string(&alphabet).unwrap();
        assert_eq!(json, "\"AC\"");

        let parsed: AminoAcidAlphabet = serde_json::from_str("\"ACDE\"").unwrap();
        assert_eq!(parsed.len(), 4);
        assert!(serde_json::from_str::<AminoAcidAlphabet>("\"AA\"").is_err());
    }
}
