pub mod coverage;
pub mod get;
pub mod list_by_organism;

pub use coverage::{ComputeCoverageError, ComputeCoverageQuery};
pub use get::{GetProteinError, GetProteinQuery};
pub use list_by_organism::{ListOrganismProteinsError, ListOrganismProteinsQuery, ProteinListItem};
