pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    CreateProteinCommand, CreateProteinError, DeleteProteinCommand, DeleteProteinError,
    DeleteProteinResponse,
};
pub use queries::{
    ComputeCoverageError, ComputeCoverageQuery, GetProteinError, GetProteinQuery,
    ListOrganismProteinsError, ListOrganismProteinsQuery, ProteinListItem,
};
pub use routes::proteins_routes;
pub use types::{DomainRepresentation, ProteinRepresentation, TaxonomyRepresentation};
