pub mod queries;
pub mod routes;
pub mod types;

pub use queries::{
    GetPfamError, GetPfamQuery, ListOrganismPfamsError, ListOrganismPfamsQuery, OrganismPfamItem,
};
pub use routes::pfams_routes;
pub use types::{PfamRepresentation, PfamRow};
