pub mod get;
pub mod list_by_organism;

pub use get::{GetPfamError, GetPfamQuery};
pub use list_by_organism::{ListOrganismPfamsError, ListOrganismPfamsQuery, OrganismPfamItem};
