pub mod create;
pub mod delete;

pub use create::{
    CreateProteinCommand, CreateProteinError, DomainInput, NewDomain, NewProtein, PfamRefInput,
    TaxonomyInput,
};
pub use delete::{DeleteProteinCommand, DeleteProteinError, DeleteProteinResponse};
