//! The applicant registry: record schema and validation, the durable
//! store with its uniqueness guarantee, and the HTTP surface over both.

pub mod domain;
pub mod routes;
pub mod store;

pub use domain::{Applicant, ApplicantDraft, ApplicantType, ValidationError};
pub use routes::registry_router;
pub use store::{ApplicantStore, SqliteStore, StoreError};
