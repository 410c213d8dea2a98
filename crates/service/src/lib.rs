//! Service layer for subscription records.
//! - `record::validation` turns raw input into validated drafts
//! - `record::repository` is the persistence gateway seam (SeaORM and in-memory)
//! - `record::service` owns the business rules and the error taxonomy

pub mod errors;
pub mod pagination;
pub mod record;
#[cfg(test)]
pub mod test_support;

pub use errors::{RecordError, RepositoryError, ValidationError};
pub use pagination::Pagination;
pub use record::{Period, RecordFilter, RecordInput, RecordService};
