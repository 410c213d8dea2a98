//! Record module: domain types, validation, persistence gateway and the
//! business service that ties them together.

pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{Period, RecordDraft, RecordFilter, RecordInput};
pub use repository::RecordRepository;
pub use service::RecordService;
