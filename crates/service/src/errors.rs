use thiserror::Error;

/// Failure reported by a [`RecordRepository`](crate::record::RecordRepository)
/// implementation. "No rows" is not an error at this layer; it is signalled
/// through `Option`/`bool` return values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Db(String),
}

impl From<sea_orm::DbErr> for RepositoryError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Db(e.to_string())
    }
}

/// Input rejected before any store call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid date {input:?}: expected DD-MM-YYYY")]
    Parse { input: String },
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("{0}")]
    Field(String),
}

impl From<models::errors::ModelError> for ValidationError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::Field(msg),
        }
    }
}

/// Error taxonomy of the record service.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("record not found")]
    NotFound,
    #[error("persistence failed: {0}")]
    Persistence(#[source] RepositoryError),
    #[error("aggregation failed: {0}")]
    Aggregation(#[source] RepositoryError),
}

impl RecordError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            RecordError::Validation(_) => 1001,
            RecordError::NotFound => 1004,
            RecordError::Persistence(_) => 1200,
            RecordError::Aggregation(_) => 1201,
        }
    }

    /// Short label used as the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::Validation(_) => "validation_failed",
            RecordError::NotFound => "not_found",
            RecordError::Persistence(_) => "persistence_failed",
            RecordError::Aggregation(_) => "aggregation_failed",
        }
    }
}
