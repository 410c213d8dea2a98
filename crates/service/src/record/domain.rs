use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use super::validation;

/// Record fields as supplied by a caller. Dates are `DD-MM-YYYY` text.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordInput {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub expires_at: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Validated record ready for the store.
///
/// `created_at == None` leaves the column to the store: the column default on
/// insert, the current value on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

/// Optional equality filters, AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

impl RecordFilter {
    /// Build from raw query values; an empty string means "no filter".
    pub fn new(user_id: Option<&str>, service_name: Option<&str>) -> Self {
        Self { user_id: non_empty(user_id), service_name: non_empty(service_name) }
    }

    pub fn by_user(user_id: &str) -> Self { Self::new(Some(user_id), None) }

    pub fn is_empty(&self) -> bool { self.user_id.is_none() && self.service_name.is_none() }
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Inclusive `created_at` window used for price summation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    /// No ordering check here; callers that accept user input go through
    /// [`Period::from_days`].
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self { Self { start, end } }

    /// Parse two `DD-MM-YYYY` dates into a window covering both days entirely.
    /// Rejects `end < start`.
    pub fn from_days(start: &str, end: &str) -> Result<Self, ValidationError> {
        let start_day = validation::parse_date(start)?;
        let end_day = validation::parse_date(end)?;
        if end_day < start_day {
            return Err(ValidationError::InvalidDateRange("end time must not be before start time".into()));
        }
        Ok(Self { start: validation::start_of_day(start_day), end: validation::end_of_day(end_day) })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool { self.start <= at && at <= self.end }
}
