//! Date parsing and record validation.
//!
//! All checks take `now` explicitly so an operation reads the clock once.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::errors::ValidationError;
use super::domain::{RecordDraft, RecordInput};

/// Accepted textual date format (day-month-year).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::Parse { input: raw.to_string() })
}

/// Parse an optional date; absent or blank yields `None`.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some),
    }
}

pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable microsecond of `day`. Stays in range for `NaiveDate::MAX`.
pub fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    start_of_day(day) + (Duration::days(1) - Duration::microseconds(1))
}

/// Expiry must not precede creation, nor `now`.
pub fn check_window(
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if expires_at < created_at {
        return Err(ValidationError::InvalidDateRange("expires_at must not be before created_at".into()));
    }
    if expires_at < now {
        return Err(ValidationError::InvalidDateRange("expires_at must not be in the past".into()));
    }
    Ok(())
}

/// Validate caller input into a [`RecordDraft`].
///
/// A missing `created_at` stays `None` in the draft but is checked as `now`.
pub fn validate_record(input: &RecordInput, now: DateTime<Utc>) -> Result<RecordDraft, ValidationError> {
    models::record::validate_service_name(&input.service_name)?;
    models::record::validate_user_id(&input.user_id)?;
    models::record::validate_price(input.price)?;

    let expires_at = start_of_day(parse_date(&input.expires_at)?);
    let created_at = parse_optional_date(input.created_at.as_deref())?.map(start_of_day);
    check_window(created_at.unwrap_or(now), expires_at, now)?;

    Ok(RecordDraft {
        service_name: input.service_name.clone(),
        price: input.price,
        user_id: input.user_id.clone(),
        created_at,
        expires_at,
    })
}
