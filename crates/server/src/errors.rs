use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::{RecordError, ValidationError};
use thiserror::Error;

/// Code for requests rejected before reaching the record service
/// (malformed JSON, bad query or path parameters).
pub const BAD_REQUEST_CODE: u16 = 1000;

/// JSON error body: `{"error": title, "detail": message, "code": n}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
    pub code: u16,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>, code: u16) -> Self {
        Self { status, title, detail, code }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(detail.into()), BAD_REQUEST_CODE)
    }
}

impl From<RecordError> for JsonApiError {
    fn from(e: RecordError) -> Self {
        let (status, title) = match &e {
            RecordError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            RecordError::NotFound => (StatusCode::NOT_FOUND, "Not Found"),
            RecordError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Persistence Failed"),
            RecordError::Aggregation(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Aggregation Failed"),
        };
        Self { status, title, detail: Some(e.to_string()), code: e.code() }
    }
}

impl From<ValidationError> for JsonApiError {
    fn from(e: ValidationError) -> Self {
        RecordError::Validation(e).into()
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<QueryRejection> for JsonApiError {
    fn from(r: QueryRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self { Self::bad_request(r.body_text()) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.title,
            "detail": self.detail,
            "code": self.code,
        });
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::RepositoryError;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (RecordError::NotFound, StatusCode::NOT_FOUND),
            (RecordError::Validation(ValidationError::Field("bad".into())), StatusCode::BAD_REQUEST),
            (RecordError::Persistence(RepositoryError::Db("down".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (RecordError::Aggregation(RepositoryError::Db("down".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            let code = err.code();
            let api: JsonApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
        }
    }

    #[test]
    fn bad_request_carries_stable_code() {
        let e = JsonApiError::bad_request("id must be > 0");
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(e.code, BAD_REQUEST_CODE);
        assert_eq!(e.detail.as_deref(), Some("id must be > 0"));
    }
}
