use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use models::record;
use serde::{Deserialize, Serialize};
use service::{Pagination, Period, RecordFilter, RecordInput};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserServiceQuery {
    pub user_id: String,
    pub service_name: String,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    /// Page size; 0 or missing means 20, capped at 100.
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// DD-MM-YYYY, inclusive
    pub start_time: String,
    /// DD-MM-YYYY, inclusive
    pub end_time: String,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryOutput {
    pub total: i64,
}

fn record_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, JsonApiError> {
    let Path(id) = path?;
    if id <= 0 {
        return Err(JsonApiError::bad_request("id must be > 0"));
    }
    Ok(id)
}

fn required(name: &str, value: &str) -> Result<(), JsonApiError> {
    if value.trim().is_empty() {
        return Err(JsonApiError::bad_request(format!("{name} is required")));
    }
    Ok(())
}

#[utoipa::path(
    post, path = "/api/create", tag = "records",
    request_body = crate::openapi::RecordInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::RecordDoc),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Persistence Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<RecordInput>, JsonRejection>,
) -> Result<(StatusCode, Json<record::Model>), JsonApiError> {
    let Json(input) = body?;
    let created = state.records.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    delete, path = "/api/delete/{id}", tag = "records",
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Persistence Failed")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = record_id(path)?;
    state.records.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put, path = "/api/update/{id}", tag = "records",
    params(("id" = i64, Path, description = "Record ID")),
    request_body = crate::openapi::RecordInputDoc,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Persistence Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<RecordInput>, JsonRejection>,
) -> Result<StatusCode, JsonApiError> {
    let id = record_id(path)?;
    let Json(input) = body?;
    state.records.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/record/{id}", tag = "records",
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::RecordDoc),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_by_id(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<record::Model>, JsonApiError> {
    let id = record_id(path)?;
    Ok(Json(state.records.get_by_id(id).await?))
}

/// An owner without records gets an empty list, never 404.
#[utoipa::path(
    get, path = "/api/records/user", tag = "records",
    params(UserQuery),
    responses(
        (status = 200, description = "OK", body = [crate::openapi::RecordDoc]),
        (status = 400, description = "Bad Request")
    )
)]
pub async fn get_by_user(
    State(state): State<ServerState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<Vec<record::Model>>, JsonApiError> {
    let Query(q) = query?;
    required("user_id", &q.user_id)?;
    Ok(Json(state.records.get_by_user(&q.user_id).await?))
}

#[utoipa::path(
    get, path = "/api/record/user_service", tag = "records",
    params(UserServiceQuery),
    responses(
        (status = 200, description = "OK", body = crate::openapi::RecordDoc),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_by_user_and_service(
    State(state): State<ServerState>,
    query: Result<Query<UserServiceQuery>, QueryRejection>,
) -> Result<Json<record::Model>, JsonApiError> {
    let Query(q) = query?;
    required("user_id", &q.user_id)?;
    required("service_name", &q.service_name)?;
    Ok(Json(state.records.get_by_user_and_service(&q.user_id, &q.service_name).await?))
}

#[utoipa::path(
    get, path = "/api/records", tag = "records",
    params(ListQuery),
    responses(
        (status = 200, description = "OK", body = [crate::openapi::RecordDoc]),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Persistence Failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<record::Model>>, JsonApiError> {
    let Query(q) = query?;
    let filter = RecordFilter::new(q.user_id.as_deref(), q.service_name.as_deref());
    let rows = state.records.list(Pagination::new(q.limit, q.offset), filter).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/api/records/summary", tag = "records",
    params(SummaryQuery),
    responses(
        (status = 200, description = "OK", body = crate::openapi::SummaryDoc),
        (status = 400, description = "Bad Request"),
        (status = 500, description = "Aggregation Failed")
    )
)]
pub async fn summary(
    State(state): State<ServerState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryOutput>, JsonApiError> {
    let Query(q) = query?;
    let period = Period::from_days(&q.start_time, &q.end_time)?;
    let filter = RecordFilter::new(q.user_id.as_deref(), q.service_name.as_deref());
    let total = state.records.sum_for_period(period, filter).await?;
    Ok(Json(SummaryOutput { total }))
}
