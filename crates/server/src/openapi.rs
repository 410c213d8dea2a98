use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Dates use `DD-MM-YYYY`; `created_at` defaults to the current time.
#[derive(ToSchema)]
pub struct RecordInputDoc {
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400, minimum = 0)]
    pub price: i32,
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: String,
    #[schema(example = "01-12-2026")]
    pub expires_at: String,
    #[schema(example = "01-11-2026")]
    pub created_at: Option<String>,
}

#[derive(ToSchema)]
pub struct RecordDoc {
    pub id: i64,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// RFC 3339 timestamp
    pub expires_at: String,
}

#[derive(ToSchema)]
pub struct SummaryDoc { pub total: i64 }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
    pub code: u16,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Online Subscriptions API", description = "Track user subscription records and their cost"),
    paths(
        crate::routes::health,
        crate::routes::records::create,
        crate::routes::records::delete,
        crate::routes::records::update,
        crate::routes::records::get_by_id,
        crate::routes::records::get_by_user,
        crate::routes::records::get_by_user_and_service,
        crate::routes::records::list,
        crate::routes::records::summary,
    ),
    components(
        schemas(
            HealthResponse,
            RecordInputDoc,
            RecordDoc,
            SummaryDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "records")
    )
)]
pub struct ApiDoc;
