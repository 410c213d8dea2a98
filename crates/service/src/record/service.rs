use std::sync::Arc;

use chrono::{DateTime, Utc};
use models::record;
use tracing::{error, info, instrument, warn};

use super::domain::{Period, RecordFilter, RecordInput};
use super::repository::RecordRepository;
use super::validation;
use crate::errors::RecordError;
use crate::pagination::Pagination;

pub const OP_CREATE: &str = "records.create";
pub const OP_UPDATE: &str = "records.update";
pub const OP_DELETE: &str = "records.delete_by_id";
pub const OP_GET: &str = "records.get_by_id";
pub const OP_GET_BY_USER: &str = "records.get_by_user";
pub const OP_GET_BY_USER_AND_SERVICE: &str = "records.get_by_user_and_service";
pub const OP_LIST: &str = "records.list";
pub const OP_SUM: &str = "records.sum_for_period";

/// Record business service: the only writer of record state.
///
/// Stateless apart from the injected repository; every operation issues at
/// most one repository call and never retries.
pub struct RecordService<R: RecordRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: RecordRepository + ?Sized> RecordService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Validate and persist a new record, returning it with its assigned id.
    ///
    /// # Examples
    /// ```
    /// use service::record::{RecordService, RecordInput, repository::mock::MockRecordRepository};
    /// use std::sync::Arc;
    /// let svc = RecordService::new(Arc::new(MockRecordRepository::default()));
    /// let expires_at = (chrono::Utc::now() + chrono::Duration::days(30)).format("%d-%m-%Y").to_string();
    /// let input = RecordInput { service_name: "Netflix".into(), price: 999, user_id: "u1".into(), expires_at, created_at: None };
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert!(created.id > 0);
    /// assert_eq!(created.price, 999);
    /// ```
    #[instrument(skip(self, input), fields(operation = OP_CREATE, user_id = %input.user_id, service_name = %input.service_name))]
    pub async fn create(&self, input: RecordInput) -> Result<record::Model, RecordError> {
        info!("creating record");
        let now = Utc::now();
        let result = self.try_create(&input, now).await;
        if let Ok(m) = &result {
            info!(id = m.id, "record created");
        }
        observe(OP_CREATE, result)
    }

    async fn try_create(&self, input: &RecordInput, now: DateTime<Utc>) -> Result<record::Model, RecordError> {
        let mut draft = validation::validate_record(input, now)?;
        draft.created_at = Some(draft.created_at.unwrap_or(now));
        self.repo.save(&draft).await.map_err(RecordError::Persistence)
    }

    /// Replace every field of an existing record. A missing `created_at`
    /// becomes `now`, as on create.
    #[instrument(skip(self, input), fields(operation = OP_UPDATE))]
    pub async fn update(&self, id: i64, input: RecordInput) -> Result<(), RecordError> {
        info!("updating record");
        let now = Utc::now();
        let result = self.try_update(id, &input, now).await;
        observe(OP_UPDATE, result)
    }

    async fn try_update(&self, id: i64, input: &RecordInput, now: DateTime<Utc>) -> Result<(), RecordError> {
        let mut draft = validation::validate_record(input, now)?;
        draft.created_at = Some(draft.created_at.unwrap_or(now));
        match self.repo.update(id, &draft).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(RecordError::NotFound),
            Err(e) => Err(RecordError::Persistence(e)),
        }
    }

    #[instrument(skip(self), fields(operation = OP_DELETE))]
    pub async fn delete_by_id(&self, id: i64) -> Result<(), RecordError> {
        info!("deleting record");
        let result = match self.repo.delete_by_id(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(RecordError::NotFound),
            Err(e) => Err(RecordError::Persistence(e)),
        };
        observe(OP_DELETE, result)
    }

    #[instrument(skip(self), fields(operation = OP_GET))]
    pub async fn get_by_id(&self, id: i64) -> Result<record::Model, RecordError> {
        let result = self
            .repo
            .get_by_id(id)
            .await
            .map_err(RecordError::Persistence)
            .and_then(|found| found.ok_or(RecordError::NotFound));
        observe(OP_GET, result)
    }

    /// All records of one owner, newest first. An unknown owner simply has
    /// no records.
    #[instrument(skip(self), fields(operation = OP_GET_BY_USER))]
    pub async fn get_by_user(&self, user_id: &str) -> Result<Vec<record::Model>, RecordError> {
        let result = self.repo.get_by_user(user_id).await.map_err(RecordError::Persistence);
        if let Ok(rows) = &result {
            info!(count = rows.len(), "records retrieved");
        }
        observe(OP_GET_BY_USER, result)
    }

    #[instrument(skip(self), fields(operation = OP_GET_BY_USER_AND_SERVICE))]
    pub async fn get_by_user_and_service(&self, user_id: &str, service_name: &str) -> Result<record::Model, RecordError> {
        let result = self
            .repo
            .get_by_user_and_service(user_id, service_name)
            .await
            .map_err(RecordError::Persistence)
            .and_then(|found| found.ok_or(RecordError::NotFound));
        observe(OP_GET_BY_USER_AND_SERVICE, result)
    }

    /// Filtered page of records, newest first. No total count is returned.
    #[instrument(skip(self), fields(operation = OP_LIST))]
    pub async fn list(&self, pagination: Pagination, filter: RecordFilter) -> Result<Vec<record::Model>, RecordError> {
        let page = pagination.normalize();
        let result = self.repo.list(&filter, page).await.map_err(RecordError::Persistence);
        if let Ok(rows) = &result {
            info!(count = rows.len(), limit = page.limit, offset = page.offset, "records listed");
        }
        observe(OP_LIST, result)
    }

    /// Total price of records created inside `period`. The caller is
    /// responsible for `period.start <= period.end`.
    #[instrument(skip(self), fields(operation = OP_SUM))]
    pub async fn sum_for_period(&self, period: Period, filter: RecordFilter) -> Result<i64, RecordError> {
        let result = self.repo.sum_for_period(&period, &filter).await.map_err(RecordError::Aggregation);
        if let Ok(total) = &result {
            info!(total = *total, "period summed");
        }
        observe(OP_SUM, result)
    }
}

/// Log the outcome once and count it.
fn observe<T>(operation: &'static str, result: Result<T, RecordError>) -> Result<T, RecordError> {
    match &result {
        Ok(_) => {
            info!(operation, "record operation succeeded");
            common::metrics::observe_operation(operation, "ok");
        }
        Err(e @ (RecordError::Validation(_) | RecordError::NotFound)) => {
            warn!(operation, code = e.code(), error = %e, "record operation rejected");
            common::metrics::observe_operation(operation, e.kind());
        }
        Err(e) => {
            error!(operation, code = e.code(), error = %e, "record operation failed");
            common::metrics::observe_operation(operation, e.kind());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{RepositoryError, ValidationError};
    use crate::record::repository::mock::MockRecordRepository;
    use chrono::{Duration, TimeZone};

    fn day(offset_days: i64) -> String {
        (Utc::now() + Duration::days(offset_days)).format(validation::DATE_FORMAT).to_string()
    }

    fn input(user_id: &str, service_name: &str, price: i32) -> RecordInput {
        RecordInput {
            service_name: service_name.into(),
            price,
            user_id: user_id.into(),
            expires_at: day(30),
            created_at: None,
        }
    }

    fn setup() -> (Arc<MockRecordRepository>, RecordService<MockRecordRepository>) {
        let repo = Arc::new(MockRecordRepository::default());
        (repo.clone(), RecordService::new(repo))
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (_, svc) = setup();
        let created = svc.create(input("u1", "Netflix", 999)).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.price, 999);

        let fetched = svc.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_defaults_created_at_to_now() {
        let (_, svc) = setup();
        let before = Utc::now();
        let created = svc.create(input("u1", "Netflix", 999)).await.unwrap();
        let after = Utc::now();
        assert!(before <= created.created_at && created.created_at <= after);
    }

    #[tokio::test]
    async fn create_keeps_supplied_created_at() {
        let (_, svc) = setup();
        let mut i = input("u1", "Netflix", 999);
        i.created_at = Some("01-01-2026".into());
        let created = svc.create(i).await.unwrap();
        assert_eq!(created.created_at, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn expiry_before_creation_fails_validation_without_touching_store() {
        let (repo, svc) = setup();
        let mut i = input("u1", "Netflix", 999);
        i.created_at = Some(day(40));
        let err = svc.create(i.clone()).await.unwrap_err();
        assert!(matches!(err, RecordError::Validation(ValidationError::InvalidDateRange(_))));
        assert!(repo.is_empty());

        let existing = svc.create(input("u1", "Netflix", 999)).await.unwrap();
        let err = svc.update(existing.id, i).await.unwrap_err();
        assert!(matches!(err, RecordError::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_dates_fail_validation() {
        let (_, svc) = setup();
        let mut i = input("u1", "Netflix", 999);
        i.expires_at = "2030-01-01".into();
        let err = svc.create(i).await.unwrap_err();
        assert!(matches!(err, RecordError::Validation(ValidationError::Parse { .. })));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_requires_existing_id() {
        let (_, svc) = setup();
        let mut original = input("u1", "Netflix", 999);
        original.created_at = Some("01-01-2026".into());
        let created = svc.create(original).await.unwrap();

        let err = svc.update(created.id + 100, input("u1", "Netflix", 1)).await.unwrap_err();
        assert!(matches!(err, RecordError::NotFound));

        let before = Utc::now();
        svc.update(created.id, input("u2", "Spotify", 299)).await.unwrap();
        let after = Utc::now();
        let updated = svc.get_by_id(created.id).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.user_id, "u2");
        assert_eq!(updated.service_name, "Spotify");
        assert_eq!(updated.price, 299);
        assert!(before <= updated.created_at && updated.created_at <= after);
    }

    #[tokio::test]
    async fn update_without_created_at_never_leaves_expiry_before_creation() {
        let (_, svc) = setup();
        let mut original = input("u1", "Netflix", 999);
        original.created_at = Some(day(100));
        original.expires_at = day(200);
        let created = svc.create(original).await.unwrap();

        let mut shorter = input("u1", "Netflix", 999);
        shorter.expires_at = day(50);
        svc.update(created.id, shorter).await.unwrap();

        let stored = svc.get_by_id(created.id).await.unwrap();
        assert!(stored.expires_at >= stored.created_at);
        assert!(stored.created_at <= Utc::now());
    }

    #[tokio::test]
    async fn delete_missing_is_not_found_and_delete_removes() {
        let (_, svc) = setup();
        assert!(matches!(svc.delete_by_id(42).await, Err(RecordError::NotFound)));

        let created = svc.create(input("u1", "Netflix", 999)).await.unwrap();
        svc.delete_by_id(created.id).await.unwrap();
        assert!(matches!(svc.get_by_id(created.id).await, Err(RecordError::NotFound)));
        assert!(matches!(svc.delete_by_id(created.id).await, Err(RecordError::NotFound)));
    }

    #[tokio::test]
    async fn unknown_user_has_no_records() {
        let (_, svc) = setup();
        svc.create(input("u1", "Netflix", 999)).await.unwrap();
        let rows = svc.get_by_user("nobody").await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(svc.get_by_user("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lookup_by_user_and_service() {
        let (_, svc) = setup();
        svc.create(input("u1", "Netflix", 999)).await.unwrap();
        let spotify = svc.create(input("u1", "Spotify", 299)).await.unwrap();

        let found = svc.get_by_user_and_service("u1", "Spotify").await.unwrap();
        assert_eq!(found.id, spotify.id);
        assert!(matches!(svc.get_by_user_and_service("u2", "Spotify").await, Err(RecordError::NotFound)));
    }

    #[tokio::test]
    async fn list_clamps_limit() {
        let (_, svc) = setup();
        for i in 0..105 {
            svc.create(input(&format!("u{}", i % 3), "Netflix", 100)).await.unwrap();
        }
        let unset = svc.list(Pagination::new(0, 0), RecordFilter::default()).await.unwrap();
        let twenty = svc.list(Pagination::new(20, 0), RecordFilter::default()).await.unwrap();
        assert_eq!(unset.len(), 20);
        assert_eq!(unset, twenty);

        let huge = svc.list(Pagination::new(150, 0), RecordFilter::default()).await.unwrap();
        let hundred = svc.list(Pagination::new(100, 0), RecordFilter::default()).await.unwrap();
        assert_eq!(huge.len(), 100);
        assert_eq!(huge, hundred);
    }

    #[tokio::test]
    async fn list_combines_filters_and_orders_newest_first() {
        let (_, svc) = setup();
        for (user, service, created) in [
            ("u1", "Netflix", "01-01-2026"),
            ("u1", "Spotify", "02-01-2026"),
            ("u1", "Netflix", "03-01-2026"),
            ("u2", "Netflix", "04-01-2026"),
        ] {
            let mut i = input(user, service, 100);
            i.created_at = Some(created.into());
            svc.create(i).await.unwrap();
        }

        let rows = svc.list(Pagination::default(), RecordFilter::new(Some("u1"), Some("Netflix"))).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].created_at > rows[1].created_at);

        let rows = svc.list(Pagination::default(), RecordFilter::new(Some(""), Some("Netflix"))).await.unwrap();
        assert_eq!(rows.len(), 3);

        let rows = svc.list(Pagination::new(2, 1), RecordFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].user_id, "u1");
        assert_eq!(rows[0].service_name, "Netflix");
    }

    #[tokio::test]
    async fn sum_without_matches_is_zero() {
        let (_, svc) = setup();
        svc.create(input("u1", "Netflix", 999)).await.unwrap();
        let period = Period::from_days("01-01-2000", "31-12-2000").unwrap();
        assert_eq!(svc.sum_for_period(period, RecordFilter::default()).await.unwrap(), 0);
        let period = Period::from_days(&day(0), &day(1)).unwrap();
        assert_eq!(svc.sum_for_period(period, RecordFilter::by_user("u9")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn netflix_subscription_is_summed_for_its_owner() {
        let (_, svc) = setup();
        let created = svc.create(input("u1", "Netflix", 999)).await.unwrap();
        assert_eq!(created.price, 999);
        svc.create(input("u2", "Netflix", 500)).await.unwrap();

        let period = Period::from_days(&day(0), &day(30)).unwrap();
        let total = svc.sum_for_period(period, RecordFilter::by_user("u1")).await.unwrap();
        assert_eq!(total, 999);
        let total = svc.sum_for_period(period, RecordFilter::new(None, Some("Netflix"))).await.unwrap();
        assert_eq!(total, 1499);
    }

    #[tokio::test]
    async fn sum_is_additive_over_adjacent_periods() {
        let (_, svc) = setup();
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        for d in 0..30 {
            let mut i = input("u1", "Netflix", 10 + d as i32);
            i.created_at = Some((start + Duration::days(d)).format(validation::DATE_FORMAT).to_string());
            svc.create(i).await.unwrap();
        }
        let mid = start + Duration::days(12);
        let end = start + Duration::days(29);
        let filter = RecordFilter::by_user("u1");

        let whole = svc.sum_for_period(Period::new(start, end), filter.clone()).await.unwrap();
        let left = svc.sum_for_period(Period::new(start, mid), filter.clone()).await.unwrap();
        let right = svc
            .sum_for_period(Period::new(mid + Duration::microseconds(1), end), filter)
            .await
            .unwrap();
        assert_eq!(left + right, whole);
        assert_eq!(whole, (10..40).sum::<i64>());
    }

    #[tokio::test]
    async fn store_failures_are_wrapped() {
        let (repo, svc) = setup();
        let created = svc.create(input("u1", "Netflix", 999)).await.unwrap();
        repo.fail_with("connection reset");

        let err = svc.create(input("u1", "Netflix", 999)).await.unwrap_err();
        assert!(matches!(err, RecordError::Persistence(RepositoryError::Db(ref m)) if m == "connection reset"));
        assert!(matches!(svc.get_by_id(created.id).await, Err(RecordError::Persistence(_))));
        assert!(matches!(svc.get_by_user("u1").await, Err(RecordError::Persistence(_))));
        assert!(matches!(svc.delete_by_id(created.id).await, Err(RecordError::Persistence(_))));
        assert!(matches!(
            svc.list(Pagination::default(), RecordFilter::default()).await,
            Err(RecordError::Persistence(_))
        ));

        let period = Period::from_days(&day(0), &day(1)).unwrap();
        let err = svc.sum_for_period(period, RecordFilter::default()).await.unwrap_err();
        assert!(matches!(err, RecordError::Aggregation(_)));
    }

    #[tokio::test]
    async fn works_behind_a_trait_object() {
        let repo: Arc<dyn RecordRepository> = Arc::new(MockRecordRepository::default());
        let svc: RecordService<dyn RecordRepository> = RecordService::new(repo);
        let created = svc.create(input("u1", "Netflix", 999)).await.unwrap();
        assert_eq!(svc.get_by_id(created.id).await.unwrap().id, created.id);
    }
}
