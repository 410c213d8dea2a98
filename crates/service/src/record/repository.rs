use async_trait::async_trait;
use models::record;

use super::domain::{Period, RecordDraft, RecordFilter};
use crate::errors::RepositoryError;
use crate::pagination::Page;

/// Persistence gateway for records.
///
/// Pure translation to the store: no validation happens here. Single-row
/// operations report "nothing matched" through `Option` / `false` so the
/// service can map it to `NotFound`.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn save(&self, draft: &RecordDraft) -> Result<record::Model, RepositoryError>;
    /// `false` when no row had that id.
    async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<record::Model>, RepositoryError>;
    async fn get_by_user(&self, user_id: &str) -> Result<Vec<record::Model>, RepositoryError>;
    async fn get_by_user_and_service(&self, user_id: &str, service_name: &str) -> Result<Option<record::Model>, RepositoryError>;
    /// `false` when no row had that id.
    async fn update(&self, id: i64, draft: &RecordDraft) -> Result<bool, RepositoryError>;
    /// Newest first (`created_at DESC, id DESC`).
    async fn list(&self, filter: &RecordFilter, page: Page) -> Result<Vec<record::Model>, RepositoryError>;
    /// Sum of `price` over rows with `created_at` inside `period`; `0` when none match.
    async fn sum_for_period(&self, period: &Period, filter: &RecordFilter) -> Result<i64, RepositoryError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::{DateTime, Utc};
    use sea_orm::prelude::DateTimeWithTimeZone;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockRecordRepository {
        rows: Mutex<BTreeMap<i64, record::Model>>, // key: id
        last_id: Mutex<i64>,
        failure: Mutex<Option<String>>,
    }

    impl MockRecordRepository {
        /// Make every subsequent call fail with a store error.
        pub fn fail_with(&self, message: &str) {
            if let Ok(mut f) = self.failure.lock() {
                *f = Some(message.to_string());
            }
        }

        pub fn len(&self) -> usize {
            self.rows.lock().map(|r| r.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        fn rows(&self) -> Result<MutexGuard<'_, BTreeMap<i64, record::Model>>, RepositoryError> {
            if let Some(msg) = self.failure.lock().map_err(poisoned)?.clone() {
                return Err(RepositoryError::Db(msg));
            }
            self.rows.lock().map_err(poisoned)
        }

        fn next_id(&self) -> Result<i64, RepositoryError> {
            let mut last = self.last_id.lock().map_err(poisoned)?;
            *last += 1;
            Ok(*last)
        }
    }

    fn poisoned<T>(_: T) -> RepositoryError {
        RepositoryError::Db("mock repository lock poisoned".into())
    }

    fn db_time(t: DateTime<Utc>) -> DateTimeWithTimeZone { t.fixed_offset() }

    fn matches(row: &record::Model, filter: &RecordFilter) -> bool {
        filter.user_id.as_deref().map_or(true, |u| row.user_id == u)
            && filter.service_name.as_deref().map_or(true, |s| row.service_name == s)
    }

    fn newest_first(rows: &mut [record::Model]) {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    }

    #[async_trait]
    impl RecordRepository for MockRecordRepository {
        async fn save(&self, draft: &RecordDraft) -> Result<record::Model, RepositoryError> {
            let mut rows = self.rows()?;
            let id = self.next_id()?;
            let model = record::Model {
                id,
                service_name: draft.service_name.clone(),
                price: draft.price,
                user_id: draft.user_id.clone(),
                created_at: db_time(draft.created_at.unwrap_or_else(Utc::now)),
                expires_at: db_time(draft.expires_at),
            };
            rows.insert(id, model.clone());
            Ok(model)
        }

        async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError> {
            Ok(self.rows()?.remove(&id).is_some())
        }

        async fn get_by_id(&self, id: i64) -> Result<Option<record::Model>, RepositoryError> {
            Ok(self.rows()?.get(&id).cloned())
        }

        async fn get_by_user(&self, user_id: &str) -> Result<Vec<record::Model>, RepositoryError> {
            let mut found: Vec<_> = self.rows()?.values().filter(|r| r.user_id == user_id).cloned().collect();
            newest_first(&mut found);
            Ok(found)
        }

        async fn get_by_user_and_service(&self, user_id: &str, service_name: &str) -> Result<Option<record::Model>, RepositoryError> {
            Ok(self
                .rows()?
                .values()
                .find(|r| r.user_id == user_id && r.service_name == service_name)
                .cloned())
        }

        async fn update(&self, id: i64, draft: &RecordDraft) -> Result<bool, RepositoryError> {
            let mut rows = self.rows()?;
            let Some(row) = rows.get_mut(&id) else { return Ok(false) };
            row.service_name = draft.service_name.clone();
            row.price = draft.price;
            row.user_id = draft.user_id.clone();
            row.expires_at = db_time(draft.expires_at);
            if let Some(c) = draft.created_at {
                row.created_at = db_time(c);
            }
            Ok(true)
        }

        async fn list(&self, filter: &RecordFilter, page: Page) -> Result<Vec<record::Model>, RepositoryError> {
            let mut found: Vec<_> = self.rows()?.values().filter(|r| matches(r, filter)).cloned().collect();
            newest_first(&mut found);
            let skip = page.effective_offset().unwrap_or(0) as usize;
            Ok(found.into_iter().skip(skip).take(page.limit as usize).collect())
        }

        async fn sum_for_period(&self, period: &Period, filter: &RecordFilter) -> Result<i64, RepositoryError> {
            Ok(self
                .rows()?
                .values()
                .filter(|r| matches(r, filter) && period.contains(r.created_at.with_timezone(&Utc)))
                .map(|r| i64::from(r.price))
                .sum())
        }
    }
}
