use chrono::{DateTime, Utc};
use models::record;
use sea_orm::{
    prelude::DateTimeWithTimeZone,
    sea_query::Expr,
    ActiveModelTrait, ActiveValue::{NotSet, Set}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::errors::RepositoryError;
use crate::pagination::Page;
use crate::record::domain::{Period, RecordDraft, RecordFilter};
use crate::record::repository::RecordRepository;

/// SeaORM-backed repository implementation. Every call is one statement.
#[derive(Clone)]
pub struct SeaOrmRecordRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRecordRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn db_time(t: DateTime<Utc>) -> DateTimeWithTimeZone { t.fixed_offset() }

/// Append a predicate per present filter; absent filters add nothing.
fn filtered(mut select: Select<record::Entity>, filter: &RecordFilter) -> Select<record::Entity> {
    if let Some(user_id) = &filter.user_id {
        select = select.filter(record::Column::UserId.eq(user_id.as_str()));
    }
    if let Some(service_name) = &filter.service_name {
        select = select.filter(record::Column::ServiceName.eq(service_name.as_str()));
    }
    select
}

#[async_trait::async_trait]
impl RecordRepository for SeaOrmRecordRepository {
    async fn save(&self, draft: &RecordDraft) -> Result<record::Model, RepositoryError> {
        let am = record::ActiveModel {
            id: NotSet,
            service_name: Set(draft.service_name.clone()),
            price: Set(draft.price),
            user_id: Set(draft.user_id.clone()),
            created_at: match draft.created_at {
                Some(t) => Set(db_time(t)),
                None => NotSet,
            },
            expires_at: Set(db_time(draft.expires_at)),
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError> {
        let res = record::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<record::Model>, RepositoryError> {
        Ok(record::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<record::Model>, RepositoryError> {
        let rows = record::Entity::find()
            .filter(record::Column::UserId.eq(user_id))
            .order_by_desc(record::Column::CreatedAt)
            .order_by_desc(record::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_by_user_and_service(&self, user_id: &str, service_name: &str) -> Result<Option<record::Model>, RepositoryError> {
        let row = record::Entity::find()
            .filter(record::Column::UserId.eq(user_id))
            .filter(record::Column::ServiceName.eq(service_name))
            .order_by_asc(record::Column::Id)
            .one(&self.db)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, draft: &RecordDraft) -> Result<bool, RepositoryError> {
        let mut stmt = record::Entity::update_many()
            .col_expr(record::Column::ServiceName, Expr::value(draft.service_name.clone()))
            .col_expr(record::Column::Price, Expr::value(draft.price))
            .col_expr(record::Column::UserId, Expr::value(draft.user_id.clone()))
            .col_expr(record::Column::ExpiresAt, Expr::value(db_time(draft.expires_at)));
        if let Some(created_at) = draft.created_at {
            stmt = stmt.col_expr(record::Column::CreatedAt, Expr::value(db_time(created_at)));
        }
        let res = stmt.filter(record::Column::Id.eq(id)).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn list(&self, filter: &RecordFilter, page: Page) -> Result<Vec<record::Model>, RepositoryError> {
        let mut select = filtered(record::Entity::find(), filter)
            .order_by_desc(record::Column::CreatedAt)
            .order_by_desc(record::Column::Id)
            .limit(page.limit);
        if let Some(offset) = page.effective_offset() {
            select = select.offset(offset);
        }
        Ok(select.all(&self.db).await?)
    }

    async fn sum_for_period(&self, period: &Period, filter: &RecordFilter) -> Result<i64, RepositoryError> {
        let total: Option<Option<i64>> = filtered(record::Entity::find(), filter)
            .filter(record::Column::CreatedAt.between(db_time(period.start), db_time(period.end)))
            .select_only()
            .column_as(record::Column::Price.sum(), "total")
            .into_tuple::<Option<i64>>()
            .one(&self.db)
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }
}
