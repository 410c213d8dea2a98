use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub created_at: DateTimeWithTimeZone,
    pub expires_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_service_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("service_name must not be empty".into()));
    }
    if name.len() > 255 {
        return Err(errors::ModelError::Validation("service_name must be at most 255 bytes".into()));
    }
    Ok(())
}

pub fn validate_user_id(user_id: &str) -> Result<(), errors::ModelError> {
    if user_id.trim().is_empty() {
        return Err(errors::ModelError::Validation("user_id must not be empty".into()));
    }
    if user_id.len() > 255 {
        return Err(errors::ModelError::Validation("user_id must be at most 255 bytes".into()));
    }
    Ok(())
}

pub fn validate_price(price: i32) -> Result<(), errors::ModelError> {
    if price < 0 {
        return Err(errors::ModelError::Validation(format!("price must be >= 0, got {price}")));
    }
    Ok(())
}
