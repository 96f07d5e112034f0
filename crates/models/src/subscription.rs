use sea_orm::{entity::prelude::*, ActiveValue::NotSet, Set, Unchanged};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    #[serde(with = "crate::period::month")]
    pub start_date: Date,
    #[serde(default, with = "crate::period::month_opt", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_service_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("service_name must not be empty".into()));
    }
    Ok(())
}

/// Price is kept in the smallest currency unit and must fit the INTEGER column.
pub fn validate_price(price: i64) -> Result<i32, errors::ModelError> {
    if price < 0 {
        return Err(errors::ModelError::Validation("price must be a non-negative integer".into()));
    }
    i32::try_from(price).map_err(|_| errors::ModelError::Validation(format!("price must not exceed {}", i32::MAX)))
}

impl Model {
    /// Every column set, ready for `INSERT`.
    pub fn to_insert_model(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id),
            service_name: Set(self.service_name.clone()),
            price: Set(self.price),
            user_id: Set(self.user_id),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }

    /// Mutable columns set, keyed by `id`; `user_id` and `created_at` never change.
    pub fn to_update_model(&self) -> ActiveModel {
        ActiveModel {
            id: Unchanged(self.id),
            service_name: Set(self.service_name.clone()),
            price: Set(self.price),
            user_id: NotSet,
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            created_at: NotSet,
            updated_at: Set(self.updated_at),
        }
    }
}
