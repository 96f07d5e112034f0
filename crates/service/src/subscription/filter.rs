//! Predicate builder shared by the list and total queries.
//!
//! A [`SubscriptionFilter`] expands into an ordered list of [`Predicate`]s. The
//! SeaORM repository folds them into one `Condition` (values are always bound as
//! parameters); the in-memory repository evaluates the same list row by row.

use chrono::NaiveDate;
use models::period::{parse_month, MONTH_FORMAT};
use models::subscription::{self, Column};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, Select};
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use super::domain::ListQuery;
use crate::errors::ServiceError;

/// Typed criteria narrowing list and total operations. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    /// Keep subscriptions still active in or after this month.
    pub start_month: Option<NaiveDate>,
    /// Keep subscriptions that started in or before this month.
    pub end_month: Option<NaiveDate>,
}

/// One AND-ed condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    UserIdEq(Uuid),
    ServiceNameEq(String),
    ActiveSince(NaiveDate),
    StartedBy(NaiveDate),
}

impl Predicate {
    pub fn to_condition(&self) -> Condition {
        match self {
            Predicate::UserIdEq(id) => Condition::all().add(Column::UserId.eq(*id)),
            Predicate::ServiceNameEq(name) => Condition::all().add(Column::ServiceName.eq(name.clone())),
            Predicate::ActiveSince(month) => Condition::any()
                .add(Column::EndDate.is_null())
                .add(Column::EndDate.gte(*month)),
            Predicate::StartedBy(month) => Condition::all().add(Column::StartDate.lte(*month)),
        }
    }

    pub fn matches(&self, row: &subscription::Model) -> bool {
        match self {
            Predicate::UserIdEq(id) => row.user_id == *id,
            Predicate::ServiceNameEq(name) => row.service_name == *name,
            Predicate::ActiveSince(month) => row.end_date.map_or(true, |end| end >= *month),
            Predicate::StartedBy(month) => row.start_date <= *month,
        }
    }
}

impl SubscriptionFilter {
    /// Parse raw query parameters, treating empty strings as absent.
    pub fn from_query(q: &ListQuery) -> Result<Self, ServiceError> {
        let user_id = match non_empty(&q.user_id) {
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| ServiceError::invalid("invalid user_id format, expected UUID"))?),
            None => None,
        };
        let start_month = parse_bound("start_month", &q.start_month)?;
        let end_month = parse_bound("end_month", &q.end_month)?;
        Ok(Self {
            user_id,
            service_name: non_empty(&q.service_name).map(str::to_string),
            start_month,
            end_month,
        })
    }

    /// Predicates in the order their placeholders are numbered.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if let Some(id) = self.user_id { out.push(Predicate::UserIdEq(id)); }
        if let Some(name) = &self.service_name { out.push(Predicate::ServiceNameEq(name.clone())); }
        if let Some(m) = self.start_month { out.push(Predicate::ActiveSince(m)); }
        if let Some(m) = self.end_month { out.push(Predicate::StartedBy(m)); }
        out
    }

    pub fn condition(&self) -> Condition {
        self.predicates()
            .iter()
            .fold(Condition::all(), |cond, p| cond.add(p.to_condition()))
    }

    pub fn matches(&self, row: &subscription::Model) -> bool {
        self.predicates().iter().all(|p| p.matches(row))
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

fn parse_bound(field: &str, raw: &Option<String>) -> Result<Option<NaiveDate>, ServiceError> {
    match non_empty(raw) {
        Some(s) => parse_month(s)
            .map(Some)
            .map_err(|_| ServiceError::invalid(format!("invalid {field} format, expected {MONTH_FORMAT}"))),
        None => Ok(None),
    }
}

/// `SELECT * FROM subscriptions WHERE <filter>`
pub fn list_select(filter: &SubscriptionFilter) -> Select<subscription::Entity> {
    subscription::Entity::find().filter(filter.condition())
}

/// `SELECT COALESCE(SUM(price), 0) FROM subscriptions WHERE <filter>`
pub fn total_select(filter: &SubscriptionFilter) -> Select<subscription::Entity> {
    subscription::Entity::find()
        .select_only()
        .column_as(Expr::cust("COALESCE(SUM(\"price\"), 0)::BIGINT"), "total")
        .filter(filter.condition())
}
