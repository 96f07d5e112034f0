use std::sync::Arc;

use chrono::{NaiveDate, SubsecRound, Utc};
use common::utils::logging::Logger;
use models::period::{parse_month, MONTH_FORMAT};
use models::subscription::{self, Model as Subscription};
use sea_orm::prelude::DateTimeWithTimeZone;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::domain::{CreateSubscriptionInput, ListQuery, TotalCost, UpdateSubscriptionInput};
use super::filter::SubscriptionFilter;
use super::repository::SubscriptionRepository;
use crate::errors::ServiceError;

/// Subscription business service independent of web framework.
///
/// Validates raw requests, converts between the `MM-YYYY` wire format and
/// stored dates, and classifies every failure as a [`ServiceError`].
pub struct SubscriptionService<R: SubscriptionRepository + ?Sized> {
    repo: Arc<R>,
    log: Logger,
}

/// Service over a type-erased repository, as held by the HTTP state.
pub type DynSubscriptionService = SubscriptionService<dyn SubscriptionRepository>;

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    pub fn new(repo: Arc<R>, log: Logger) -> Self { Self { repo, log } }

    /// Validate a create request and persist a new subscription.
    ///
    /// # Examples
    /// ```
    /// use service::subscription::{SubscriptionService, domain::CreateSubscriptionInput, repository::mock::InMemorySubscriptionRepository};
    /// use common::utils::logging::Logger;
    /// use std::sync::Arc;
    /// let svc = SubscriptionService::new(Arc::new(InMemorySubscriptionRepository::default()), Logger::disabled());
    /// let input = CreateSubscriptionInput {
    ///     service_name: Some("Netflix".into()),
    ///     price: Some(999),
    ///     user_id: Some("60601fee-2bf1-4721-ae6f-7636e79a0cba".into()),
    ///     start_date: Some("07-2025".into()),
    ///     end_date: None,
    /// };
    /// let sub = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(sub.price, 999);
    /// assert_eq!(sub.created_at, sub.updated_at);
    /// ```
    #[instrument(parent = self.log.span(), skip_all, fields(service_name = ?input.service_name))]
    pub async fn create(&self, input: CreateSubscriptionInput) -> Result<Subscription, ServiceError> {
        let service_name = match input.service_name {
            Some(name) if subscription::validate_service_name(&name).is_ok() => name,
            _ => return Err(rejected("service_name is required")),
        };
        let price = match input.price {
            Some(p) => subscription::validate_price(p).map_err(|e| rejected(e.to_string()))?,
            None => return Err(rejected("price is required")),
        };
        let user_id = match input.user_id.as_deref() {
            Some(raw) if !raw.is_empty() => Uuid::parse_str(raw).map_err(|_| rejected("invalid user_id format, expected UUID"))?,
            _ => return Err(rejected("user_id is required")),
        };
        let start_date = match input.start_date.as_deref() {
            Some(raw) if !raw.is_empty() => month_field("start_date", raw)?,
            _ => return Err(rejected(format!("start_date is required, expected {MONTH_FORMAT}"))),
        };
        let end_date = match input.end_date.as_deref() {
            Some(raw) if !raw.is_empty() => Some(month_field("end_date", raw)?),
            _ => None,
        };

        let now = now();
        let sub = Subscription {
            id: Uuid::new_v4(),
            service_name,
            price,
            user_id,
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        };
        self.repo.insert(&sub).await.inspect_err(|e| error!(error = %e, "failed to create subscription"))?;
        info!(id = %sub.id, user_id = %sub.user_id, "subscription created");
        Ok(sub)
    }

    #[instrument(parent = self.log.span(), skip(self))]
    pub async fn get(&self, id: &str) -> Result<Subscription, ServiceError> {
        let id = parse_id(id)?;
        self.load(id).await
    }

    /// Apply a partial update; `updated_at` is refreshed even when nothing else changes.
    #[instrument(parent = self.log.span(), skip(self, input))]
    pub async fn update(&self, id: &str, input: UpdateSubscriptionInput) -> Result<Subscription, ServiceError> {
        let id = parse_id(id)?;
        let mut sub = self.load(id).await?;

        // "" keeps the stored name; whitespace-only is rejected like on create
        match input.service_name {
            None => {}
            Some(name) if name.is_empty() => {}
            Some(name) => {
                subscription::validate_service_name(&name).map_err(|e| rejected(e.to_string()))?;
                sub.service_name = name;
            }
        }
        if let Some(p) = input.price {
            sub.price = subscription::validate_price(p).map_err(|e| rejected(e.to_string()))?;
        }
        if let Some(raw) = input.start_date.as_deref().filter(|s| !s.is_empty()) {
            sub.start_date = month_field("start_date", raw)?;
        }
        if let Some(raw) = input.end_date.as_deref() {
            sub.end_date = if raw.is_empty() { None } else { Some(month_field("end_date", raw)?) };
        }
        sub.updated_at = now().max(sub.created_at);

        let saved = self.repo.update(&sub).await.inspect_err(|e| error!(error = %e, "failed to update subscription"))?;
        info!(id = %saved.id, "subscription updated");
        Ok(saved)
    }

    /// Idempotent: deleting an unknown id succeeds.
    #[instrument(parent = self.log.span(), skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id)?;
        let removed = self.repo.delete(id).await.inspect_err(|e| error!(error = %e, "failed to delete subscription"))?;
        info!(%id, removed, "subscription deleted");
        Ok(())
    }

    #[instrument(parent = self.log.span(), skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Subscription>, ServiceError> {
        let filter = self.filter(query)?;
        self.repo.list(&filter).await.inspect_err(|e| error!(error = %e, "failed to list subscriptions"))
    }

    #[instrument(parent = self.log.span(), skip(self))]
    pub async fn total_cost(&self, query: &ListQuery) -> Result<TotalCost, ServiceError> {
        let filter = self.filter(query)?;
        let total = self.repo.total_price(&filter).await.inspect_err(|e| error!(error = %e, "failed to get total cost"))?;
        Ok(TotalCost { total })
    }

    fn filter(&self, query: &ListQuery) -> Result<SubscriptionFilter, ServiceError> {
        SubscriptionFilter::from_query(query).inspect_err(|e| warn!(error = %e, "rejected filter"))
    }

    async fn load(&self, id: Uuid) -> Result<Subscription, ServiceError> {
        self.repo
            .find_by_id(id)
            .await
            .inspect_err(|e| error!(error = %e, "failed to get subscription"))?
            .ok_or_else(|| ServiceError::not_found("subscription"))
    }
}

/// Current time at the precision the database keeps.
fn now() -> DateTimeWithTimeZone {
    Utc::now().trunc_subsecs(6).into()
}

fn rejected(msg: impl Into<String>) -> ServiceError {
    let e = ServiceError::invalid(msg);
    warn!(error = %e, "rejected request");
    e
}

fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| rejected("invalid id format, expected UUID"))
}

fn month_field(field: &str, raw: &str) -> Result<NaiveDate, ServiceError> {
    parse_month(raw).map_err(|_| rejected(format!("invalid {field} format, expected {MONTH_FORMAT}")))
}
