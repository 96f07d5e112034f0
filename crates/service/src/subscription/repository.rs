use async_trait::async_trait;
use uuid::Uuid;

use models::subscription::Model as Subscription;

use super::filter::SubscriptionFilter;
use crate::errors::ServiceError;

/// Storage abstraction; one statement per call, no business validation.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn insert(&self, sub: &Subscription) -> Result<(), ServiceError>;
    /// `Ok(None)` when no row has this id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>, ServiceError>;
    /// Overwrites every mutable column with the values in `sub`.
    async fn update(&self, sub: &Subscription) -> Result<Subscription, ServiceError>;
    /// Number of rows removed (0 or 1).
    async fn delete(&self, id: Uuid) -> Result<u64, ServiceError>;
    async fn list(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, ServiceError>;
    /// `SUM(price)` over the rows `list` would return; 0 when none match.
    async fn total_price(&self, filter: &SubscriptionFilter) -> Result<i64, ServiceError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct InMemorySubscriptionRepository {
        rows: Mutex<Vec<Subscription>>, // insertion order stands in for storage order
        broken: bool,
    }

    impl InMemorySubscriptionRepository {
        /// Repository whose every call fails with a storage error.
        pub fn broken() -> Self {
            Self { rows: Mutex::default(), broken: true }
        }

        fn rows(&self) -> Result<MutexGuard<'_, Vec<Subscription>>, ServiceError> {
            if self.broken {
                return Err(ServiceError::Storage("connection refused".into()));
            }
            self.rows.lock().map_err(|_| ServiceError::Storage("repository lock poisoned".into()))
        }
    }

    #[async_trait]
    impl SubscriptionRepository for InMemorySubscriptionRepository {
        async fn insert(&self, sub: &Subscription) -> Result<(), ServiceError> {
            let mut rows = self.rows()?;
            if rows.iter().any(|r| r.id == sub.id) {
                return Err(ServiceError::Storage("duplicate key value violates unique constraint \"subscriptions_pkey\"".into()));
            }
            rows.push(sub.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>, ServiceError> {
            Ok(self.rows()?.iter().find(|r| r.id == id).cloned())
        }

        async fn update(&self, sub: &Subscription) -> Result<Subscription, ServiceError> {
            let mut rows = self.rows()?;
            let Some(row) = rows.iter_mut().find(|r| r.id == sub.id) else {
                return Err(ServiceError::not_found("subscription"));
            };
            row.service_name = sub.service_name.clone();
            row.price = sub.price;
            row.start_date = sub.start_date;
            row.end_date = sub.end_date;
            row.updated_at = sub.updated_at;
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<u64, ServiceError> {
            let mut rows = self.rows()?;
            let before = rows.len();
            rows.retain(|r| r.id != id);
            Ok((before - rows.len()) as u64)
        }

        async fn list(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, ServiceError> {
            Ok(self.rows()?.iter().filter(|r| filter.matches(r)).cloned().collect())
        }

        async fn total_price(&self, filter: &SubscriptionFilter) -> Result<i64, ServiceError> {
            Ok(self.rows()?.iter().filter(|r| filter.matches(r)).map(|r| i64::from(r.price)).sum())
        }
    }
}
