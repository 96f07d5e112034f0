use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait};
use tracing::debug;
use uuid::Uuid;

use models::subscription::{self, Model as Subscription};

use crate::errors::ServiceError;
use crate::subscription::filter::{list_select, total_select, SubscriptionFilter};
use crate::subscription::repository::SubscriptionRepository;

/// SeaORM-backed repository over the `subscriptions` table.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn insert(&self, sub: &Subscription) -> Result<(), ServiceError> {
        subscription::Entity::insert(sub.to_insert_model()).exec_without_returning(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Subscription>, ServiceError> {
        Ok(subscription::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn update(&self, sub: &Subscription) -> Result<Subscription, ServiceError> {
        match sub.to_update_model().update(&self.db).await {
            Ok(m) => Ok(m),
            Err(DbErr::RecordNotUpdated) => Err(ServiceError::not_found("subscription")),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ServiceError> {
        let res = subscription::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    async fn list(&self, filter: &SubscriptionFilter) -> Result<Vec<Subscription>, ServiceError> {
        let rows = list_select(filter).all(&self.db).await?;
        debug!(count = rows.len(), "subscriptions listed");
        Ok(rows)
    }

    async fn total_price(&self, filter: &SubscriptionFilter) -> Result<i64, ServiceError> {
        let total = total_select(filter)
            .into_tuple::<i64>()
            .one(&self.db)
            .await?;
        Ok(total.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::{NaiveDate, SubsecRound, Utc};

    fn sample(user_id: Uuid, name: &str, price: i32) -> Subscription {
        let now = Utc::now().trunc_subsecs(6).into();
        Subscription {
            id: Uuid::new_v4(),
            service_name: name.into(),
            price,
            user_id,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn seaorm_repository_round_trip() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmSubscriptionRepository { db };

        let sub = sample(Uuid::new_v4(), "Netflix", 999);
        repo.insert(&sub).await?;
        assert_eq!(repo.find_by_id(sub.id).await?, Some(sub.clone()));

        let mut changed = sub.clone();
        changed.price = 1099;
        let updated = repo.update(&changed).await?;
        assert_eq!(updated.price, 1099);
        assert_eq!(updated.service_name, "Netflix");

        assert_eq!(repo.delete(sub.id).await?, 1);
        assert_eq!(repo.delete(sub.id).await?, 0);
        assert!(repo.find_by_id(sub.id).await?.is_none());
        assert!(matches!(repo.update(&changed).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_total_matches_listed_prices() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmSubscriptionRepository { db };

        let user = Uuid::new_v4();
        repo.insert(&sample(user, "Netflix", 999)).await?;
        repo.insert(&sample(user, "Spotify", 299)).await?;
        repo.insert(&sample(Uuid::new_v4(), "Netflix", 999)).await?;

        let filter = SubscriptionFilter { user_id: Some(user), ..Default::default() };
        assert_eq!(repo.total_price(&filter).await?, 1298);
        let listed: i64 = repo.list(&filter).await?.iter().map(|r| i64::from(r.price)).sum();
        assert_eq!(listed, 1298);

        let nobody = SubscriptionFilter { user_id: Some(Uuid::new_v4()), ..Default::default() };
        assert!(repo.list(&nobody).await?.is_empty());
        assert_eq!(repo.total_price(&nobody).await?, 0);
        Ok(())
    }
}
