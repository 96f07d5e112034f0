#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// Fresh connection for the current test, or `None` when no database is configured.
pub async fn get_db() -> Result<Option<DatabaseConnection>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(None);
    }
    let migrated = *MIGRATED
        .get_or_init(|| async {
            match connect().await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(_) => false,
            }
        })
        .await;
    if !migrated {
        return Err(anyhow::anyhow!("database configured but migrations failed"));
    }
    Ok(Some(connect().await?))
}
