
/// Skip helper shared by the database-backed tests
pub(crate) async fn test_db() -> anyhow::Result<Option<sea_orm::DatabaseConnection>> {
    use migration::MigratorTrait;

    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip: DATABASE_URL missing or SKIP_DB_TESTS set");
        return Ok(None);
    }
    let db = crate::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Some(db))
}
