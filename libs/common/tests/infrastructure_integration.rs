//! Integration tests against live PostgreSQL and Redis instances
//!
//! Run with `cargo test -- --ignored` once `DATABASE_URL` and `REDIS_URL`
//! point at reachable services.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool},
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires running PostgreSQL and Redis"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    health_check(&pool).await?;

    let row = sqlx::query("SELECT ARRAY[]::uuid[] AS items")
        .fetch_one(&pool)
        .await?;
    let items: Vec<sqlx::types::Uuid> = row.get("items");
    assert!(items.is_empty(), "Empty uuid[] should decode to an empty Vec");

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;
    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let key = "fresho:integration_test_key";
    redis_pool.set(key, "integration_test_value", Some(10)).await?;
    assert_eq!(
        redis_pool.get(key).await?,
        Some("integration_test_value".to_string()),
        "Redis SET/GET test failed"
    );

    redis_pool.delete(key).await?;
    assert_eq!(redis_pool.get(key).await?, None, "Redis delete failed");

    Ok(())
}
