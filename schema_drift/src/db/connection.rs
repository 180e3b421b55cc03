//! Database connection handling

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Open a MySQL connection pool from configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<MySqlPool> {
    let pool_size = config.pool_size.unwrap_or(10);
    let timeout_seconds = config.timeout_seconds.unwrap_or(30);

    let pool = MySqlPoolOptions::new()
        .max_connections(pool_size)
        .acquire_timeout(std::time::Duration::from_secs(timeout_seconds))
        .connect(&config.url)
        .await?;

    Ok(pool)
}
