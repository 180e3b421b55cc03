//! schema_drift: MySQL schema introspection and drift scripting
//!
//! schema_drift snapshots a MySQL database's schema through
//! `information_schema`, renders it as canonical CREATE TABLE DDL, and
//! compares an authoritative schema against a live one to produce an ALTER
//! script that brings the live database up to date. The generated script is
//! additive by default: it never drops tables or columns unless explicitly
//! allowed, while indexes and primary keys are reconciled in both directions.

pub mod config;
pub mod db;
pub mod error;
pub mod schema;
pub mod utils;

// Re-export main types for easier access
pub use config::Config;
pub use db::cache::SchemaCache;
pub use db::introspect::SchemaLoader;
pub use error::{Error, Result};
pub use schema::ddl::render_schema;
pub use schema::diff::{diff_schemas, diff_schemas_with, DiffOptions};
pub use schema::types::DatabaseSchema;

use sqlx::MySqlPool;

/// Initialize schema_drift with the specified configuration file
pub async fn init(config_path: &str) -> Result<DriftClient> {
    let config = config::load_from_file(config_path)?;
    utils::logging::init_logging(&config.logging)?;
    DriftClient::new(config).await
}

/// The main client for snapshotting databases and scripting drift between
/// them. The source database holds the authoritative schema; the optional
/// target is the database to be brought in line with it.
pub struct DriftClient {
    config: Config,
    source_pool: MySqlPool,
    target_pool: Option<MySqlPool>,
    cache: SchemaCache,
}

impl DriftClient {
    /// Create a new client from configuration
    pub async fn new(config: Config) -> Result<Self> {
        let source_pool = db::connection::connect(&config.source).await?;
        let target_pool = match &config.target {
            Some(target) => Some(db::connection::connect(target).await?),
            None => None,
        };

        Ok(Self {
            config,
            source_pool,
            target_pool,
            cache: SchemaCache::new(),
        })
    }

    /// Snapshot the source database, reusing a cached snapshot when present.
    pub async fn snapshot_source(&mut self) -> Result<DatabaseSchema> {
        let url = self.config.source.url.clone();
        if let Some(cached) = self.cache.get(&url) {
            tracing::debug!(url = %url, "using cached source snapshot");
            return Ok(cached.clone());
        }

        let loader =
            SchemaLoader::new(&self.source_pool, self.config.schema.table_prefix.clone());
        let snapshot = loader.load().await?;
        self.cache.insert(url, snapshot.clone());
        Ok(snapshot)
    }

    /// Snapshot the target database. Errors if no target is configured.
    pub async fn snapshot_target(&mut self) -> Result<DatabaseSchema> {
        let target = self.config.target.as_ref().ok_or_else(|| {
            Error::ConfigError("no [target] database configured".to_string())
        })?;
        let pool = self.target_pool.as_ref().ok_or_else(|| {
            Error::ConfigError("no [target] database configured".to_string())
        })?;

        let url = target.url.clone();
        if let Some(cached) = self.cache.get(&url) {
            tracing::debug!(url = %url, "using cached target snapshot");
            return Ok(cached.clone());
        }

        let loader = SchemaLoader::new(pool, self.config.schema.table_prefix.clone());
        let snapshot = loader.load().await?;
        self.cache.insert(url, snapshot.clone());
        Ok(snapshot)
    }

    /// Render the source database's full schema as CREATE TABLE DDL.
    pub async fn render_source_ddl(&mut self) -> Result<String> {
        let snapshot = self.snapshot_source().await?;
        Ok(schema::ddl::render_schema(&snapshot))
    }

    /// Produce the ALTER script that brings the target database in line with
    /// the source. Removal flags come from the `[schema]` configuration.
    pub async fn drift_script(&mut self) -> Result<String> {
        let from = self.snapshot_source().await?;
        let to = self.snapshot_target().await?;

        let options = DiffOptions {
            allow_column_removal: self.config.schema.allow_column_removal,
            allow_table_removal: self.config.schema.allow_table_removal,
        };
        let script = schema::diff::diff_schemas_with(&from, &to, &options);

        if script.is_empty() {
            tracing::info!("target schema is already in line with source");
        }
        Ok(script)
    }

    /// Forget cached snapshots so the next call re-introspects.
    pub fn invalidate_snapshots(&mut self) {
        self.cache.clear();
    }
}
