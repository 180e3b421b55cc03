//! MySQL schema introspection
//!
//! Loads a full [`DatabaseSchema`] snapshot from `information_schema`. This
//! is the metadata-acquisition boundary: it owns connection-level concerns
//! and the best-effort handling of optional metadata, and hands the pure core
//! a fully-resolved snapshot. Core validation errors (an unknown column type)
//! still propagate; only index lookup degrades to an empty list, logged.

use sqlx::{FromRow, MySqlPool};
use tracing::{debug, error};

use crate::error::Result;
use crate::schema::types::{Column, DatabaseSchema, IndexDef, KeyDef, Table};

/// Introspects one database (the pool's current schema) into a snapshot.
pub struct SchemaLoader<'a> {
    pool: &'a MySqlPool,
    table_prefix: Option<String>,
}

#[derive(FromRow)]
struct TableRow {
    table_name: String,
    table_type: String,
    table_comment: Option<String>,
    table_collation: Option<String>,
}

#[derive(FromRow)]
struct ColumnRow {
    column_name: String,
    data_type: String,
    column_type: String,
    character_maximum_length: Option<i64>,
    numeric_precision: Option<i64>,
    numeric_scale: Option<i64>,
    is_nullable: String,
    column_default: Option<String>,
    column_comment: String,
    extra: String,
    character_set_name: Option<String>,
    collation_name: Option<String>,
}

#[derive(FromRow)]
struct IndexRow {
    index_name: String,
    non_unique: i64,
    sort_order: Option<String>,
    column_name: String,
}

#[derive(FromRow)]
struct KeyColumnRow {
    column_name: String,
}

impl<'a> SchemaLoader<'a> {
    pub fn new(pool: &'a MySqlPool, table_prefix: Option<String>) -> Self {
        Self { pool, table_prefix }
    }

    /// Load every table and view of the pool's current database, in name
    /// order, with columns in ordinal position and index members in sequence
    /// position.
    pub async fn load(&self) -> Result<DatabaseSchema> {
        let sql = r#"
            SELECT TABLE_NAME AS table_name,
                   TABLE_TYPE AS table_type,
                   TABLE_COMMENT AS table_comment,
                   TABLE_COLLATION AS table_collation
            FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = DATABASE()
            ORDER BY TABLE_NAME
        "#;
        let table_rows = sqlx::query_as::<_, TableRow>(sql).fetch_all(self.pool).await?;

        let mut tables = Vec::with_capacity(table_rows.len());
        for row in table_rows {
            debug!(table = %row.table_name, "introspecting table");
            let mut builder = Table::builder(&row.table_name)
                .view(row.table_type.eq_ignore_ascii_case("VIEW"));
            if let Some(prefix) = &self.table_prefix {
                builder = builder.prefix(prefix.clone());
            }
            if let Some(comment) = row.table_comment.filter(|c| !c.is_empty()) {
                builder = builder.comment(comment);
            }
            if let Some(collation) = row.table_collation {
                builder = builder.collation(collation);
            }

            for column in self.load_columns(&row.table_name).await? {
                builder = builder.column(column);
            }
            for index in self.load_indexes(&row.table_name).await {
                builder = builder.index(index);
            }
            if let Some(key) = self.load_primary_key(&row.table_name).await? {
                builder = builder.primary_key(key);
            }

            tables.push(builder.build());
        }

        Ok(DatabaseSchema::new(tables))
    }

    async fn load_columns(&self, table_name: &str) -> Result<Vec<Column>> {
        let sql = r#"
            SELECT COLUMN_NAME AS column_name,
                   DATA_TYPE AS data_type,
                   COLUMN_TYPE AS column_type,
                   CAST(CHARACTER_MAXIMUM_LENGTH AS SIGNED) AS character_maximum_length,
                   CAST(NUMERIC_PRECISION AS SIGNED) AS numeric_precision,
                   CAST(NUMERIC_SCALE AS SIGNED) AS numeric_scale,
                   IS_NULLABLE AS is_nullable,
                   COLUMN_DEFAULT AS column_default,
                   COLUMN_COMMENT AS column_comment,
                   EXTRA AS extra,
                   CHARACTER_SET_NAME AS character_set_name,
                   COLLATION_NAME AS collation_name
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
        "#;
        let rows = sqlx::query_as::<_, ColumnRow>(sql)
            .bind(table_name)
            .fetch_all(self.pool)
            .await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            // COLUMN_TYPE carries the full spelling ("bigint(20) unsigned");
            // the model wants the keyword plus an UNSIGNED marker.
            let raw_type = if row.column_type.to_ascii_lowercase().contains("unsigned") {
                format!("{} UNSIGNED", row.data_type)
            } else {
                row.data_type
            };
            let size = row
                .character_maximum_length
                .or(row.numeric_precision)
                .unwrap_or(0) as u32;

            let mut builder = Column::builder(&row.column_name, raw_type)
                .size(size)
                .decimal_digits(row.numeric_scale.unwrap_or(0) as u32)
                .nullable(row.is_nullable.eq_ignore_ascii_case("YES"))
                .auto_increment(row.extra.to_ascii_lowercase().contains("auto_increment"));
            if let Some(default) = row.column_default {
                builder = builder.default_value(default);
            }
            if !row.column_comment.is_empty() {
                builder = builder.remarks(row.column_comment);
            }
            if let Some(character_set) = row.character_set_name {
                builder = builder.character_set(character_set);
            }
            if let Some(collation) = row.collation_name {
                builder = builder.collation(collation);
            }
            columns.push(builder.build()?);
        }
        Ok(columns)
    }

    /// Index lookup is best-effort: on failure the table is loaded without
    /// indexes rather than failing the whole snapshot.
    async fn load_indexes(&self, table_name: &str) -> Vec<IndexDef> {
        let sql = r#"
            SELECT INDEX_NAME AS index_name,
                   CAST(NON_UNIQUE AS SIGNED) AS non_unique,
                   COLLATION AS sort_order,
                   COLUMN_NAME AS column_name
            FROM information_schema.STATISTICS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY INDEX_NAME, SEQ_IN_INDEX
        "#;
        let rows = match sqlx::query_as::<_, IndexRow>(sql)
            .bind(table_name)
            .fetch_all(self.pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                error!(table = %table_name, error = %e, "failed to load table indexes");
                return Vec::new();
            }
        };

        let mut indexes: Vec<IndexDef> = Vec::new();
        for row in rows {
            if row.index_name.eq_ignore_ascii_case("PRIMARY") {
                continue;
            }
            if let Some(index) = indexes.iter_mut().find(|i| i.name == row.index_name) {
                index.columns.push(row.column_name);
            } else {
                let mut index =
                    IndexDef::new(row.index_name, row.non_unique == 0, vec![row.column_name]);
                if let Some(order) = row.sort_order {
                    index = index.sort_order(order);
                }
                indexes.push(index);
            }
        }
        indexes
    }

    async fn load_primary_key(&self, table_name: &str) -> Result<Option<KeyDef>> {
        let sql = r#"
            SELECT COLUMN_NAME AS column_name
            FROM information_schema.KEY_COLUMN_USAGE
            WHERE TABLE_SCHEMA = DATABASE()
              AND TABLE_NAME = ?
              AND CONSTRAINT_NAME = 'PRIMARY'
            ORDER BY ORDINAL_POSITION
        "#;
        let rows = sqlx::query_as::<_, KeyColumnRow>(sql)
            .bind(table_name)
            .fetch_all(self.pool)
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }
        let columns = rows.into_iter().map(|r| r.column_name).collect();
        Ok(Some(KeyDef::new("PRIMARY", columns)))
    }
}
