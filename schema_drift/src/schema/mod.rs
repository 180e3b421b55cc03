//! Schema module for schema_drift
//!
//! This module holds the schema data model, the column-type taxonomy, the
//! CREATE TABLE renderer and the diff engine. Everything here is pure
//! computation over immutable snapshots; database access lives in `crate::db`.

pub mod column_type;
pub mod ddl;
pub mod diff;
pub mod types;

// Re-export key types
pub use column_type::{ColumnType, WidthPolicy};
pub use ddl::{column_definition, render_schema, render_table};
pub use diff::{diff_schemas, diff_schemas_with, DiffOptions};
pub use types::{
    Column, ColumnBuilder, DatabaseSchema, Index, IndexDef, Key, KeyDef, Table, TableBuilder,
    UnresolvedMember,
};
