//! CREATE TABLE renderer
//!
//! Deterministic text rendering of a schema snapshot to MySQL DDL: backtick
//! identifiers, `ENGINE=InnoDB DEFAULT CHARSET=utf8`. Column definitions are
//! rendered here and reused verbatim by the diff engine, which compares the
//! rendered strings to decide whether a column changed.

use crate::schema::column_type::WidthPolicy;
use crate::schema::types::{Column, DatabaseSchema, Table};

/// Render every table of the schema, in schema order, as one DDL script.
/// No inter-table dependency ordering is computed.
pub fn render_schema(schema: &DatabaseSchema) -> String {
    let mut script = String::new();
    for table in &schema.tables {
        script.push_str(&render_table(table));
    }
    script
}

/// Render one table as a `CREATE TABLE` statement, terminated by a blank
/// line. Column and member-column lists preserve declaration order; indexes
/// with zero resolved members are skipped.
pub fn render_table(table: &Table) -> String {
    let mut sql = format!("CREATE TABLE `{}` (\n", table.name);

    for column in &table.columns {
        sql.push_str("  ");
        sql.push_str(&column_definition(column));
        sql.push_str(",\n");
    }

    if let Some(key) = &table.primary_key {
        sql.push_str("  PRIMARY KEY (");
        sql.push_str(&join_names(&key.columns));
        sql.push_str("),\n");
    }

    for index in &table.indexes {
        if index.columns.is_empty() {
            continue;
        }
        if index.unique {
            sql.push_str("  UNIQUE KEY `");
        } else {
            sql.push_str("  KEY `");
        }
        sql.push_str(&index.name);
        sql.push_str("` (");
        sql.push_str(&join_names(&index.columns));
        sql.push_str(") USING BTREE,\n");
    }

    if sql.ends_with(",\n") {
        sql.truncate(sql.len() - 2);
    }
    sql.push_str("\n) ENGINE=InnoDB DEFAULT CHARSET=utf8;\n\n");
    sql
}

/// Render one column definition: name, type with its width suffix, then
/// `NOT NULL`, `DEFAULT` (verbatim, only when non-empty) and `COMMENT`.
pub fn column_definition(column: &Column) -> String {
    let mut def = format!("`{}` {}", column.name, column.column_type.keyword());

    match column.column_type.width_policy() {
        WidthPolicy::NoWidth => {}
        WidthPolicy::FixedOne => def.push_str("(1)"),
        // Legacy display-width convention: declared size plus one.
        WidthPolicy::IntegerWidth => def.push_str(&format!("({})", column.size + 1)),
        WidthPolicy::PrecisionScale => {
            def.push_str(&format!("({},{})", column.size, column.decimal_digits));
        }
        WidthPolicy::DefaultWidth => def.push_str(&format!("({})", column.size)),
    }

    // No-width types never carry the modifier suffixes.
    if column.column_type.width_policy() != WidthPolicy::NoWidth {
        if column.unsigned {
            def.push_str(" UNSIGNED");
        }
        if column.auto_increment {
            def.push_str(" AUTO_INCREMENT");
        }
    }

    if column.not_null() {
        def.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default_value {
        if !default.is_empty() {
            def.push_str(" DEFAULT ");
            def.push_str(default);
        }
    }
    if let Some(remarks) = &column.remarks {
        if !remarks.is_empty() {
            def.push_str(" COMMENT '");
            def.push_str(remarks);
            def.push('\'');
        }
    }
    def
}

/// Join member column names as a backticked, comma-separated list.
pub(crate) fn join_names(columns: &[String]) -> String {
    columns
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(",")
}
