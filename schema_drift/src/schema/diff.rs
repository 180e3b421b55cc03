//! Schema difference engine
//!
//! Compares a "from" schema (the authoritative definition) against a "to"
//! schema (the database being brought into line) and emits the ALTER TABLE
//! script that reconciles them. The generated script is additive by default:
//! tables and columns present only in "to" are never dropped unless the
//! caller opts in, because the output is meant for human review and a
//! generated `DROP` is an irreversible mistake waiting to happen.

use crate::schema::ddl::{column_definition, join_names, render_table};
use crate::schema::types::{DatabaseSchema, Index, Key, Table};

/// Knobs relaxing the conservative baseline. Both default to off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Emit `DROP COLUMN` for columns present only in "to".
    pub allow_column_removal: bool,
    /// Emit `DROP TABLE` for tables present only in "to".
    pub allow_table_removal: bool,
}

/// Compute the reconciliation script with the conservative defaults:
/// no column or table removal.
pub fn diff_schemas(from: &DatabaseSchema, to: &DatabaseSchema) -> String {
    diff_schemas_with(from, to, &DiffOptions::default())
}

/// Compute the reconciliation script. One statement per changed table, in
/// "from" schema order, separated by blank lines; tables absent from "to"
/// contribute their full `CREATE TABLE`. Empty string when nothing differs.
pub fn diff_schemas_with(
    from: &DatabaseSchema,
    to: &DatabaseSchema,
    options: &DiffOptions,
) -> String {
    let mut script = String::new();

    for from_table in &from.tables {
        match to.get_table(&from_table.name) {
            None => script.push_str(&render_table(from_table)),
            Some(to_table) => {
                if let Some(statement) = alter_table_statement(from_table, to_table, options) {
                    script.push_str(&statement);
                    script.push_str("\n\n");
                }
            }
        }
    }

    if options.allow_table_removal {
        for to_table in &to.tables {
            if from.get_table(&to_table.name).is_none() {
                script.push_str(&format!("DROP TABLE `{}`;\n\n", to_table.name));
            }
        }
    }

    script
}

/// Build the ALTER TABLE body for one matched table pair, or `None` when the
/// pair is identical. Clause order is fixed: columns, primary key, indexes.
fn alter_table_statement(from_table: &Table, to_table: &Table, options: &DiffOptions) -> Option<String> {
    let mut clauses = String::new();

    for from_column in &from_table.columns {
        let from_def = column_definition(from_column);
        match to_table.get_column(&from_column.name) {
            None => {
                clauses.push_str("ADD COLUMN ");
                clauses.push_str(&from_def);
                clauses.push_str(",\n");
            }
            Some(to_column) => {
                // Textual comparison of the rendered definitions; any
                // difference in type, width, nullability, default or comment
                // shows up here.
                let to_def = column_definition(to_column);
                if !from_def.eq_ignore_ascii_case(&to_def) {
                    clauses.push_str("MODIFY COLUMN ");
                    clauses.push_str(&from_def);
                    clauses.push_str(",\n");
                }
            }
        }
    }

    if options.allow_column_removal {
        for to_column in &to_table.columns {
            if from_table.get_column(&to_column.name).is_none() {
                clauses.push_str(&format!("DROP COLUMN `{}`,\n", to_column.name));
            }
        }
    }

    match (&from_table.primary_key, &to_table.primary_key) {
        (None, Some(_)) => append_drop_primary_key(&mut clauses),
        (Some(from_key), None) => append_add_primary_key(&mut clauses, from_key),
        (Some(from_key), Some(to_key)) if members_changed(&from_key.columns, &to_key.columns) => {
            append_drop_primary_key(&mut clauses);
            append_add_primary_key(&mut clauses, from_key);
        }
        _ => {}
    }

    // From-side indexes that resolved to zero members are invisible, the
    // same way the renderer skips them. The to-side lookup matches by name
    // alone: even when a target index's members failed to resolve, the name
    // is taken in the database and a bare ADD would fail, so it is dropped
    // and re-added instead.
    for from_index in from_table.indexes.iter().filter(|i| !i.columns.is_empty()) {
        let to_index = to_table
            .indexes
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(&from_index.name));
        match to_index {
            None => append_add_index(&mut clauses, from_index),
            Some(to_index) if index_changed(from_index, to_index) => {
                append_drop_index(&mut clauses, &to_index.name);
                append_add_index(&mut clauses, from_index);
            }
            Some(_) => {}
        }
    }

    // Indexes are diffed in both directions: a "to" index with no "from"
    // counterpart is dropped.
    for to_index in to_table.indexes.iter().filter(|i| !i.columns.is_empty()) {
        let known = from_table
            .indexes
            .iter()
            .any(|i| i.name.eq_ignore_ascii_case(&to_index.name) && !i.columns.is_empty());
        if !known {
            append_drop_index(&mut clauses, &to_index.name);
        }
    }

    if clauses.is_empty() {
        return None;
    }
    clauses.truncate(clauses.len() - 2);
    Some(format!("ALTER TABLE `{}`\n{};", from_table.name, clauses))
}

fn append_drop_primary_key(clauses: &mut String) {
    clauses.push_str("DROP PRIMARY KEY,\n");
}

fn append_add_primary_key(clauses: &mut String, key: &Key) {
    clauses.push_str("ADD PRIMARY KEY (");
    clauses.push_str(&join_names(&key.columns));
    clauses.push_str("),\n");
}

fn append_drop_index(clauses: &mut String, name: &str) {
    clauses.push_str("DROP INDEX `");
    clauses.push_str(name);
    clauses.push_str("`,\n");
}

fn append_add_index(clauses: &mut String, index: &Index) {
    if index.unique {
        clauses.push_str("ADD UNIQUE INDEX `");
    } else {
        clauses.push_str("ADD INDEX `");
    }
    clauses.push_str(&index.name);
    clauses.push_str("` (");
    clauses.push_str(&join_names(&index.columns));
    clauses.push_str(") USING BTREE,\n");
}

/// Ordered member equality: same names, same order, same count.
fn members_changed(from: &[String], to: &[String]) -> bool {
    from.len() != to.len() || from.iter().zip(to.iter()).any(|(f, t)| f != t)
}

fn index_changed(from: &Index, to: &Index) -> bool {
    from.unique != to.unique || members_changed(&from.columns, &to.columns)
}
