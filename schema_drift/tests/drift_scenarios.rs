//! End-to-end drift scenarios through the public API: build two snapshots,
//! script the drift, and check the emitted SQL byte for byte.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;

use schema_drift::schema::types::{Column, DatabaseSchema, IndexDef, KeyDef, Table};
use schema_drift::{diff_schemas, diff_schemas_with, render_schema, DiffOptions};

fn id_column() -> Column {
    Column::builder("id", "INT")
        .size(10)
        .nullable(false)
        .auto_increment(true)
        .build()
        .unwrap()
}

fn order_table() -> Table {
    Table::builder("t_order")
        .column(id_column())
        .column(
            Column::builder("amount", "DECIMAL")
                .size(10)
                .decimal_digits(2)
                .nullable(false)
                .build()
                .unwrap(),
        )
        .column(Column::builder("created_at", "DATETIME").build().unwrap())
        .primary_key(KeyDef::new("PRIMARY", vec!["id".to_string()]))
        .build()
}

fn user_table_v1() -> Table {
    Table::builder("t_user")
        .column(id_column())
        .column(
            Column::builder("name", "VARCHAR")
                .size(50)
                .nullable(false)
                .build()
                .unwrap(),
        )
        .primary_key(KeyDef::new("PRIMARY", vec!["id".to_string()]))
        .build()
}

fn user_table_v2() -> Table {
    Table::builder("t_user")
        .column(id_column())
        .column(
            Column::builder("name", "VARCHAR")
                .size(50)
                .nullable(false)
                .build()
                .unwrap(),
        )
        .column(Column::builder("email", "VARCHAR").size(100).build().unwrap())
        .primary_key(KeyDef::new("PRIMARY", vec!["id".to_string()]))
        .index(IndexDef::new("uk_email", true, vec!["email".to_string()]))
        .build()
}

fn legacy_table() -> Table {
    Table::builder("t_legacy").column(id_column()).build()
}

#[test]
fn upgrade_script_creates_missing_table_and_alters_existing_one() {
    let authoritative = DatabaseSchema::new(vec![order_table(), user_table_v2()]);
    let live = DatabaseSchema::new(vec![user_table_v1(), legacy_table()]);

    let expected = "CREATE TABLE `t_order` (\n\
                    \x20 `id` INT(11) AUTO_INCREMENT NOT NULL,\n\
                    \x20 `amount` DECIMAL(10,2) NOT NULL,\n\
                    \x20 `created_at` DATETIME,\n\
                    \x20 PRIMARY KEY (`id`)\n\
                    ) ENGINE=InnoDB DEFAULT CHARSET=utf8;\n\n\
                    ALTER TABLE `t_user`\n\
                    ADD COLUMN `email` VARCHAR(100),\n\
                    ADD UNIQUE INDEX `uk_email` (`email`) USING BTREE;\n\n";
    assert_eq!(diff_schemas(&authoritative, &live), expected);
}

#[test]
fn conservative_script_leaves_extra_live_objects_alone() {
    let authoritative = DatabaseSchema::new(vec![user_table_v1()]);
    let live = DatabaseSchema::new(vec![user_table_v1(), legacy_table()]);

    assert_eq!(diff_schemas(&authoritative, &live), "");
}

#[test]
fn relaxed_script_drops_the_stale_table_last() {
    let authoritative = DatabaseSchema::new(vec![user_table_v1()]);
    let live = DatabaseSchema::new(vec![legacy_table(), user_table_v1()]);
    let options = DiffOptions {
        allow_column_removal: true,
        allow_table_removal: true,
    };

    assert_eq!(
        diff_schemas_with(&authoritative, &live, &options),
        "DROP TABLE `t_legacy`;\n\n"
    );
}

#[test]
fn drift_against_self_is_empty() {
    let snapshot = DatabaseSchema::new(vec![order_table(), user_table_v2()]);
    assert_eq!(diff_schemas(&snapshot, &snapshot), "");
}

#[test]
fn script_generation_is_deterministic() {
    let authoritative = DatabaseSchema::new(vec![order_table(), user_table_v2()]);
    let live = DatabaseSchema::new(vec![user_table_v1()]);

    let first = diff_schemas(&authoritative, &live);
    let second = diff_schemas(&authoritative, &live);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn rendered_schema_covers_every_table_in_order() {
    let snapshot = DatabaseSchema::new(vec![order_table(), user_table_v1()]);
    let ddl = render_schema(&snapshot);

    let order_pos = ddl.find("CREATE TABLE `t_order`").unwrap();
    let user_pos = ddl.find("CREATE TABLE `t_user`").unwrap();
    assert!(order_pos < user_pos);
    assert_eq!(ddl.matches("CREATE TABLE").count(), 2);
}

fn shard_map_table() -> Table {
    Table::builder("t_shard_map")
        .column(
            Column::builder("region", "VARCHAR")
                .size(20)
                .nullable(false)
                .build()
                .unwrap(),
        )
        .column(
            Column::builder("bucket", "INT")
                .size(10)
                .nullable(false)
                .build()
                .unwrap(),
        )
        .column(
            Column::builder("node", "VARCHAR")
                .size(64)
                .nullable(false)
                .build()
                .unwrap(),
        )
        .primary_key(KeyDef::new(
            "PRIMARY",
            vec!["region".to_string(), "bucket".to_string()],
        ))
        .index(IndexDef::new(
            "idx_node",
            false,
            vec!["node".to_string(), "region".to_string()],
        ))
        .index(IndexDef::new(
            "uk_node_bucket",
            true,
            vec!["node".to_string(), "bucket".to_string()],
        ))
        .build()
}

fn audit_table() -> Table {
    // No primary key at all.
    Table::builder("t_audit")
        .column(id_column())
        .column(Column::builder("detail", "TEXT").build().unwrap())
        .index(IndexDef::new("idx_id", false, vec!["id".to_string()]))
        .build()
}

fn member_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| name.trim_matches('`').to_string())
        .collect()
}

/// Scan rendered DDL back into its structural shape: column names in order,
/// primary-key members in order, and index name to member list.
fn recovered_shape(ddl: &str) -> (Vec<String>, Vec<String>, BTreeMap<String, Vec<String>>) {
    let mut columns = Vec::new();
    let mut primary = Vec::new();
    let mut indexes = BTreeMap::new();

    for line in ddl.lines() {
        let line = line.trim().trim_end_matches(',');
        if let Some(rest) = line.strip_prefix("PRIMARY KEY (") {
            primary = member_names(rest.trim_end_matches(')'));
        } else if line.starts_with("UNIQUE KEY `") || line.starts_with("KEY `") {
            let name_start = line.find('`').unwrap() + 1;
            let name_end = line[name_start..].find('`').unwrap() + name_start;
            let open = line.find('(').unwrap() + 1;
            let close = line.rfind(')').unwrap();
            indexes.insert(
                line[name_start..name_end].to_string(),
                member_names(&line[open..close]),
            );
        } else if let Some(rest) = line.strip_prefix('`') {
            if let Some(end) = rest.find('`') {
                columns.push(rest[..end].to_string());
            }
        }
    }
    (columns, primary, indexes)
}

#[test]
fn rendered_table_parses_back_to_the_same_shape() {
    for table in [shard_map_table(), audit_table(), order_table(), user_table_v2()] {
        let ddl = render_schema(&DatabaseSchema::new(vec![table.clone()]));
        let (columns, primary, indexes) = recovered_shape(&ddl);

        let expected_columns: Vec<String> =
            table.columns.iter().map(|c| c.name.clone()).collect();
        assert_eq!(columns, expected_columns, "columns of `{}`", table.name);

        let expected_primary = table
            .primary_key
            .as_ref()
            .map(|k| k.columns.clone())
            .unwrap_or_default();
        assert_eq!(primary, expected_primary, "primary key of `{}`", table.name);

        let expected_indexes: BTreeMap<String, Vec<String>> = table
            .indexes
            .iter()
            .map(|i| (i.name.clone(), i.columns.clone()))
            .collect();
        assert_eq!(indexes, expected_indexes, "indexes of `{}`", table.name);
    }
}

#[test]
fn prefixed_tables_expose_their_logical_name() {
    let table = Table::builder("t_user")
        .prefix("t_")
        .column(id_column())
        .build();
    assert_eq!(table.model_name(), "user");
}
