//! Type definitions for database schema objects
//!
//! A schema snapshot is an immutable value graph: `DatabaseSchema` owns an
//! ordered list of `Table`s, each table owns its ordered `Column`s, `Index`es
//! and optional primary `Key`. Everything is built in one step through the
//! builders below and treated as read-only afterwards, so the diff engine can
//! never observe a half-populated snapshot.

use tracing::warn;

use crate::error::Result;
use crate::schema::column_type::ColumnType;

/// One fully-resolved capture of a database's table metadata.
#[derive(Debug, Clone, Default)]
pub struct DatabaseSchema {
    pub tables: Vec<Table>,
}

impl DatabaseSchema {
    /// Create a schema snapshot from an ordered list of tables.
    pub fn new(tables: Vec<Table>) -> Self {
        Self { tables }
    }

    /// Find a table by case-insensitive name.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }
}

/// A database table (or view) snapshot.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub comment: Option<String>,
    pub collation: Option<String>,
    pub is_view: bool,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub primary_key: Option<Key>,
    /// First primary-key member, when one exists.
    pub primary_column: Option<String>,
    prefix: Option<String>,
    unresolved: Vec<UnresolvedMember>,
}

impl Table {
    pub fn builder(name: impl Into<String>) -> TableBuilder {
        TableBuilder::new(name)
    }

    /// Logical name with the configured table prefix stripped. Cosmetic only;
    /// DDL rendering always uses the physical name.
    pub fn model_name(&self) -> &str {
        match &self.prefix {
            Some(prefix) if !prefix.is_empty() => {
                self.name.strip_prefix(prefix.as_str()).unwrap_or(&self.name)
            }
            _ => &self.name,
        }
    }

    /// Find a column by case-insensitive name.
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Index or key member references that named no column in this table and
    /// were dropped during construction. Lets callers detect a silently
    /// incomplete index instead of discovering it in the generated DDL.
    pub fn unresolved_members(&self) -> &[UnresolvedMember] {
        &self.unresolved
    }
}

/// An index or key member that referenced a column absent from the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedMember {
    /// Name of the index or key that carried the reference.
    pub owner: String,
    /// The column name that could not be resolved.
    pub column: String,
}

/// A table column snapshot.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    /// Native numeric type code reported by the metadata source, when it has
    /// one. Carried as-is; never consulted by rendering or diffing.
    pub data_type_code: i32,
    /// Raw type keyword, first whitespace-delimited token only, uppercased.
    pub data_type_name: String,
    /// Taxonomy entry resolved from `data_type_name` at build time.
    pub column_type: ColumnType,
    pub size: u32,
    pub decimal_digits: u32,
    pub nullable: bool,
    /// Untyped default, rendered verbatim when non-empty.
    pub default_value: Option<String>,
    pub remarks: Option<String>,
    pub auto_increment: bool,
    /// True when the raw type string contained `UNSIGNED`.
    pub unsigned: bool,
    pub character_set: Option<String>,
    pub collation: Option<String>,
    /// Set during table construction from primary-key membership.
    pub is_primary: bool,
}

impl Column {
    /// Start building a column from its name and raw metadata type string
    /// (e.g. `"BIGINT UNSIGNED"`). Only the first token becomes the type
    /// name; an `UNSIGNED` modifier sets the flag.
    pub fn builder(name: impl Into<String>, raw_type: impl Into<String>) -> ColumnBuilder {
        ColumnBuilder::new(name, raw_type)
    }

    pub fn not_null(&self) -> bool {
        !self.nullable
    }
}

/// Builder for [`Column`]. `build` validates the type name against the
/// taxonomy, so an unmapped type fails at load time rather than at render
/// time.
#[derive(Debug)]
pub struct ColumnBuilder {
    name: String,
    raw_type: String,
    data_type_code: i32,
    size: u32,
    decimal_digits: u32,
    nullable: bool,
    default_value: Option<String>,
    remarks: Option<String>,
    auto_increment: bool,
    character_set: Option<String>,
    collation: Option<String>,
}

impl ColumnBuilder {
    fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_type: raw_type.into(),
            data_type_code: 0,
            size: 0,
            decimal_digits: 0,
            nullable: true,
            default_value: None,
            remarks: None,
            auto_increment: false,
            character_set: None,
            collation: None,
        }
    }

    pub fn data_type_code(mut self, code: i32) -> Self {
        self.data_type_code = code;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn decimal_digits(mut self, digits: u32) -> Self {
        self.decimal_digits = digits;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    pub fn character_set(mut self, character_set: impl Into<String>) -> Self {
        self.character_set = Some(character_set.into());
        self
    }

    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    /// Validate the type name and produce the column. Fails with
    /// [`crate::error::Error::UnknownColumnType`] for names outside the
    /// taxonomy.
    pub fn build(self) -> Result<Column> {
        let upper = self.raw_type.to_ascii_uppercase();
        let data_type_name = upper.split_whitespace().next().unwrap_or("").to_string();
        let unsigned = upper.contains("UNSIGNED");
        let column_type = ColumnType::from_name(&self.name, &data_type_name)?;

        Ok(Column {
            name: self.name,
            data_type_code: self.data_type_code,
            data_type_name,
            column_type,
            size: self.size,
            decimal_digits: self.decimal_digits,
            nullable: self.nullable,
            default_value: self.default_value,
            remarks: self.remarks,
            auto_increment: self.auto_increment,
            unsigned,
            character_set: self.character_set,
            collation: self.collation,
            is_primary: false,
        })
    }
}

/// A secondary index. Member order is position order in the index and takes
/// part in equality during diffing.
#[derive(Debug, Clone)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    /// Index type code from the metadata source, when it has one.
    pub type_code: i16,
    /// Sort order reported for the index (`"A"`, `"D"`), when available.
    pub sort_order: Option<String>,
    /// Resolved member column names, in position order.
    pub columns: Vec<String>,
}

/// Unresolved index definition handed to [`TableBuilder::index`]. Member
/// names are matched against the table's columns at build time.
#[derive(Debug, Clone)]
pub struct IndexDef {
    pub name: String,
    pub unique: bool,
    pub type_code: i16,
    pub sort_order: Option<String>,
    pub columns: Vec<String>,
}

impl IndexDef {
    pub fn new(name: impl Into<String>, unique: bool, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            unique,
            type_code: 0,
            sort_order: None,
            columns,
        }
    }

    pub fn type_code(mut self, code: i16) -> Self {
        self.type_code = code;
        self
    }

    pub fn sort_order(mut self, order: impl Into<String>) -> Self {
        self.sort_order = Some(order.into());
        self
    }
}

/// A primary key. Member order matters for composite-key equality.
#[derive(Debug, Clone)]
pub struct Key {
    pub name: String,
    /// Resolved member column names, in position order.
    pub columns: Vec<String>,
}

/// Unresolved primary-key definition handed to [`TableBuilder::primary_key`].
#[derive(Debug, Clone)]
pub struct KeyDef {
    pub name: String,
    pub columns: Vec<String>,
}

impl KeyDef {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }
}

/// Builder for [`Table`]. Collects columns plus unresolved index/key
/// definitions, then resolves every member reference in one step.
#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    comment: Option<String>,
    collation: Option<String>,
    is_view: bool,
    prefix: Option<String>,
    columns: Vec<Column>,
    indexes: Vec<IndexDef>,
    primary_key: Option<KeyDef>,
}

impl TableBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            collation: None,
            is_view: false,
            prefix: None,
            columns: Vec::new(),
            indexes: Vec::new(),
            primary_key: None,
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    pub fn view(mut self, is_view: bool) -> Self {
        self.is_view = is_view;
        self
    }

    /// Table-name prefix stripped when deriving the logical model name.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Add an index definition. `PRIMARY` is reserved for the primary key and
    /// is dropped here, matching how the metadata standard reports it.
    pub fn index(mut self, index: IndexDef) -> Self {
        if index.name.eq_ignore_ascii_case("PRIMARY") {
            return self;
        }
        self.indexes.push(index);
        self
    }

    pub fn primary_key(mut self, key: KeyDef) -> Self {
        self.primary_key = Some(key);
        self
    }

    /// Resolve index and key members against the column list and produce the
    /// table. Unresolved members are skipped and recorded; a primary key
    /// whose members all fail to resolve collapses to no key at all, so no
    /// empty `PRIMARY KEY ()` can ever be rendered.
    pub fn build(self) -> Table {
        let table_name = self.name;
        let mut columns = self.columns;
        let mut unresolved = Vec::new();

        let indexes = self
            .indexes
            .into_iter()
            .map(|def| {
                let mut members = Vec::new();
                for member in &def.columns {
                    let Some(column) = find_column(&columns, member) else {
                        warn!(
                            table = %table_name,
                            index = %def.name,
                            column = %member,
                            "index member references a column absent from the table; skipping"
                        );
                        unresolved.push(UnresolvedMember {
                            owner: def.name.clone(),
                            column: member.clone(),
                        });
                        continue;
                    };
                    if members.iter().any(|m: &String| m.eq_ignore_ascii_case(column)) {
                        continue;
                    }
                    members.push(column.to_string());
                }
                Index {
                    name: def.name,
                    unique: def.unique,
                    type_code: def.type_code,
                    sort_order: def.sort_order,
                    columns: members,
                }
            })
            .collect();

        let mut primary_column = None;
        let primary_key = self.primary_key.and_then(|def| {
            let mut members = Vec::new();
            for member in &def.columns {
                let Some(column) = find_column(&columns, member).map(str::to_string) else {
                    warn!(
                        table = %table_name,
                        key = %def.name,
                        column = %member,
                        "primary key member references a column absent from the table; skipping"
                    );
                    unresolved.push(UnresolvedMember {
                        owner: def.name.clone(),
                        column: member.clone(),
                    });
                    continue;
                };
                if primary_column.is_none() {
                    primary_column = Some(column.clone());
                }
                if let Some(c) = columns.iter_mut().find(|c| c.name == column) {
                    c.is_primary = true;
                }
                members.push(column);
            }
            if members.is_empty() {
                return None;
            }
            Some(Key {
                name: def.name,
                columns: members,
            })
        });

        Table {
            name: table_name,
            comment: self.comment,
            collation: self.collation,
            is_view: self.is_view,
            columns,
            indexes,
            primary_key,
            primary_column,
            prefix: self.prefix,
            unresolved,
        }
    }
}

fn find_column<'a>(columns: &'a [Column], name: &str) -> Option<&'a str> {
    columns
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_column(name: &str) -> Column {
        Column::builder(name, "INT")
            .size(10)
            .nullable(false)
            .build()
            .unwrap()
    }

    #[test]
    fn schema_lists_table_names_in_order() {
        let schema = DatabaseSchema::new(vec![
            Table::builder("t_order").column(int_column("id")).build(),
            Table::builder("t_user").column(int_column("id")).build(),
        ]);
        let names: Vec<&str> = schema.table_names().collect();
        assert_eq!(names, vec!["t_order", "t_user"]);
    }

    #[test]
    fn builder_carries_the_driver_type_code() {
        let column = Column::builder("id", "INT")
            .data_type_code(4)
            .size(10)
            .build()
            .unwrap();
        assert_eq!(column.data_type_code, 4);
    }

    #[test]
    fn raw_type_is_split_and_unsigned_detected() {
        let column = Column::builder("total", "BIGINT UNSIGNED").size(19).build().unwrap();
        assert_eq!(column.data_type_name, "BIGINT");
        assert!(column.unsigned);

        let plain = Column::builder("total", "bigint").build().unwrap();
        assert_eq!(plain.data_type_name, "BIGINT");
        assert!(!plain.unsigned);
    }

    #[test]
    fn unknown_type_fails_at_build() {
        assert!(Column::builder("geom", "GEOMETRY").build().is_err());
    }

    #[test]
    fn primary_key_members_mark_columns() {
        let table = Table::builder("t_order")
            .column(int_column("id"))
            .column(int_column("shop_id"))
            .primary_key(KeyDef::new("PRIMARY", vec!["id".to_string()]))
            .build();

        assert!(table.get_column("id").unwrap().is_primary);
        assert!(!table.get_column("shop_id").unwrap().is_primary);
        assert_eq!(table.primary_column.as_deref(), Some("id"));
        assert_eq!(table.primary_key.as_ref().unwrap().columns, vec!["id"]);
    }

    #[test]
    fn primary_index_name_is_reserved() {
        let table = Table::builder("t_order")
            .column(int_column("id"))
            .index(IndexDef::new("PRIMARY", true, vec!["id".to_string()]))
            .index(IndexDef::new("idx_id", false, vec!["id".to_string()]))
            .build();

        assert_eq!(table.indexes.len(), 1);
        assert_eq!(table.indexes[0].name, "idx_id");
    }

    #[test]
    fn unresolved_members_are_skipped_and_reported() {
        let table = Table::builder("t_order")
            .column(int_column("id"))
            .index(IndexDef::new(
                "idx_missing",
                false,
                vec!["id".to_string(), "dropped_col".to_string()],
            ))
            .build();

        assert_eq!(table.indexes[0].columns, vec!["id"]);
        assert_eq!(
            table.unresolved_members(),
            &[UnresolvedMember {
                owner: "idx_missing".to_string(),
                column: "dropped_col".to_string(),
            }]
        );
    }

    #[test]
    fn fully_unresolved_primary_key_collapses_to_none() {
        let table = Table::builder("t_order")
            .column(int_column("id"))
            .primary_key(KeyDef::new("PRIMARY", vec!["ghost".to_string()]))
            .build();

        assert!(table.primary_key.is_none());
        assert!(table.primary_column.is_none());
        assert_eq!(table.unresolved_members().len(), 1);
    }

    #[test]
    fn member_resolution_is_case_insensitive_and_dedups() {
        let table = Table::builder("t_order")
            .column(int_column("Id"))
            .index(IndexDef::new(
                "idx_id",
                false,
                vec!["ID".to_string(), "id".to_string()],
            ))
            .build();

        // Resolved to the declared spelling, duplicate position dropped.
        assert_eq!(table.indexes[0].columns, vec!["Id"]);
    }

    #[test]
    fn model_name_strips_configured_prefix() {
        let table = Table::builder("t_user").prefix("t_").build();
        assert_eq!(table.model_name(), "user");

        let unprefixed = Table::builder("audit_log").prefix("t_").build();
        assert_eq!(unprefixed.model_name(), "audit_log");
    }
}
