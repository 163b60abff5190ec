//! Foreign key wiring for one-to-many and one-to-one relationships

use crate::schema::naming::{constraint_name, foreign_key_column};
use crate::schema::{Column, ColumnReference, Schema, Table};

/// A foreign key placed on `child`, pointing at `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ForeignKey {
    pub column: String,
    pub parent_column: String,
    pub constraint: String,
}

/// Column name for a key on `child` pointing at `parent`.
///
/// A table pointing at itself gets `parent_<table>_id` so the key never
/// shadows the table's own `<table>_id`-style columns.
pub(crate) fn key_column_name(parent: &str, child: &str) -> String {
    if parent == child {
        format!("parent_{}", foreign_key_column(parent))
    } else {
        foreign_key_column(parent)
    }
}

/// Insert a key column ahead of the audit timestamps, unless the name is taken
pub(crate) fn insert_key_column(table: &mut Table, column: Column) -> bool {
    if table.has_column(&column.name) {
        return false;
    }
    let at = table
        .columns
        .iter()
        .position(|c| c.name == "created_at" || c.name == "updated_at")
        .unwrap_or(table.columns.len());
    table.columns.insert(at, column);
    true
}

/// Add `<parent>_id` to `child`, typed as the parent's primary key.
///
/// The key is nullable unless `required`; `unique` makes it one-to-one.
/// Adding the same key twice leaves the first column untouched. Returns
/// `None` if either table is missing.
pub(crate) fn add_foreign_key(
    schema: &mut Schema,
    parent: &str,
    child: &str,
    required: bool,
    unique: bool,
) -> Option<ForeignKey> {
    let parent_table = schema.table(parent)?;
    let parent_column = parent_table.primary_key_column().to_string();
    let parent_type = parent_table.primary_key_type().to_string();

    let column_name = key_column_name(parent, child);
    let mut column = Column::foreign_key(
        column_name.clone(),
        parent_type,
        ColumnReference::cascade(parent, parent_column.clone()),
    );
    if required {
        column = column.not_null();
    }
    if unique {
        column = column.unique();
    }

    let child_table = schema.table_mut(child)?;
    if !insert_key_column(child_table, column) {
        log::debug!("{}.{} already exists, leaving it as is", child, column_name);
    }

    Some(ForeignKey {
        constraint: constraint_name(child, &column_name),
        column: column_name,
        parent_column,
    })
}
