//! Table definition metadata

use super::column::Column;
use serde::{Deserialize, Serialize};

/// Layout coordinates for diagram rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    /// Synthesized to resolve a many-to-many relationship
    #[serde(default)]
    pub is_junction: bool,
    #[serde(default)]
    pub position: Position,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            is_junction: false,
            position: Position::default(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Append `column` unless one with the same name exists.
    ///
    /// Returns whether the column was added.
    pub fn add_column(&mut self, column: Column) -> bool {
        if self.has_column(&column.name) {
            return false;
        }
        self.columns.push(column);
        true
    }

    /// Name of the first primary key column, `id` by convention if none is flagged
    pub fn primary_key_column(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .unwrap_or("id")
    }

    /// SQL type of the primary key column, `INTEGER` if it cannot be resolved
    pub fn primary_key_type(&self) -> &str {
        self.column(self.primary_key_column())
            .map(|c| c.data_type.as_str())
            .unwrap_or("INTEGER")
    }

    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.references.is_some())
    }

    /// Tables this table references, in column order, without duplicates or itself
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        for table in self.foreign_keys().filter_map(Column::referenced_table) {
            if table != self.name && !deps.iter().any(|d| d == table) {
                deps.push(table.to_string());
            }
        }
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::column::ColumnReference;

    #[test]
    fn test_primary_key_fallback() {
        let mut table = Table::new("book");
        assert_eq!(table.primary_key_column(), "id");
        assert_eq!(table.primary_key_type(), "INTEGER");

        table.add_column(Column::new("isbn", "VARCHAR(255)").primary_key());
        assert_eq!(table.primary_key_column(), "isbn");
        assert_eq!(table.primary_key_type(), "VARCHAR(255)");
    }

    #[test]
    fn test_add_column_is_idempotent() {
        let mut table = Table::new("order");
        assert!(table.add_column(Column::new("customer_id", "INTEGER")));
        assert!(!table.add_column(Column::new("customer_id", "VARCHAR(255)")));
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].data_type, "INTEGER");
    }

    #[test]
    fn test_dependencies() {
        let mut table = Table::new("employee");
        table.add_column(Column::foreign_key(
            "department_id",
            "INTEGER",
            ColumnReference::cascade("department", "id"),
        ));
        table.add_column(Column::foreign_key(
            "manager_id",
            "INTEGER",
            ColumnReference::cascade("employee", "id"),
        ));
        table.add_column(Column::foreign_key(
            "home_department_id",
            "INTEGER",
            ColumnReference::cascade("department", "id"),
        ));
        assert_eq!(table.dependencies(), vec!["department".to_string()]);
    }
}
