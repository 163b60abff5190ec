//! Relational table model produced by synthesis.
//!
//! [`Schema`] is the root aggregate: tables own their columns, foreign keys
//! point at other tables by name only. Once synthesized a schema is treated
//! as immutable except through explicit edits such as
//! [`Schema::remove_table`], which must say what happens to dependents.

pub mod column;
pub mod dependency_ordering;
pub mod naming;
pub mod table;
pub mod type_mapping;

pub use column::{Column, ColumnReference, ReferentialAction};
pub use table::{Position, Table};
pub use type_mapping::TypeBucket;

use crate::error::SchemaError;
use crate::extract::Cardinality;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Serialized schema format version
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRelationship {
    pub name: String,
    pub source_table: String,
    pub target_table: String,
    pub source_column: String,
    pub target_column: String,
    /// `None` renders with one-to-one glyphs
    #[serde(rename = "type", default)]
    pub kind: Option<Cardinality>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junction_table: Option<String>,
}

impl SchemaRelationship {
    pub fn touches(&self, table: &str) -> bool {
        self.source_table == table
            || self.target_table == table
            || self.junction_table.as_deref() == Some(table)
    }
}

/// What [`Schema::remove_table`] does with tables that reference the removed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentAction {
    /// Keep dependents; their foreign key columns lose the reference
    Detach,
    /// Remove dependents too, transitively
    Cascade,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<SchemaRelationship>,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

impl Schema {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tables: Vec::new(),
            relationships: Vec::new(),
            version: SCHEMA_VERSION,
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Every foreign key whose referenced table is not part of this schema
    pub fn validate_references(&self) -> Result<(), Vec<SchemaError>> {
        dependency_ordering::validate_foreign_key_references(&self.tables)
    }

    /// Table names ordered so referenced tables come before their dependents
    pub fn creation_order(&self) -> Result<Vec<String>, SchemaError> {
        let infos = dependency_ordering::TableInfo::from_tables(&self.tables);
        dependency_ordering::topological_sort(&infos)
    }

    /// Remove a table and deal with its dependents.
    ///
    /// Returns the names of every removed table, the requested one first.
    pub fn remove_table(
        &mut self,
        name: &str,
        action: DependentAction,
    ) -> Result<Vec<String>, SchemaError> {
        if !self.has_table(name) {
            return Err(SchemaError::UnknownTable(name.to_string()));
        }

        let mut removed: Vec<String> = vec![name.to_string()];
        if action == DependentAction::Cascade {
            let mut cursor = 0;
            while cursor < removed.len() {
                let gone = removed[cursor].clone();
                cursor += 1;
                for table in &self.tables {
                    let depends = table
                        .foreign_keys()
                        .any(|c| c.referenced_table() == Some(gone.as_str()));
                    if depends && !removed.contains(&table.name) {
                        removed.push(table.name.clone());
                    }
                }
            }
        }

        let gone: HashSet<&str> = removed.iter().map(String::as_str).collect();
        self.tables.retain(|t| !gone.contains(t.name.as_str()));
        for table in &mut self.tables {
            for column in &mut table.columns {
                if column.referenced_table().map_or(false, |t| gone.contains(t)) {
                    column.detach();
                }
            }
        }
        self.relationships
            .retain(|r| !gone.iter().any(|table| r.touches(table)));

        log::debug!("removed tables {:?} ({:?})", removed, action);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk(name: &str, table: &str) -> Column {
        Column::foreign_key(name, "INTEGER", ColumnReference::cascade(table, "id")).not_null()
    }

    fn shop() -> Schema {
        let mut schema = Schema::new("Shop", "");
        let mut customer = Table::new("customer");
        customer.add_column(Column::new("id", "INTEGER").primary_key());
        let mut order = Table::new("order");
        order.add_column(Column::new("id", "INTEGER").primary_key());
        order.add_column(fk("customer_id", "customer"));
        let mut item = Table::new("order_item");
        item.add_column(Column::new("id", "INTEGER").primary_key());
        item.add_column(fk("order_id", "order"));
        schema.tables = vec![customer, order, item];
        schema.relationships.push(SchemaRelationship {
            name: "fk_order_customer_id".to_string(),
            source_table: "customer".to_string(),
            target_table: "order".to_string(),
            source_column: "id".to_string(),
            target_column: "customer_id".to_string(),
            kind: Some(Cardinality::OneToMany),
            description: "places".to_string(),
            junction_table: None,
        });
        schema
    }

    #[test]
    fn test_remove_table_detach() {
        let mut schema = shop();
        let removed = schema.remove_table("customer", DependentAction::Detach).unwrap();
        assert_eq!(removed, vec!["customer"]);
        let order = schema.table("order").unwrap();
        let column = order.column("customer_id").unwrap();
        assert!(column.references.is_none());
        assert!(column.is_nullable);
        assert!(schema.relationships.is_empty());
        assert!(schema.validate_references().is_ok());
    }

    #[test]
    fn test_remove_table_cascade() {
        let mut schema = shop();
        let removed = schema.remove_table("customer", DependentAction::Cascade).unwrap();
        assert_eq!(removed, vec!["customer", "order", "order_item"]);
        assert!(schema.tables.is_empty());
    }

    #[test]
    fn test_remove_unknown_table() {
        let mut schema = shop();
        assert_eq!(
            schema.remove_table("nope", DependentAction::Detach),
            Err(SchemaError::UnknownTable("nope".to_string()))
        );
    }

    #[test]
    fn test_creation_order() {
        let mut schema = shop();
        schema.tables.reverse();
        assert_eq!(
            schema.creation_order().unwrap(),
            vec!["customer", "order", "order_item"]
        );
    }

    #[test]
    fn test_json_shape() {
        let schema = shop();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["relationships"][0]["type"], "ONE_TO_MANY");
        assert_eq!(json["relationships"][0]["sourceTable"], "customer");
        assert!(json["relationships"][0].get("junctionTable").is_none());
        assert_eq!(json["tables"][1]["isJunction"], false);
        assert_eq!(json["tables"][1]["position"]["x"], 0);

        let back: Schema = serde_json::from_value(json).unwrap();
        assert_eq!(back, schema);
    }
}
