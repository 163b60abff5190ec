//! Schema to Mermaid `erDiagram` markup

use super::glyph::glyph;
use crate::extract::Cardinality;
use crate::schema::{Column, Schema, SchemaRelationship, TypeBucket};
use std::fmt::Write;

pub(crate) const HEADER: &str = "erDiagram";
pub(crate) const BLOCK_INDENT: &str = "    ";
pub(crate) const BODY_INDENT: &str = "        ";

fn key_marker(column: &Column) -> Option<&'static str> {
    match (column.is_primary_key, column.is_foreign_key) {
        (true, true) => Some("PK, FK"),
        (true, false) => Some("PK"),
        (false, true) => Some("FK"),
        (false, false) => None,
    }
}

fn attribute_line(column: &Column) -> String {
    let bucket = TypeBucket::from_sql(&column.data_type);
    match key_marker(column) {
        Some(marker) => format!("{}{} {} {}", BODY_INDENT, bucket, column.name, marker),
        None => format!("{}{} {}", BODY_INDENT, bucket, column.name),
    }
}

/// A many-to-many whose junction table is emitted is drawn through the
/// junction's own one-to-many lines instead
fn drawn_through_junction(schema: &Schema, rel: &SchemaRelationship) -> bool {
    rel.kind == Some(Cardinality::ManyToMany)
        && rel
            .junction_table
            .as_deref()
            .map_or(false, |junction| schema.has_table(junction))
}

/// Serialize a schema as ER markup: header, one block per table, then one
/// line per relationship.
pub fn emit(schema: &Schema) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "{}", HEADER);

    for table in &schema.tables {
        let _ = writeln!(out, "{}{} {{", BLOCK_INDENT, table.name);
        for column in &table.columns {
            let _ = writeln!(out, "{}", attribute_line(column));
        }
        let _ = writeln!(out, "{}}}", BLOCK_INDENT);
        let _ = writeln!(out);
    }

    for rel in &schema.relationships {
        if drawn_through_junction(schema, rel) {
            continue;
        }
        if !schema.has_table(&rel.source_table) || !schema.has_table(&rel.target_table) {
            log::debug!("not drawing {}: endpoint table missing", rel.name);
            continue;
        }
        let _ = writeln!(
            out,
            "{}{} {} {} : \"{}\"",
            BLOCK_INDENT,
            rel.source_table,
            glyph(rel.kind),
            rel.target_table,
            rel.description.replace('"', "'")
        );
    }

    // no trailing blank line when there are no relationships
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnReference, Table};

    fn schema() -> Schema {
        let mut schema = Schema::new("Shop", "");
        let mut customer = Table::new("customer");
        customer.add_column(Column::new("id", "INTEGER").primary_key());
        customer.add_column(Column::new("name", "VARCHAR(255)"));
        let mut order = Table::new("order");
        order.add_column(Column::new("id", "INTEGER").primary_key());
        order.add_column(Column::foreign_key(
            "customer_id",
            "INTEGER",
            ColumnReference::cascade("customer", "id"),
        ));
        order.add_column(Column::new("created_at", "TIMESTAMP"));
        schema.tables = vec![customer, order];
        schema.relationships.push(SchemaRelationship {
            name: "fk_order_customer_id".to_string(),
            source_table: "order".to_string(),
            target_table: "customer".to_string(),
            source_column: "customer_id".to_string(),
            target_column: "id".to_string(),
            kind: Some(Cardinality::ManyToOne),
            description: "belongs to".to_string(),
            junction_table: None,
        });
        schema
    }

    #[test]
    fn test_emit() {
        let markup = emit(&schema());
        let expected = "erDiagram
    customer {
        number id PK
        string name
    }

    order {
        number id PK
        number customer_id FK
        date created_at
    }

    order }o--|| customer : \"belongs to\"
";
        assert_eq!(markup, expected);
    }

    #[test]
    fn test_unspecified_kind_uses_one_to_one() {
        let mut schema = schema();
        schema.relationships[0].kind = None;
        assert!(emit(&schema).contains("order ||--|| customer"));
    }

    #[test]
    fn test_pk_fk_marker() {
        let column = Column::foreign_key("student_id", "INTEGER", ColumnReference::cascade("student", "id"))
            .primary_key();
        assert_eq!(attribute_line(&column).trim(), "number student_id PK, FK");
    }

    #[test]
    fn test_empty_schema() {
        assert_eq!(emit(&Schema::new("Empty", "")), "erDiagram\n");
    }
}
