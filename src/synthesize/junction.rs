//! Junction tables for many-to-many relationships

use super::foreign_keys::insert_key_column;
use crate::schema::naming::{constraint_name, foreign_key_column, junction_table_name};
use crate::schema::{Column, ColumnReference, Schema, SchemaRelationship, Table};
use crate::extract::Cardinality;

/// Resolve `source` ↔ `target` through a `<source>_<target>` junction table.
///
/// The junction gets a composite primary key of two non-nullable cascading
/// foreign keys plus a `created_at` timestamp. A self-referencing pair uses
/// `related_<table>_id` for the second key. An existing junction for the
/// pair (either name order) is reused.
///
/// Returns the relationships to record: the many-to-many itself with
/// `junction_table` set, then the two derived one-to-many links.
pub(crate) fn add_junction(
    schema: &mut Schema,
    source: &str,
    target: &str,
    description: &str,
) -> Option<Vec<SchemaRelationship>> {
    let source_table = schema.table(source)?;
    let target_table = schema.table(target)?;
    let (source_pk, source_type) = (
        source_table.primary_key_column().to_string(),
        source_table.primary_key_type().to_string(),
    );
    let (target_pk, target_type) = (
        target_table.primary_key_column().to_string(),
        target_table.primary_key_type().to_string(),
    );

    let source_key = foreign_key_column(source);
    let target_key = if source == target {
        format!("related_{}", foreign_key_column(target))
    } else {
        foreign_key_column(target)
    };

    let reverse = junction_table_name(target, source);
    let name = match schema.table(&reverse) {
        Some(t) if t.is_junction && source != target => reverse,
        _ => junction_table_name(source, target),
    };
    if !schema.has_table(&name) {
        let mut table = Table::new(name.clone());
        table.is_junction = true;
        schema.tables.push(table);
    }

    let junction = schema.table_mut(&name)?;
    let keys = [
        (source_key.clone(), source_type, source, source_pk.clone()),
        (target_key.clone(), target_type, target, target_pk.clone()),
    ];
    for (key, data_type, parent, parent_pk) in keys {
        let column = Column::foreign_key(key, data_type, ColumnReference::cascade(parent, parent_pk))
            .primary_key();
        insert_key_column(junction, column);
    }
    junction.add_column(
        Column::new("created_at", "TIMESTAMP")
            .not_null()
            .with_default("CURRENT_TIMESTAMP"),
    );

    let derived = |parent: &str, parent_pk: &str, key: &str| SchemaRelationship {
        name: constraint_name(&name, key),
        source_table: parent.to_string(),
        target_table: name.clone(),
        source_column: parent_pk.to_string(),
        target_column: key.to_string(),
        kind: Some(Cardinality::OneToMany),
        description: "has".to_string(),
        junction_table: None,
    };

    Some(vec![
        SchemaRelationship {
            name: name.clone(),
            source_table: source.to_string(),
            target_table: target.to_string(),
            source_column: source_pk.clone(),
            target_column: target_pk.clone(),
            kind: Some(Cardinality::ManyToMany),
            description: description.to_string(),
            junction_table: Some(name.clone()),
        },
        derived(source, &source_pk, &source_key),
        derived(target, &target_pk, &target_key),
    ])
}
