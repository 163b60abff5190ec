//! Schema synthesis: candidate concepts to a normalized table model.
//!
//! Each entity becomes a table named by [`naming::table_name`]; relationships
//! are wired as foreign keys or junction tables:
//!
//! | Cardinality    | Result                                                  |
//! |----------------|---------------------------------------------------------|
//! | `ONE_TO_MANY`  | `<source>_id` on the target table                       |
//! | `MANY_TO_ONE`  | `<target>_id` on the source table                       |
//! | `ONE_TO_ONE`   | unique `<source>_id` on the target table                |
//! | `MANY_TO_MANY` | `<source>_<target>` junction with a composite key       |
//!
//! Synthesis is deterministic: identical input gives an identical schema,
//! layout coordinates included.

mod foreign_keys;
mod junction;
mod layout;

use crate::config::SchemaConfig;
use crate::extract::{
    CandidateEntity, CandidateRelationship, Cardinality, Extraction, Participation,
};
use crate::schema::naming::{self, column_name};
use crate::schema::{Column, Schema, SchemaRelationship, Table};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Name and description for the synthesized schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub name: String,
    pub description: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self::from_config(&SchemaConfig::default())
    }
}

impl SynthesisOptions {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn from_config(config: &SchemaConfig) -> Self {
        Self::new(config.default_name.clone(), config.default_description.clone())
    }
}

/// A candidate relationship that did not make it into the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRelationship {
    pub source_entity: String,
    pub target_entity: String,
    pub reason: String,
}

/// What synthesis left out, for callers that want to know
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisReport {
    pub dropped_relationships: Vec<DroppedRelationship>,
    /// Entities whose table name collided with an earlier entity
    pub merged_entities: Vec<String>,
}

impl SynthesisReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_relationships.is_empty() && self.merged_entities.is_empty()
    }
}

/// Build the table model for `extraction`
pub fn synthesize(extraction: &Extraction, options: &SynthesisOptions) -> Schema {
    synthesize_with_report(extraction, options).0
}

/// [`synthesize`], also returning what was dropped along the way
pub fn synthesize_with_report(
    extraction: &Extraction,
    options: &SynthesisOptions,
) -> (Schema, SynthesisReport) {
    let mut schema = Schema::new(options.name.clone(), options.description.clone());
    let mut report = SynthesisReport::default();
    let mut tables_by_entity: HashMap<&str, String> = HashMap::new();
    let mut weak_tables: HashSet<String> = HashSet::new();

    for entity in &extraction.entities {
        let name = naming::table_name(&entity.name);
        if schema.has_table(&name) {
            log::debug!(
                "entity {} maps to existing table {}, keeping the first",
                entity.name,
                name
            );
            report.merged_entities.push(entity.name.clone());
        } else {
            schema.tables.push(entity_table(&name, entity));
        }
        if entity.is_weak {
            weak_tables.insert(name.clone());
        }
        tables_by_entity.insert(entity.name.as_str(), name);
    }

    for rel in &extraction.relationships {
        let resolve = |entity: &str| {
            tables_by_entity
                .get(entity)
                .cloned()
                .or_else(|| Some(naming::table_name(entity)))
                .filter(|table| schema.has_table(table))
        };
        let (Some(source), Some(target)) = (resolve(&rel.source_entity), resolve(&rel.target_entity))
        else {
            log::debug!(
                "dropping relationship {} -> {}: entity not in table set",
                rel.source_entity,
                rel.target_entity
            );
            report.dropped_relationships.push(DroppedRelationship {
                source_entity: rel.source_entity.clone(),
                target_entity: rel.target_entity.clone(),
                reason: "references an entity with no table".to_string(),
            });
            continue;
        };

        let records = wire(&mut schema, rel, &source, &target, &weak_tables);
        for record in records {
            if !schema.relationships.iter().any(|r| r.name == record.name) {
                schema.relationships.push(record);
            }
        }
    }

    layout::assign_positions(&mut schema.tables);
    log::debug!(
        "synthesized {} tables and {} relationships",
        schema.tables.len(),
        schema.relationships.len()
    );
    (schema, report)
}

fn entity_table(name: &str, entity: &CandidateEntity) -> Table {
    let mut table = Table::new(name);
    for attribute in &entity.attributes {
        table.add_column(Column::from_attribute(column_name(&attribute.name), attribute));
    }
    table
}

/// Place keys for one relationship and describe what was placed
fn wire(
    schema: &mut Schema,
    rel: &CandidateRelationship,
    source: &str,
    target: &str,
    weak_tables: &HashSet<String>,
) -> Vec<SchemaRelationship> {
    let kind = rel.cardinality;
    let (parent, child, child_total) = match kind {
        Cardinality::ManyToMany => {
            return junction::add_junction(schema, source, target, &rel.description)
                .unwrap_or_default();
        }
        Cardinality::OneToMany | Cardinality::OneToOne => {
            (source, target, rel.participation.target == Participation::Total)
        }
        Cardinality::ManyToOne => {
            (target, source, rel.participation.source == Participation::Total)
        }
    };
    let required = child_total || weak_tables.contains(child);
    let unique = kind == Cardinality::OneToOne;

    let Some(fk) = foreign_keys::add_foreign_key(schema, parent, child, required, unique) else {
        return Vec::new();
    };

    // columns follow the relationship's own direction
    let (source_column, target_column) = if child == target && parent == source {
        (fk.parent_column, fk.column)
    } else {
        (fk.column, fk.parent_column)
    };
    vec![SchemaRelationship {
        name: fk.constraint,
        source_table: source.to_string(),
        target_table: target.to_string(),
        source_column,
        target_column,
        kind: Some(kind),
        description: rel.description.clone(),
        junction_table: None,
    }]
}
