//! Merge per-sentence mentions into one ordered [`Extraction`]

use super::classify::classify;
use super::constraints::ConstraintMap;
use super::normalize::merge_key;
use super::patterns::Mention;
use super::types::{
    CandidateAttribute, CandidateEntity, CandidateRelationship, Cardinality, DataType, Extraction,
};
use std::collections::HashMap;

#[derive(Debug)]
struct EntityRecord {
    name: String,
    mention_count: usize,
    is_weak: bool,
    /// Attribute names in first-mention order
    attributes: Vec<String>,
}

/// Accumulates mentions in first-seen order.
///
/// Entities are keyed by [`merge_key`], so "Order", "orders" and "ORDER"
/// land in one record. Relationships are keyed by their unordered entity
/// pair plus cardinality class; the first writer wins except that two
/// opposite one-to-many readings of the same pair become many-to-many.
#[derive(Debug, Default)]
pub(crate) struct ExtractionBuilder {
    entities: Vec<EntityRecord>,
    index: HashMap<String, usize>,
    constraints: ConstraintMap,
    relationships: Vec<CandidateRelationship>,
}

impl ExtractionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, mentions: Vec<Mention>) {
        for mention in mentions {
            match mention {
                Mention::Entity { name, weak, .. } => {
                    let record = self.entity_mut(&name);
                    record.mention_count += 1;
                    record.is_weak |= weak;
                }
                Mention::Attribute {
                    entity, attribute, ..
                } => self.add_attribute(&entity, &attribute),
                Mention::Constraint {
                    entity,
                    attribute,
                    constraint,
                    ..
                } => self
                    .constraints
                    .insert(entity.as_deref(), &attribute, constraint),
                Mention::Relationship(rel) => self.add_relationship(rel),
                Mention::Literal { .. } => {}
            }
        }
    }

    fn entity_mut(&mut self, name: &str) -> &mut EntityRecord {
        let key = merge_key(name);
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.entities.push(EntityRecord {
                    name: name.to_string(),
                    mention_count: 0,
                    is_weak: false,
                    attributes: Vec::new(),
                });
                self.index.insert(key, self.entities.len() - 1);
                self.entities.len() - 1
            }
        };
        &mut self.entities[idx]
    }

    fn add_attribute(&mut self, entity: &str, attribute: &str) {
        if attribute.is_empty() {
            return;
        }
        let record = self.entity_mut(entity);
        if !record.attributes.iter().any(|a| a == attribute) {
            record.attributes.push(attribute.to_string());
        }
    }

    fn canonical(&self, name: &str) -> Option<String> {
        self.index
            .get(&merge_key(name))
            .map(|&idx| self.entities[idx].name.clone())
    }

    pub fn add_relationship(&mut self, mut rel: CandidateRelationship) {
        let (a, b) = (merge_key(&rel.source_entity), merge_key(&rel.target_entity));
        if a == b {
            return;
        }
        // relationships may name entities no sentence mentioned on its own
        self.entity_mut(&rel.source_entity);
        self.entity_mut(&rel.target_entity);
        rel.source_entity = self.canonical(&rel.source_entity).unwrap_or(rel.source_entity);
        rel.target_entity = self.canonical(&rel.target_entity).unwrap_or(rel.target_entity);

        let same_pair = |r: &CandidateRelationship| {
            let (x, y) = (merge_key(&r.source_entity), merge_key(&r.target_entity));
            (x == a && y == b) || (x == b && y == a)
        };
        let existing: Vec<usize> = (0..self.relationships.len())
            .filter(|&i| same_pair(&self.relationships[i]))
            .collect();

        for &i in &existing {
            let other = &self.relationships[i];
            if same_reading(other, &rel) {
                return;
            }
            if opposite_one_to_many(other, &rel) {
                if existing
                    .iter()
                    .any(|&j| self.relationships[j].cardinality == Cardinality::ManyToMany)
                {
                    // already covered by a many-to-many on the same pair
                    self.relationships.remove(i);
                } else {
                    log::debug!(
                        "promoting {} / {} to many-to-many",
                        other.source_entity,
                        other.target_entity
                    );
                    self.relationships[i].cardinality = Cardinality::ManyToMany;
                }
                return;
            }
        }
        self.relationships.push(rel);
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn finish(self) -> Extraction {
        let entities = self
            .entities
            .iter()
            .map(|record| build_entity(record, &self.constraints))
            .collect();
        Extraction {
            entities,
            relationships: self.relationships,
        }
    }
}

/// One-to-many written from the other side, e.g. Order MANY_TO_ONE Customer
/// and Customer ONE_TO_MANY Order, describe the same relationship.
fn same_reading(existing: &CandidateRelationship, new: &CandidateRelationship) -> bool {
    let same_direction = merge_key(&existing.source_entity) == merge_key(&new.source_entity);
    let normalized = if same_direction {
        new.cardinality
    } else {
        new.cardinality.reversed()
    };
    normalized == existing.cardinality
}

/// Each side claims "many" of the other: A ONE_TO_MANY B plus B ONE_TO_MANY A
fn opposite_one_to_many(existing: &CandidateRelationship, new: &CandidateRelationship) -> bool {
    let same_direction = merge_key(&existing.source_entity) == merge_key(&new.source_entity);
    let normalized = if same_direction {
        new.cardinality
    } else {
        new.cardinality.reversed()
    };
    matches!(
        (existing.cardinality, normalized),
        (Cardinality::OneToMany, Cardinality::ManyToOne)
            | (Cardinality::ManyToOne, Cardinality::OneToMany)
    )
}

fn build_entity(record: &EntityRecord, constraints: &ConstraintMap) -> CandidateEntity {
    let mut attributes: Vec<CandidateAttribute> = record
        .attributes
        .iter()
        .map(|name| {
            let mut attr = CandidateAttribute::new(name, classify(name));
            constraints.apply(&record.name, &mut attr);
            attr
        })
        .collect();

    if attributes.is_empty() {
        attributes.push(CandidateAttribute::primary_key("id"));
        let mut name = CandidateAttribute::new("name", DataType::String);
        constraints.apply(&record.name, &mut name);
        attributes.push(name);
    }

    if !attributes.iter().any(|a| a.is_primary_key) {
        let declared = constraints.has_primary_key(&record.name).map(str::to_string);
        let target = declared.or_else(|| {
            attributes
                .iter()
                .any(|a| a.name == "id")
                .then(|| "id".to_string())
        });
        match target.and_then(|name| attributes.iter_mut().find(|a| a.name == name)) {
            Some(attr) => {
                attr.is_primary_key = true;
                attr.is_unique = true;
                attr.is_nullable = false;
            }
            None => attributes.insert(0, CandidateAttribute::primary_key("id")),
        }
    }

    for audit in ["created_at", "updated_at"] {
        if attributes.iter().any(|a| a.name == audit) {
            continue;
        }
        let mut attr = CandidateAttribute::new(audit, DataType::Timestamp);
        attr.is_nullable = false;
        attr.default_value = Some("CURRENT_TIMESTAMP".to_string());
        attributes.push(attr);
    }

    CandidateEntity {
        name: record.name.clone(),
        attributes,
        is_weak: record.is_weak,
        mention_count: record.mention_count.max(1),
    }
}
