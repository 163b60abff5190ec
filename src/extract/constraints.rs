//! In-text constraint cues keyed by (entity, attribute)

use super::normalize::merge_key;
use super::types::{CandidateAttribute, DataType};
use std::collections::HashMap;

/// Owner key used when a cue could not be tied to an entity
const ANY_ENTITY: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    PrimaryKey,
    Unique,
    NotNull,
    Nullable,
    Default(String),
    Type(DataType),
}

#[derive(Debug, Default)]
pub(crate) struct ConstraintMap {
    entries: HashMap<(String, String), Vec<Constraint>>,
}

impl ConstraintMap {
    pub fn insert(&mut self, entity: Option<&str>, attribute: &str, constraint: Constraint) {
        let owner = entity.map(merge_key).unwrap_or_else(|| ANY_ENTITY.to_string());
        let list = self
            .entries
            .entry((owner, attribute.to_string()))
            .or_default();
        if !list.contains(&constraint) {
            list.push(constraint);
        }
    }

    pub fn has_primary_key(&self, entity: &str) -> Option<&str> {
        let owner = merge_key(entity);
        self.entries
            .iter()
            .filter(|((e, _), list)| *e == owner && list.contains(&Constraint::PrimaryKey))
            .map(|((_, attribute), _)| attribute.as_str())
            .min()
    }

    /// Apply wildcard cues first, then the entity's own cues, in insertion order
    pub fn apply(&self, entity: &str, attribute: &mut CandidateAttribute) {
        let owner = merge_key(entity);
        for key in [ANY_ENTITY.to_string(), owner] {
            let Some(list) = self.entries.get(&(key, attribute.name.clone())) else {
                continue;
            };
            for constraint in list {
                apply_one(constraint, attribute);
            }
        }
    }
}

fn apply_one(constraint: &Constraint, attribute: &mut CandidateAttribute) {
    match constraint {
        Constraint::PrimaryKey => {
            attribute.is_primary_key = true;
            attribute.is_unique = true;
            attribute.is_nullable = false;
        }
        Constraint::Unique => attribute.is_unique = true,
        Constraint::NotNull => attribute.is_nullable = false,
        Constraint::Nullable => {
            if !attribute.is_primary_key {
                attribute.is_nullable = true;
            }
        }
        Constraint::Default(value) => attribute.default_value = Some(value.clone()),
        Constraint::Type(data_type) => attribute.inferred_data_type = *data_type,
    }
}
