//! Candidate concepts produced by the extractor.
//!
//! These are unvalidated: they live for one extraction call and are handed to
//! the synthesizer, which turns them into tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship cardinality between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    /// The same relationship read from the other end
    pub fn reversed(self) -> Self {
        match self {
            Cardinality::OneToMany => Cardinality::ManyToOne,
            Cardinality::ManyToOne => Cardinality::OneToMany,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "ONE_TO_ONE",
            Cardinality::OneToMany => "ONE_TO_MANY",
            Cardinality::ManyToOne => "MANY_TO_ONE",
            Cardinality::ManyToMany => "MANY_TO_MANY",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether every instance must take part in a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Participation {
    Total,
    #[default]
    Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParticipationPair {
    pub source: Participation,
    pub target: Participation,
}

/// Inferred column type, rendered as a SQL-like type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "INTEGER")]
    Integer,
    #[serde(rename = "TIMESTAMP")]
    Timestamp,
    #[serde(rename = "DATE")]
    Date,
    #[serde(rename = "DECIMAL(10,2)")]
    Decimal,
    #[serde(rename = "BOOLEAN")]
    Boolean,
    #[serde(rename = "TEXT")]
    Text,
    #[serde(rename = "VARCHAR(255)")]
    String,
}

impl DataType {
    pub fn sql(self) -> &'static str {
        match self {
            DataType::Integer => "INTEGER",
            DataType::Timestamp => "TIMESTAMP",
            DataType::Date => "DATE",
            DataType::Decimal => "DECIMAL(10,2)",
            DataType::Boolean => "BOOLEAN",
            DataType::Text => "TEXT",
            DataType::String => "VARCHAR(255)",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAttribute {
    pub name: String,
    #[serde(rename = "dataType")]
    pub inferred_data_type: DataType,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_nullable: bool,
    pub is_unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CandidateAttribute {
    /// Plain nullable attribute of the given type
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            inferred_data_type: data_type,
            is_primary_key: false,
            is_foreign_key: false,
            is_nullable: true,
            is_unique: false,
            default_value: None,
            description: None,
        }
    }

    /// Integer primary key attribute
    pub fn primary_key(name: impl Into<String>) -> Self {
        Self {
            is_primary_key: true,
            is_nullable: false,
            is_unique: true,
            ..Self::new(name, DataType::Integer)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntity {
    pub name: String,
    pub attributes: Vec<CandidateAttribute>,
    #[serde(default)]
    pub is_weak: bool,
    #[serde(default = "default_mention_count")]
    pub mention_count: usize,
}

fn default_mention_count() -> usize {
    1
}

impl CandidateEntity {
    pub fn attribute(&self, name: &str) -> Option<&CandidateAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRelationship {
    pub source_entity: String,
    pub target_entity: String,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
    #[serde(rename = "participationType", default)]
    pub participation: ParticipationPair,
    #[serde(default)]
    pub description: String,
}

/// Everything the extractor found in one text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Extraction {
    pub entities: Vec<CandidateEntity>,
    pub relationships: Vec<CandidateRelationship>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    pub fn entity(&self, name: &str) -> Option<&CandidateEntity> {
        self.entities.iter().find(|e| e.name == name)
    }
}
