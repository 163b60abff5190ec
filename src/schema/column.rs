//! Column definition metadata.
//!
//! A [`Column`] carries a SQL-like type string plus key and nullability
//! flags. Foreign keys hold a [`ColumnReference`]: a name-based pointer to
//! another table's key column, never an owning link.

use crate::extract::CandidateAttribute;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action taken on dependent rows when the referenced row changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentialAction {
    #[default]
    Cascade,
    SetNull,
    Restrict,
    NoAction,
}

impl ReferentialAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::NoAction => "NO ACTION",
        }
    }
}

/// Name-based back-reference from a foreign key column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnReference {
    pub table: String,
    pub column: String,
    #[serde(default)]
    pub on_delete: ReferentialAction,
    #[serde(default)]
    pub on_update: ReferentialAction,
}

impl ColumnReference {
    /// Reference with cascading delete and update
    pub fn cascade(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            on_delete: ReferentialAction::Cascade,
            on_update: ReferentialAction::Cascade,
        }
    }
}

/// `table(column) ON DELETE CASCADE ON UPDATE CASCADE`
impl fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) ON DELETE {} ON UPDATE {}",
            self.table,
            self.column,
            self.on_delete.as_sql(),
            self.on_update.as_sql()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    /// SQL-like type, e.g. `INTEGER` or `VARCHAR(255)`
    pub data_type: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_nullable: bool,
    pub is_unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnReference>,
}

impl Column {
    /// Plain nullable column
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_foreign_key: false,
            is_nullable: true,
            is_unique: false,
            default_value: None,
            description: None,
            references: None,
        }
    }

    /// Column built from a candidate attribute, with `name` already normalized
    pub fn from_attribute(name: impl Into<String>, attribute: &CandidateAttribute) -> Self {
        Self {
            name: name.into(),
            data_type: attribute.inferred_data_type.sql().to_string(),
            is_primary_key: attribute.is_primary_key,
            is_foreign_key: attribute.is_foreign_key,
            is_nullable: attribute.is_nullable && !attribute.is_primary_key,
            is_unique: attribute.is_unique || attribute.is_primary_key,
            default_value: attribute.default_value.clone(),
            description: attribute.description.clone(),
            references: None,
        }
    }

    /// Foreign key column pointing at `reference`
    pub fn foreign_key(
        name: impl Into<String>,
        data_type: impl Into<String>,
        reference: ColumnReference,
    ) -> Self {
        Self {
            is_foreign_key: true,
            references: Some(reference),
            ..Self::new(name, data_type)
        }
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Table this column points at, if it is a foreign key
    pub fn referenced_table(&self) -> Option<&str> {
        self.references.as_ref().map(|r| r.table.as_str())
    }

    /// Drop the foreign key link but keep the column (nullable from now on)
    pub(crate) fn detach(&mut self) {
        self.references = None;
        self.is_foreign_key = false;
        if !self.is_primary_key {
            self.is_nullable = true;
        }
    }
}
