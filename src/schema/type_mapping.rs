//! Type mapping from SQL-like column type strings to diagram type buckets.
//!
//! Diagram markup only distinguishes four families of types, so every column
//! type collapses into one of [`TypeBucket`]'s variants.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeBucket {
    Number,
    String,
    Date,
    Boolean,
}

impl TypeBucket {
    /// Map a column type string to its bucket
    ///
    /// Length and precision suffixes are ignored (`VARCHAR(255)` → string,
    /// `DECIMAL(10,2)` → number). Unknown types are strings.
    pub fn from_sql(col_type: &str) -> Self {
        let base = col_type
            .split('(')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        match base.as_str() {
            "integer" | "int" | "int4" | "int8" | "bigint" | "smallint" | "tinyint" | "serial"
            | "bigserial" | "decimal" | "numeric" | "float" | "real" | "double"
            | "double precision" | "money" => TypeBucket::Number,
            "timestamp" | "timestamptz" | "datetime" | "date" | "time" | "timetz" | "interval" => {
                TypeBucket::Date
            }
            "boolean" | "bool" => TypeBucket::Boolean,
            _ => TypeBucket::String,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeBucket::Number => "number",
            TypeBucket::String => "string",
            TypeBucket::Date => "date",
            TypeBucket::Boolean => "boolean",
        }
    }
}

impl fmt::Display for TypeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets() {
        assert_eq!(TypeBucket::from_sql("INTEGER"), TypeBucket::Number);
        assert_eq!(TypeBucket::from_sql("DECIMAL(10,2)"), TypeBucket::Number);
        assert_eq!(TypeBucket::from_sql("VARCHAR(255)"), TypeBucket::String);
        assert_eq!(TypeBucket::from_sql("TEXT"), TypeBucket::String);
        assert_eq!(TypeBucket::from_sql("TIMESTAMP"), TypeBucket::Date);
        assert_eq!(TypeBucket::from_sql("date"), TypeBucket::Date);
        assert_eq!(TypeBucket::from_sql("BOOLEAN"), TypeBucket::Boolean);
        assert_eq!(TypeBucket::from_sql("jsonb"), TypeBucket::String);
        assert_eq!(TypeBucket::from_sql(""), TypeBucket::String);
    }
}
