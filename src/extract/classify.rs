//! Name-pattern data type classifier for attributes

use super::types::DataType;

const BOOLEAN_PREFIXES: &[&str] = &["is", "has", "can", "should", "allow", "allows", "was"];
const BOOLEAN_WORDS: &[&str] = &[
    "active", "enabled", "disabled", "verified", "deleted", "published", "available",
    "archived", "approved", "paid", "confirmed", "visible",
];
const TEMPORAL_WORDS: &[&str] = &[
    "date", "time", "timestamp", "datetime", "birthday", "dob", "deadline", "created",
    "updated", "modified", "expiry", "expires", "scheduled", "born",
];
const MONETARY_WORDS: &[&str] = &[
    "price", "cost", "amount", "salary", "total", "balance", "fee", "tax", "discount", "budget",
    "revenue", "wage", "subtotal", "payment", "charge", "fare", "rent",
];
const FREE_TEXT_WORDS: &[&str] = &[
    "description", "notes", "note", "comment", "comments", "content", "body", "bio", "biography",
    "summary", "details", "text", "message", "remarks", "instructions", "review", "abstract",
];
const COUNT_WORDS: &[&str] = &[
    "quantity", "count", "age", "stock", "year", "credits", "capacity", "rating", "score",
    "rank", "seats", "pages", "duration", "level",
];

/// Classify an attribute by its (snake-case) name.
///
/// Rules are checked in order: identifier-like, boolean prefix, temporal,
/// monetary, free text, count-like; everything else is a bounded string.
pub fn classify(name: &str) -> DataType {
    let lower = name.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| c == '_' || c == ' ' || c == '-')
        .filter(|w| !w.is_empty())
        .collect();
    let Some(&last) = words.last() else {
        return DataType::String;
    };
    let first = words[0];

    if last == "id" || last == "identifier" || lower == "pk" {
        return DataType::Integer;
    }
    if words.len() > 1 && BOOLEAN_PREFIXES.contains(&first) {
        return DataType::Boolean;
    }
    if words.len() == 1 && BOOLEAN_WORDS.contains(&last) {
        return DataType::Boolean;
    }
    if last == "at" || last == "on" || words.iter().any(|w| TEMPORAL_WORDS.contains(w)) {
        return DataType::Timestamp;
    }
    if words.iter().any(|w| MONETARY_WORDS.contains(w)) {
        return DataType::Decimal;
    }
    if FREE_TEXT_WORDS.contains(&last) {
        return DataType::Text;
    }
    if COUNT_WORDS.contains(&last) || first == "num" || lower.starts_with("number_of") {
        return DataType::Integer;
    }
    DataType::String
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_like() {
        assert_eq!(classify("id"), DataType::Integer);
        assert_eq!(classify("customer_id"), DataType::Integer);
    }

    #[test]
    fn test_temporal_like() {
        assert_eq!(classify("created_at"), DataType::Timestamp);
        assert_eq!(classify("publication_date"), DataType::Timestamp);
        assert_eq!(classify("birthday"), DataType::Timestamp);
    }

    #[test]
    fn test_monetary_like() {
        assert_eq!(classify("price"), DataType::Decimal);
        assert_eq!(classify("total_amount"), DataType::Decimal);
    }

    #[test]
    fn test_boolean_prefixes() {
        assert_eq!(classify("is_active"), DataType::Boolean);
        assert_eq!(classify("has_paid"), DataType::Boolean);
        assert_eq!(classify("verified"), DataType::Boolean);
        // the prefix rule wins over temporal words
        assert_eq!(classify("is_updated"), DataType::Boolean);
    }

    #[test]
    fn test_free_text_and_counts() {
        assert_eq!(classify("description"), DataType::Text);
        assert_eq!(classify("quantity"), DataType::Integer);
        assert_eq!(classify("number_of_seats"), DataType::Integer);
    }

    #[test]
    fn test_default_is_bounded_string() {
        assert_eq!(classify("email"), DataType::String);
        assert_eq!(classify("phone_number"), DataType::String);
        assert_eq!(classify(""), DataType::String);
    }
}
